//! Analysis modules.
//!
//! Aggregation of grouped results into per-label statistics, plus the
//! general-precision formatter shared with the reporter.

pub mod aggregator;
pub mod format;

pub use aggregator::*;
pub use format::format_general;
