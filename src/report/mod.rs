//! Report outputs: delimited summary, console table, JSON and charts.

pub mod generator;
pub mod plot;

pub use generator::*;
pub use plot::*;
