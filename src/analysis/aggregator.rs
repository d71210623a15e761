//! Per-label aggregation and statistics.
//!
//! This module turns grouped result values into summary statistics:
//! count, mean, sample standard deviation and a display string.

use super::format::format_general;
use crate::models::{GroupedResults, LabelSummary, Summaries};

/// Significant digits used in the `"mean ± std"` display string.
pub const DISPLAY_DIGITS: usize = 6;

/// Summarize every label of a grouping.
pub fn summarize(groups: &GroupedResults) -> Summaries {
    groups
        .iter()
        .map(|(label, values)| (label.clone(), summarize_values(label, values)))
        .collect()
}

/// Summarize the values of a single label.
pub fn summarize_values(label: &str, values: &[f64]) -> LabelSummary {
    let mean = mean(values);
    let std = sample_std(values, mean);

    LabelSummary {
        label: label.to_string(),
        count: values.len(),
        mean,
        std,
        display: display_string(mean, std),
    }
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation around `mean` with Bessel's correction.
///
/// Exactly `0.0` for a single value and `NaN` for an empty slice.
pub fn sample_std(values: &[f64], mean: f64) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => {
            let squares: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
            (squares / (n as f64 - 1.0)).sqrt()
        }
    }
}

/// `"<mean> ± <std>"` in six-digit general format.
pub fn display_string(mean: f64, std: f64) -> String {
    format!(
        "{} ± {}",
        format_general(mean, DISPLAY_DIGITS),
        format_general(std, DISPLAY_DIGITS)
    )
}
