//! Data models for the results summarizer.
//!
//! This module contains the core data structures that flow through the
//! pipeline: parsed records, grouped values, per-label summaries and the
//! serializable report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A single `label value` line from a results file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Grouping key, used verbatim.
    pub label: String,
    /// Final tour cost reported by the run.
    pub value: f64,
}

/// Parsed values grouped by label.
///
/// Labels iterate in lexicographic order. Values keep the order in which
/// they appeared in the input file. A label is only present once it holds
/// at least one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResults {
    groups: BTreeMap<String, Vec<f64>>,
}

impl GroupedResults {
    /// Creates an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record's value to its label, creating the label on first use.
    pub fn push(&mut self, record: ResultRecord) {
        self.groups.entry(record.label).or_default().push(record.value);
    }

    /// Returns the values recorded for a label.
    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of values across all labels.
    pub fn total_values(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Labels in lexicographic order.
    pub fn labels(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Iterates `(label, values)` pairs in lexicographic label order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<f64>> {
        self.groups.iter()
    }
}

impl FromIterator<ResultRecord> for GroupedResults {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        let mut grouped = Self::new();
        for record in iter {
            grouped.push(record);
        }
        grouped
    }
}

/// Summary statistics for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSummary {
    /// Grouping key.
    pub label: String,
    /// Number of values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (`n - 1` divisor).
    pub std: f64,
    /// `"<mean> ± <std>"` with six significant digits.
    pub display: String,
}

/// Summaries keyed by label; iteration order is the report order.
pub type Summaries = BTreeMap<String, LabelSummary>;

/// One point of a per-iteration cost log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub iteration: i64,
    pub cost: f64,
}

/// Serializable summary document for `--format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Input file the summaries were computed from.
    pub source: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Total number of parsed values.
    pub total_values: usize,
    /// One entry per label, sorted by label.
    pub labels: Vec<LabelSummary>,
}

impl SummaryReport {
    /// Builds a report from computed summaries.
    pub fn new(source: impl Into<String>, summaries: &Summaries) -> Self {
        Self {
            source: source.into(),
            generated_at: Utc::now(),
            total_values: summaries.values().map(|s| s.count).sum(),
            labels: summaries.values().cloned().collect(),
        }
    }
}
