//! Summary report generation.
//!
//! This module renders per-label summaries as a delimited file for
//! programmatic reuse, a fixed-width console table for reading, and a
//! JSON document. All outputs list labels in lexicographic order.

use crate::analysis::format_general;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{LabelSummary, Summaries, SummaryReport};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Header row of the delimited summary.
pub const CSV_HEADER: [&str; 5] = ["label", "count", "mean", "std", "mean±std"];

/// Significant digits for `mean` and `std` in the delimited summary.
pub const CSV_DIGITS: usize = 10;

/// Width of the separator rule under the console table header.
const RULE_WIDTH: usize = 80;

/// Summaries in report order.
fn sorted(summaries: &Summaries) -> impl Iterator<Item = &LabelSummary> {
    // BTreeMap iteration is already lexicographic by label.
    summaries.values()
}

/// Generate the delimited summary in memory.
pub fn generate_csv_report(summaries: &Summaries) -> PipelineResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for summary in sorted(summaries) {
        writer.write_record([
            summary.label.clone(),
            summary.count.to_string(),
            format_general(summary.mean, CSV_DIGITS),
            format_general(summary.std, CSV_DIGITS),
            summary.display.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Csv(e.into_error().into()))
}

/// Write the delimited summary to a file.
pub fn write_csv_report(summaries: &Summaries, path: &Path) -> PipelineResult<()> {
    let content = generate_csv_report(summaries)?;
    std::fs::write(path, content).map_err(|e| PipelineError::io(path, e))
}

/// Generate the fixed-width console table.
pub fn generate_table_report(summaries: &Summaries) -> String {
    let mut output = String::new();

    output.push_str("\nResults summary (by label):\n\n");
    output.push_str(&format!(
        "{:<25} {:>5} {:>14} {:>14} {:>20}\n",
        "label", "count", "mean", "std", "mean±std"
    ));
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');

    for summary in sorted(summaries) {
        output.push_str(&format!(
            "{:<25} {:>5} {:>14.6} {:>14.6} {:>20}\n",
            summary.label, summary.count, summary.mean, summary.std, summary.display
        ));
    }

    output.push('\n');
    output
}

/// Print the console table to standard output.
pub fn print_table_report(summaries: &Summaries) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(generate_table_report(summaries).as_bytes())?;
    handle.flush()?;
    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SummaryReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarize;
    use crate::models::{GroupedResults, ResultRecord};
    use tempfile::TempDir;

    fn scenario_summaries() -> Summaries {
        let groups: GroupedResults = [
            ("Cooling-5", 1278.9),
            ("Cooling-1", 5.0),
            ("Cooling-0", 10.0),
            ("Cooling-0", 20.0),
        ]
        .into_iter()
        .map(|(label, value)| ResultRecord {
            label: label.to_string(),
            value,
        })
        .collect();
        summarize(&groups)
    }

    fn table_labels(table: &str) -> Vec<String> {
        table
            .lines()
            .skip_while(|line| !line.starts_with("---"))
            .skip(1)
            .filter(|line| !line.is_empty())
            .filter_map(|line| line.split_whitespace().next().map(String::from))
            .collect()
    }

    #[test]
    fn test_generate_csv_report() {
        let csv = String::from_utf8(generate_csv_report(&scenario_summaries()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "label,count,mean,std,mean±std");
        assert_eq!(lines[1], "Cooling-0,2,15,7.071067812,15 ± 7.07107");
        assert_eq!(lines[2], "Cooling-1,1,5,0,5 ± 0");
        assert_eq!(lines[3], "Cooling-5,1,1278.9,0,1278.9 ± 0");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_csv_and_table_share_order() {
        let summaries = scenario_summaries();
        let csv = String::from_utf8(generate_csv_report(&summaries).unwrap()).unwrap();
        let csv_labels: Vec<String> = csv
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next().map(String::from))
            .collect();

        let table = generate_table_report(&summaries);

        assert_eq!(csv_labels, vec!["Cooling-0", "Cooling-1", "Cooling-5"]);
        assert_eq!(table_labels(&table), csv_labels);
    }

    #[test]
    fn test_generate_table_report_layout() {
        let table = generate_table_report(&scenario_summaries());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Results summary (by label):");
        assert!(lines[3].starts_with("label"));
        assert!(lines[3].ends_with("mean±std"));
        assert_eq!(lines[4], "-".repeat(80));
        assert_eq!(
            lines[5],
            format!(
                "{:<25} {:>5} {:>14} {:>14} {:>20}",
                "Cooling-0", 2, "15.000000", "7.071068", "15 ± 7.07107"
            )
        );
        assert!(table.ends_with("\n\n"));
    }

    #[test]
    fn test_write_csv_report_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results_summary.csv");
        let summaries = scenario_summaries();

        write_csv_report(&summaries, &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_csv_report(&summaries, &path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_csv_quotes_labels_with_delimiters() {
        let mut summaries = Summaries::new();
        summaries.insert(
            "a,b".to_string(),
            crate::analysis::summarize_values("a,b", &[1.0]),
        );
        let csv = String::from_utf8(generate_csv_report(&summaries).unwrap()).unwrap();
        assert!(csv.contains("\"a,b\",1,1,0,1 ± 0"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = SummaryReport::new("res/results.txt", &scenario_summaries());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"source\": \"res/results.txt\""));
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"Cooling-0\""));
        assert!(json.contains("\"display\": \"15 ± 7.07107\""));
    }
}
