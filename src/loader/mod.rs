//! Results file loader.
//!
//! This module reads plain-text result logs and groups their values by
//! label. Parsing is tolerant: blank lines, `#` comments, short lines,
//! lines that are not valid UTF-8 and lines whose value is not a number are
//! skipped without raising.

use crate::error::{PipelineError, PipelineResult};
use crate::models::{GroupedResults, ResultRecord, TracePoint};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Counters collected while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines that produced a record.
    pub accepted: usize,
    /// Blank or comment lines.
    pub ignored: usize,
    /// Lines that looked like data but did not parse.
    pub skipped: usize,
}

/// Load a results file and group its values by label.
///
/// Fails with [`PipelineError::NotFound`] before opening when the path does
/// not exist. An empty or fully malformed file yields an empty grouping.
pub fn load(path: &Path) -> PipelineResult<GroupedResults> {
    let reader = open(path)?;
    let (groups, stats) = parse_results(reader).map_err(|e| PipelineError::io(path, e))?;

    debug!(
        "Parsed {}: {} records, {} ignored, {} skipped",
        path.display(),
        stats.accepted,
        stats.ignored,
        stats.skipped
    );

    Ok(groups)
}

/// Parse `label value` records from any buffered reader.
pub fn parse_results<R: BufRead>(reader: R) -> std::io::Result<(GroupedResults, ParseStats)> {
    let mut groups = GroupedResults::new();
    let mut stats = ParseStats::default();

    for_each_line(reader, |line| {
        let Some(line) = line else {
            debug!("Skipping line that is not valid UTF-8");
            stats.skipped += 1;
            return;
        };
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            stats.ignored += 1;
            return;
        }

        match parse_record(line) {
            Some(record) => {
                groups.push(record);
                stats.accepted += 1;
            }
            None => {
                debug!("Skipping malformed line: {:?}", line);
                stats.skipped += 1;
            }
        }
    })?;

    Ok((groups, stats))
}

/// Parse one trimmed, non-comment line into a record.
///
/// Only the first two whitespace-separated tokens are used.
pub fn parse_record(line: &str) -> Option<ResultRecord> {
    let mut tokens = line.split_whitespace();
    let label = tokens.next()?;
    let value = tokens.next()?.parse::<f64>().ok()?;

    Some(ResultRecord {
        label: label.to_string(),
        value,
    })
}

/// Load a per-iteration cost log.
///
/// Each accepted line holds exactly two tokens: an integer iteration and a
/// floating-point cost. Anything else is skipped.
pub fn load_trace(path: &Path) -> PipelineResult<Vec<TracePoint>> {
    let reader = open(path)?;
    parse_trace(reader).map_err(|e| PipelineError::io(path, e))
}

/// Parse `iteration cost` pairs from any buffered reader.
pub fn parse_trace<R: BufRead>(reader: R) -> std::io::Result<Vec<TracePoint>> {
    let mut points = Vec::new();

    for_each_line(reader, |line| {
        let tokens: Vec<&str> = line.map(|l| l.split_whitespace().collect()).unwrap_or_default();
        if tokens.len() != 2 {
            return;
        }

        let (Ok(iteration), Ok(cost)) = (tokens[0].parse::<i64>(), tokens[1].parse::<f64>())
        else {
            return;
        };

        points.push(TracePoint { iteration, cost });
    })?;

    Ok(points)
}

/// Feeds each raw line to `handle`, or `None` when the line is not UTF-8.
///
/// Only read errors abort; undecodable bytes stay local to their line.
fn for_each_line<R: BufRead>(
    mut reader: R,
    mut handle: impl FnMut(Option<&str>),
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        handle(std::str::from_utf8(&buf).ok());
    }
}

fn open(path: &Path) -> PipelineResult<BufReader<File>> {
    if !path.exists() {
        return Err(PipelineError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn parse(input: &str) -> (GroupedResults, ParseStats) {
        parse_results(Cursor::new(input)).unwrap()
    }

    #[test]
    fn test_parse_mixed_input() {
        let (groups, stats) =
            parse("Cooling-0 10\nCooling-0 20\n# comment\nbad line\nCooling-1 5\n");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("Cooling-0"), Some(&[10.0, 20.0][..]));
        assert_eq!(groups.get("Cooling-1"), Some(&[5.0][..]));
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_parse_skips_short_and_blank_lines() {
        let (groups, stats) = parse("\n   \nCooling-0\n\t# indented comment\n");
        assert!(groups.is_empty());
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.ignored, 3);
    }

    #[test]
    fn test_parse_ignores_extra_tokens_and_whitespace() {
        let (groups, _) = parse("  Cooling-2\t1234.5   run=3 seed=42  \n");
        assert_eq!(groups.get("Cooling-2"), Some(&[1234.5][..]));
    }

    #[test]
    fn test_label_used_verbatim() {
        let (groups, _) = parse("cooling-0 1\nCooling-0 2\n");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("cooling-0"), Some(&[1.0][..]));
    }

    #[test]
    fn test_parse_record_accepts_float_forms() {
        assert_eq!(parse_record("A 1e3").map(|r| r.value), Some(1000.0));
        assert_eq!(parse_record("A -2.5").map(|r| r.value), Some(-2.5));
        assert_eq!(parse_record("A .5").map(|r| r.value), Some(0.5));
        assert!(parse_record("A abc").is_none());
        assert!(parse_record("A 1.2.3").is_none());
        assert!(parse_record("A").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        match load(&path) {
            Err(PipelineError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_empty_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.txt");
        std::fs::write(&path, "# only comments\n\n").unwrap();

        let groups = load(&path).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.txt");
        std::fs::write(&path, "Cooling-1 1300.12\nCooling-0 1234.56\n").unwrap();

        let groups = load(&path).unwrap();
        assert_eq!(groups.labels(), vec!["Cooling-0", "Cooling-1"]);
    }

    #[test]
    fn test_parse_trace() {
        let input = "0 100.5\n1 99.0\niteration cost\n2 98.25 extra\n3 97\n";
        let points = parse_trace(Cursor::new(input)).unwrap();

        assert_eq!(
            points,
            vec![
                TracePoint { iteration: 0, cost: 100.5 },
                TracePoint { iteration: 1, cost: 99.0 },
                TracePoint { iteration: 3, cost: 97.0 },
            ]
        );
    }

    #[test]
    fn test_parse_trace_rejects_fractional_iteration() {
        let points = parse_trace(Cursor::new("1.5 10\n")).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut input = b"Cooling-0 10\n".to_vec();
        input.extend_from_slice(b"Cooling-\xff\xfe 99\n");
        input.extend_from_slice(b"Cooling-0 20");

        let (groups, stats) = parse_results(Cursor::new(input)).unwrap();

        assert_eq!(groups.get("Cooling-0"), Some(&[10.0, 20.0][..]));
        assert_eq!(groups.len(), 1);
        assert_eq!(
            stats,
            ParseStats {
                accepted: 2,
                ignored: 0,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_parse_trace_skips_invalid_utf8() {
        let input = b"0 10\n\xc3\x28 5\n1 9\r\n".to_vec();
        let points = parse_trace(Cursor::new(input)).unwrap();
        assert_eq!(
            points,
            vec![
                TracePoint { iteration: 0, cost: 10.0 },
                TracePoint { iteration: 1, cost: 9.0 },
            ]
        );
    }
}
