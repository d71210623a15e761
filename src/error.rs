//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures of a pipeline run.
///
/// Malformed input lines are not errors; the loader skips them.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input exists but no line parsed into a record.
    #[error("No valid data found in {}", .0.display())]
    NoValidData(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the delimited summary failed.
    #[error("failed to write summary table: {0}")]
    Csv(#[from] csv::Error),

    /// The chart renderer failed.
    #[error("failed to render chart: {0}")]
    Render(String),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the message is a user-facing diagnostic rather than an
    /// unexpected failure.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NoValidData(_))
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_messages() {
        let missing = PipelineError::NotFound(PathBuf::from("res/results.txt"));
        assert_eq!(missing.to_string(), "File not found: res/results.txt");
        assert!(missing.is_diagnostic());

        let empty = PipelineError::NoValidData(PathBuf::from("res/results.txt"));
        assert_eq!(empty.to_string(), "No valid data found in res/results.txt");
        assert!(empty.is_diagnostic());
    }

    #[test]
    fn test_unexpected_errors_are_not_diagnostics() {
        let err = PipelineError::Render("backend failure".to_string());
        assert!(!err.is_diagnostic());
        assert!(err.to_string().contains("backend failure"));
    }
}
