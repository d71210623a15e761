//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// annealstat - summarize simulated-annealing result logs
///
/// Reads a results file of `label value` lines (one line per run), prints
/// count, mean and sample standard deviation per label, and writes
/// `results_summary.csv` and `results_boxplot.png` next to the input.
///
/// Examples:
///   annealstat
///   annealstat res/results.txt
///   annealstat res/results.txt --format json --no-plot
///   annealstat --trace logs/run_01.txt
///   annealstat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Results file to summarize
    ///
    /// Defaults to `[input] default_path` from the config file
    /// (res/results.txt when unset).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .annealstat.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "ANNEALSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Console output format (table, json)
    #[arg(long, default_value = "table", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Skip rendering the box plot
    #[arg(long)]
    pub no_plot: bool,

    /// Treat INPUT as a per-iteration `iteration cost` log and plot it
    ///
    /// The chart is written next to INPUT with a .png extension.
    #[arg(long)]
    pub trace: bool,

    /// Generate a default .annealstat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table (default)
    #[default]
    Table,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.trace && self.input.is_none() {
            return Err("--trace requires an INPUT log file".to_string());
        }

        if self.trace && self.format == OutputFormat::Json {
            return Err("--format json has no effect with --trace".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
