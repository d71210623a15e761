//! annealstat - results summarizer for simulated-annealing experiments
//!
//! Reads `label value` result logs, prints per-label statistics and writes
//! a CSV summary plus a box plot next to the input file.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Input missing, no valid data, or a runtime error

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use error::PipelineError;
use models::SummaryReport;
use pipeline::{RunOutcome, Settings};
use report::{BoxPlotRenderer, ChartStyle, TracePlotRenderer};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    debug!("annealstat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let result = if args.trace {
        run_trace(&config)
    } else {
        run_summary(&config, args.format)
    };

    if let Err(e) = result {
        let exit = exit_status(&e);
        match exit.stdout {
            Some(ref diagnostic) => {
                info!("Stopping: {}", diagnostic);
                println!("{}", diagnostic);
            }
            None => {
                error!("Run failed: {:#}", e);
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(exit.code);
    }

    Ok(())
}

/// How a failed run is reported to the user.
#[derive(Debug, PartialEq)]
struct ExitStatus {
    /// Diagnostic printed on stdout; `None` for unexpected failures,
    /// which go to stderr instead.
    stdout: Option<String>,
    code: i32,
}

/// Maps a run failure to its stdout diagnostic and exit code.
fn exit_status(err: &anyhow::Error) -> ExitStatus {
    let stdout = match err.downcast_ref::<PipelineError>() {
        Some(e) if e.is_diagnostic() => Some(e.to_string()),
        _ => None,
    };
    ExitStatus { stdout, code: 1 }
}

/// Handle --init-config: generate a default .annealstat.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Summarize a results file and print the report.
fn run_summary(config: &Config, format: OutputFormat) -> Result<()> {
    let settings = Settings::from(config);
    let renderer = BoxPlotRenderer::new(ChartStyle::from(&config.plot));

    let outcome = pipeline::run(&settings, &renderer)?;
    print_outcome(&settings, &outcome, format)
}

fn print_outcome(settings: &Settings, outcome: &RunOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => report::print_table_report(&outcome.summaries)?,
        OutputFormat::Json => {
            let report =
                SummaryReport::new(settings.input.display().to_string(), &outcome.summaries);
            println!("{}", report::generate_json_report(&report)?);
        }
    }

    println!("Summary table saved to: {}", outcome.summary_path.display());
    if let Some(ref path) = outcome.boxplot_path {
        println!("Box plot saved to: {}", path.display());
    }

    Ok(())
}

/// Plot a per-iteration cost log.
fn run_trace(config: &Config) -> Result<()> {
    let renderer = TracePlotRenderer::new(ChartStyle::trace(&config.plot));

    match pipeline::run_trace(config.input_path(), &renderer)? {
        Some(path) => println!("Chart saved to: {}", path.display()),
        None => println!("No data found in the file."),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_input_is_reported_on_stdout() {
        let err = anyhow::Error::from(PipelineError::NotFound(PathBuf::from("res/results.txt")));
        assert_eq!(
            exit_status(&err),
            ExitStatus {
                stdout: Some("File not found: res/results.txt".to_string()),
                code: 1,
            }
        );
    }

    #[test]
    fn test_no_valid_data_is_reported_on_stdout() {
        let err = anyhow::Error::from(PipelineError::NoValidData(PathBuf::from("empty.txt")));
        assert_eq!(
            exit_status(&err),
            ExitStatus {
                stdout: Some("No valid data found in empty.txt".to_string()),
                code: 1,
            }
        );
    }

    #[test]
    fn test_unexpected_failures_go_to_stderr() {
        let render = anyhow::Error::from(PipelineError::Render("backend failure".to_string()));
        assert_eq!(exit_status(&render), ExitStatus { stdout: None, code: 1 });

        let other = anyhow::anyhow!("config is broken");
        assert_eq!(exit_status(&other), ExitStatus { stdout: None, code: 1 });
    }
}
