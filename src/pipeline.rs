//! Load → summarize → report pipeline.
//!
//! A run either writes both output artifacts or neither: the box plot is
//! rendered into a temporary file beside its final location and only moved
//! into place after the summary table has been written.

use crate::analysis::summarize;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::loader;
use crate::models::Summaries;
use crate::report::{trace_output_path, write_csv_report, Renderer, TracePlotRenderer};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Inputs of a summary run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Results file to read.
    pub input: PathBuf,
    /// File name of the delimited summary.
    pub summary_name: String,
    /// File name of the box plot.
    pub boxplot_name: String,
    /// Whether to render the box plot.
    pub plot: bool,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            input: config.input_path().to_path_buf(),
            summary_name: config.output.summary_name.clone(),
            boxplot_name: config.output.boxplot_name.clone(),
            plot: config.output.plot,
        }
    }
}

/// Result of a successful summary run.
#[derive(Debug)]
pub struct RunOutcome {
    pub summaries: Summaries,
    pub summary_path: PathBuf,
    pub boxplot_path: Option<PathBuf>,
}

/// Directory that receives the output artifacts: the input's directory.
pub fn output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Run the summary pipeline.
pub fn run(settings: &Settings, renderer: &dyn Renderer) -> PipelineResult<RunOutcome> {
    let input = settings.input.as_path();
    if !input.exists() {
        return Err(PipelineError::NotFound(input.to_path_buf()));
    }

    let groups = loader::load(input)?;
    if groups.is_empty() {
        return Err(PipelineError::NoValidData(input.to_path_buf()));
    }
    info!(
        "Loaded {} values across {} labels from {}",
        groups.total_values(),
        groups.len(),
        input.display()
    );

    let summaries = summarize(&groups);

    let out_dir = output_dir(input);
    let summary_path = out_dir.join(&settings.summary_name);

    let pending_plot = if settings.plot {
        let staged = tempfile::Builder::new()
            .prefix(".annealstat-")
            .suffix(".png")
            .tempfile_in(&out_dir)
            .map_err(|e| PipelineError::io(&out_dir, e))?;
        debug!("Rendering box plot into {}", staged.path().display());
        renderer
            .render(&groups, staged.path())
            .map_err(|e| PipelineError::Render(format!("{:#}", e)))?;
        Some(staged)
    } else {
        None
    };

    write_csv_report(&summaries, &summary_path)?;
    info!("Wrote summary table to {}", summary_path.display());

    let boxplot_path = match pending_plot {
        Some(staged) => {
            let path = out_dir.join(&settings.boxplot_name);
            if let Err(e) = staged.persist(&path) {
                // Keep the all-or-nothing guarantee.
                if let Err(cleanup) = std::fs::remove_file(&summary_path) {
                    warn!(
                        "Could not remove {} after failing to save the box plot: {}",
                        summary_path.display(),
                        cleanup
                    );
                }
                return Err(PipelineError::io(&path, e.error));
            }
            info!("Wrote box plot to {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(RunOutcome {
        summaries,
        summary_path,
        boxplot_path,
    })
}

/// Plot a per-iteration cost log next to the input.
///
/// Returns `Ok(None)` when the log holds no usable points; no chart is
/// written in that case.
pub fn run_trace(input: &Path, renderer: &TracePlotRenderer) -> PipelineResult<Option<PathBuf>> {
    let points = loader::load_trace(input)?;
    if points.is_empty() {
        return Ok(None);
    }

    let path = trace_output_path(input);
    renderer
        .render(&points, &path)
        .map_err(|e| PipelineError::Render(format!("{:#}", e)))?;
    info!("Wrote trace chart of {} points to {}", points.len(), path.display());

    Ok(Some(path))
}
