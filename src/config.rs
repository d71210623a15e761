//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.annealstat.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".annealstat.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output artifact settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart settings.
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Results file used when no path is given on the command line.
    #[serde(default = "default_input_path")]
    pub default_path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            default_path: default_input_path(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("res/results.txt")
}

/// Output artifact settings.
///
/// Artifacts are always written next to the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name of the delimited summary.
    #[serde(default = "default_summary_name")]
    pub summary_name: String,

    /// File name of the box plot image.
    #[serde(default = "default_boxplot_name")]
    pub boxplot_name: String,

    /// Render the box plot.
    #[serde(default = "default_true")]
    pub plot: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_name: default_summary_name(),
            boxplot_name: default_boxplot_name(),
            plot: true,
        }
    }
}

fn default_summary_name() -> String {
    "results_summary.csv".to_string()
}

fn default_boxplot_name() -> String {
    "results_boxplot.png".to_string()
}

fn default_true() -> bool {
    true
}

/// Chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Box plot width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Box plot height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Box plot title.
    #[serde(default = "default_caption")]
    pub caption: String,

    /// Category axis description.
    #[serde(default = "default_x_desc")]
    pub x_desc: String,

    /// Value axis description, shared by both charts.
    #[serde(default = "default_y_desc")]
    pub y_desc: String,

    /// Trace chart width in pixels.
    #[serde(default = "default_trace_width")]
    pub trace_width: u32,

    /// Trace chart height in pixels.
    #[serde(default = "default_trace_height")]
    pub trace_height: u32,

    /// Trace chart title.
    #[serde(default = "default_trace_caption")]
    pub trace_caption: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            caption: default_caption(),
            x_desc: default_x_desc(),
            y_desc: default_y_desc(),
            trace_width: default_trace_width(),
            trace_height: default_trace_height(),
            trace_caption: default_trace_caption(),
        }
    }
}

fn default_width() -> u32 {
    900
}

fn default_height() -> u32 {
    600
}

fn default_caption() -> String {
    "Final tour cost per cooling schedule".to_string()
}

fn default_x_desc() -> String {
    "Cooling schedule / instance".to_string()
}

fn default_y_desc() -> String {
    "Final cost (tourCost)".to_string()
}

fn default_trace_width() -> u32 {
    1000
}

fn default_trace_height() -> u32 {
    600
}

fn default_trace_caption() -> String {
    "Cost evolution per iteration".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.input.default_path = input.clone();
        }

        if args.no_plot {
            self.output.plot = false;
        }
    }

    /// Path of the input file after merging.
    pub fn input_path(&self) -> &Path {
        &self.input.default_path
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
