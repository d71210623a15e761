//! Chart rendering.
//!
//! The pipeline hands raw grouped values to a [`Renderer`]; the default
//! implementation draws a box plot with plotters. The trace renderer
//! draws the per-iteration cost curve of a single run.

use crate::analysis::mean;
use crate::config::PlotConfig;
use crate::models::{GroupedResults, TracePoint};
use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

/// Draws grouped results into an image file.
pub trait Renderer {
    fn render(&self, groups: &GroupedResults, path: &Path) -> Result<()>;
}

/// Size and labelling of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub caption: String,
    pub x_desc: String,
    pub y_desc: String,
}

impl From<&PlotConfig> for ChartStyle {
    fn from(config: &PlotConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            caption: config.caption.clone(),
            x_desc: config.x_desc.clone(),
            y_desc: config.y_desc.clone(),
        }
    }
}

impl ChartStyle {
    /// Style for the iteration/cost trace chart.
    pub fn trace(config: &PlotConfig) -> Self {
        Self {
            width: config.trace_width,
            height: config.trace_height,
            caption: config.trace_caption.clone(),
            x_desc: "Iteration".to_string(),
            y_desc: config.y_desc.clone(),
        }
    }
}

/// Box plot with one box per label and a mean marker on each box.
pub struct BoxPlotRenderer {
    style: ChartStyle,
}

impl BoxPlotRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }
}

impl Renderer for BoxPlotRenderer {
    fn render(&self, groups: &GroupedResults, path: &Path) -> Result<()> {
        if groups.is_empty() {
            bail!("nothing to plot");
        }

        let labels = groups.labels();
        let boxes = plot_boxes(groups);
        let (low, high) = value_axis(groups, &boxes)?;
        debug!(
            "Drawing box plot of {} labels ({} with finite values) to {}",
            labels.len(),
            boxes.len(),
            path.display()
        );

        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        // One segment per label index; the trailing segment stays empty.
        let mut chart = ChartBuilder::on(&root)
            .caption(&self.style.caption, ("sans-serif", 22).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), low..high)?;

        let label_of = |value: &SegmentValue<u32>| segment_label(&labels, value);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len() + 1)
            .x_label_formatter(&label_of)
            .x_desc(&self.style.x_desc)
            .y_desc(&self.style.y_desc)
            .draw()?;

        chart.draw_series(boxes.iter().map(|b| {
            Boxplot::new_vertical(SegmentValue::CenterOf(b.index), &b.quartiles)
                .width(30)
                .whisker_width(0.5)
                .style(BLUE)
        }))?;

        chart.draw_series(boxes.iter().map(|b| {
            TriangleMarker::new((SegmentValue::CenterOf(b.index), b.mean), 6, GREEN.filled())
        }))?;

        root.present()?;
        Ok(())
    }
}

/// Box and mean marker of one label, positioned by label index.
struct PlotBox {
    index: u32,
    quartiles: Quartiles,
    mean: f32,
}

/// Builds one box per label from its finite values.
///
/// `nan` and infinite values are valid input but cannot be ranked; they are
/// left out of the chart only. Labels without finite values get no box.
fn plot_boxes(groups: &GroupedResults) -> Vec<PlotBox> {
    groups
        .iter()
        .enumerate()
        .filter_map(|(index, (label, values))| {
            let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
            if finite.is_empty() {
                debug!("No finite values for {}, leaving it out of the box plot", label);
                return None;
            }
            Some(PlotBox {
                index: index as u32,
                quartiles: Quartiles::new(finite.as_slice()),
                mean: mean(&finite) as f32,
            })
        })
        .collect()
}

/// Padded value-axis range covering every finite value, whisker and mean.
///
/// Boxes are drawn in `f32`; values beyond its range are rejected rather
/// than plotted on an infinite axis.
fn value_axis(groups: &GroupedResults, boxes: &[PlotBox]) -> Result<(f32, f32)> {
    let mut extent: Vec<f64> = Vec::new();
    for b in boxes {
        let marks = b.quartiles.values();
        if marks.iter().chain([&b.mean]).any(|v| !v.is_finite()) {
            bail!("values exceed the plottable range (about ±{:e})", f32::MAX);
        }
        extent.extend(marks.iter().map(|&v| f64::from(v)));
    }
    extent.extend(groups.iter().flat_map(|(_, values)| values.iter().copied()));

    let (low, high) = padded_range(extent.into_iter());
    let (low, high) = (low as f32, high as f32);
    if !low.is_finite() || !high.is_finite() {
        bail!("values exceed the plottable range (about ±{:e})", f32::MAX);
    }
    Ok((low, high))
}

/// Line chart of cost against iteration.
pub struct TracePlotRenderer {
    style: ChartStyle,
}

impl TracePlotRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn render(&self, points: &[TracePoint], path: &Path) -> Result<()> {
        if points.is_empty() {
            bail!("nothing to plot");
        }

        let (x_low, x_high) = padded_range(points.iter().map(|p| p.iteration as f64));
        let (y_low, y_high) = padded_range(points.iter().map(|p| p.cost));
        if !y_low.is_finite() || !y_high.is_finite() {
            bail!("costs exceed the plottable range");
        }
        debug!("Drawing trace of {} points to {}", points.len(), path.display());

        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.style.caption, ("sans-serif", 22).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_low..x_high, y_low..y_high)?;

        chart
            .configure_mesh()
            .x_desc(&self.style.x_desc)
            .y_desc(&self.style.y_desc)
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().map(|p| (p.iteration as f64, p.cost)),
            &BLUE,
        ))?;

        root.present()?;
        Ok(())
    }
}

/// Output path of a trace chart: the input path with a `.png` extension.
pub fn trace_output_path(input: &Path) -> std::path::PathBuf {
    input.with_extension("png")
}

/// Axis text of a label segment; indices past the last label are blank.
fn segment_label(labels: &[&str], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::Exact(index) | SegmentValue::CenterOf(index) => labels
            .get(*index as usize)
            .map(|label| label.to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Min/max of finite values with 5% padding on both sides.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let pad = ((max - min).abs() * 0.05).max(max.abs() * 0.05).max(1e-6);
    (min - pad, max + pad)
}
