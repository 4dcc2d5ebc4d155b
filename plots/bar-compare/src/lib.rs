use std::{fmt::Display, fs, path::Path};

use common::{
    ReportError, ReportResult,
    layout::{Axis, Bar, Layout},
    plot::{ChartStyle, Render},
};
use plotters::{
    coord::{
        Shift,
        ranged1d::{DefaultFormatting, KeyPointHint},
    },
    prelude::*,
};
use tracing::{debug, info};

const HEADROOM: f64 = 1.1;
const TICK_TOLERANCE: f64 = 1e-9;

/// Grouped bar chart, one colour per series, written as PNG or SVG depending
/// on the output extension
#[derive(Debug, Default, Clone)]
pub struct BarCompare;

/// Linear x axis whose key points are the group tick positions
#[derive(Debug, Clone)]
struct TickAxis {
    start: f64,
    end: f64,
    ticks: Vec<f64>,
}

impl Ranged for TickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = self.end - self.start;
        let pixels = limit.1 - limit.0;
        if span <= 0.0 || pixels == 0 {
            return limit.0;
        }
        limit.0 + ((value - self.start) / span * pixels as f64 + 1e-3).floor() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.start..self.end
    }
}

fn render_error<E: Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

fn y_range(max: f64) -> std::ops::Range<f64> {
    if max > 0.0 { 0.0..max * HEADROOM } else { 0.0..1.0 }
}

fn rect(bar: &Bar) -> [(f64, f64); 2] {
    [(bar.x, 0.0), (bar.x + bar.width, bar.value)]
}

fn series_color(series: usize) -> RGBAColor {
    Palette99::pick(series).to_rgba()
}

impl Render for BarCompare {
    fn render(&self, layout: &Layout, style: &ChartStyle, output: &Path) -> ReportResult<()> {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let is_svg = output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        let result = if is_svg {
            draw(
                SVGBackend::new(output, style.size).into_drawing_area(),
                layout,
                style,
            )
        } else {
            draw(
                BitMapBackend::new(output, style.size).into_drawing_area(),
                layout,
                style,
            )
        };

        if result.is_err() && output.exists() {
            debug!("Removing partial chart {output:?}");
            _ = fs::remove_file(output);
        }
        result?;

        info!(
            "Wrote {} series x {} labels to {output:?}",
            layout.spec.series_count(), layout.spec.label_count()
        );
        Ok(())
    }
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    layout: &Layout,
    style: &ChartStyle,
) -> ReportResult<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let (x_start, x_end) = layout.extent;
    let tick_points: Vec<f64> = layout.ticks.iter().map(|t| t.x).collect();
    let tick_text = |x: &f64| {
        layout
            .ticks
            .iter()
            .find(|t| (t.x - *x).abs() < TICK_TOLERANCE)
            .map(|t| t.text.clone())
            .unwrap_or_default()
    };
    let dual = layout.secondary_max.is_some();

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .right_y_label_area_size(if dual { 80 } else { 0 })
        .build_cartesian_2d(
            TickAxis {
                start: x_start,
                end: x_end,
                ticks: tick_points.clone(),
            },
            y_range(layout.primary_max),
        )
        .map_err(render_error)?
        .set_secondary_coord(
            x_start..x_end,
            y_range(layout.secondary_max.unwrap_or_default()),
        );

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(tick_points.len())
        .x_label_formatter(&tick_text)
        .y_desc(style.y_desc)
        .draw()
        .map_err(render_error)?;

    if dual {
        chart
            .configure_secondary_axes()
            .y_desc(style.secondary_y_desc.unwrap_or_default())
            .draw()
            .map_err(render_error)?;
    }

    for (series, name) in layout.series_names.iter().enumerate() {
        let color = series_color(series);
        let primary: Vec<&Bar> = layout
            .bars_of_series(series)
            .filter(|b| b.axis == Axis::Primary)
            .collect();
        let secondary: Vec<&Bar> = layout
            .bars_of_series(series)
            .filter(|b| b.axis == Axis::Secondary)
            .collect();

        chart
            .draw_series(
                primary
                    .iter()
                    .map(|b| Rectangle::new(rect(b), color.filled())),
            )
            .map_err(render_error)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        chart
            .draw_series(
                primary
                    .iter()
                    .map(|b| Rectangle::new(rect(b), BLACK.stroke_width(1))),
            )
            .map_err(render_error)?;

        if !secondary.is_empty() {
            chart
                .draw_secondary_series(
                    secondary
                        .iter()
                        .map(|b| Rectangle::new(rect(b), color.filled())),
                )
                .map_err(render_error)?;
            chart
                .draw_secondary_series(
                    secondary
                        .iter()
                        .map(|b| Rectangle::new(rect(b), BLACK.stroke_width(1))),
                )
                .map_err(render_error)?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(BLACK.stroke_width(1))
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}
