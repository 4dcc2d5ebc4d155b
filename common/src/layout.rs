//! Bar geometry for grouped comparison charts.
//!
//! Every coordinate is plain arithmetic over the series count `N`, the label
//! count `M`, the bar width `w` and an index. Groups are `(N + 1) * w` wide,
//! so neighbouring groups are separated by one empty bar slot.

use itertools::iproduct;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{ReportError, ReportResult},
    metric::DataSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSpec {
    bar_width: f64,
    series_count: usize,
    label_count: usize,
}

impl LayoutSpec {
    pub fn new(series_count: usize, label_count: usize, bar_width: f64) -> ReportResult<Self> {
        if series_count == 0 {
            return Err(ReportError::InvalidLayout("no series to compare".to_owned()));
        }
        if label_count == 0 {
            return Err(ReportError::InvalidLayout("label set is empty".to_owned()));
        }
        if !bar_width.is_finite() || bar_width <= 0.0 {
            return Err(ReportError::InvalidLayout(format!(
                "bar width must be positive, got {bar_width}"
            )));
        }
        Ok(Self {
            bar_width,
            series_count,
            label_count,
        })
    }

    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    pub fn series_count(&self) -> usize {
        self.series_count
    }

    pub fn label_count(&self) -> usize {
        self.label_count
    }

    pub fn group_width(&self) -> f64 {
        (self.series_count + 1) as f64 * self.bar_width
    }

    /// Left edge of the bar for `series` inside the group of `label`
    pub fn bar_x(&self, series: usize, label: usize) -> f64 {
        label as f64 * self.group_width() + series as f64 * self.bar_width
    }

    /// Centre of the bars of `label`, where its tick goes
    pub fn tick_x(&self, label: usize) -> f64 {
        label as f64 * self.group_width() + self.series_count as f64 * self.bar_width / 2.0
    }

    pub fn extent(&self) -> (f64, f64) {
        (
            0.0,
            self.label_count.saturating_sub(1) as f64 * self.group_width()
                + self.series_count as f64 * self.bar_width,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub series: usize,
    pub label: usize,
    pub x: f64,
    pub width: f64,
    pub value: f64,
    pub axis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub text: String,
    pub x: f64,
    pub axis: Axis,
}

/// Everything a renderer needs to draw one comparison chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub spec: LayoutSpec,
    pub series_names: Vec<String>,
    /// Label major: all series of label 0, then label 1, ...
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
    pub extent: (f64, f64),
    pub primary_max: f64,
    /// Only present when the label set is split over two axes
    pub secondary_max: Option<f64>,
}

impl Layout {
    /// Lays out `datasets` in the given order, one series each.
    ///
    /// All data sets must carry the same ordered label set and a value for
    /// every label in it.
    pub fn compute(datasets: &[DataSet], bar_width: f64) -> ReportResult<Self> {
        let first = datasets
            .first()
            .ok_or_else(|| ReportError::InvalidLayout("no series to compare".to_owned()))?;
        let label_set = first.label_set();

        for set in datasets {
            if set.label_set() != label_set {
                return Err(ReportError::LabelMismatch {
                    series: set.source_name().to_owned(),
                    detail: format!(
                        "expected labels [{}], got [{}]",
                        label_set.keys().collect::<Vec<_>>().join(", "),
                        set.label_set().keys().collect::<Vec<_>>().join(", ")
                    ),
                });
            }
            set.ensure_complete()?;
        }

        let spec = LayoutSpec::new(datasets.len(), label_set.len(), bar_width)?;
        let split = match label_set.secondary_from() {
            Some(k) if k == 0 || k >= label_set.len() => {
                return Err(ReportError::InvalidLayout(format!(
                    "secondary axis must start inside 1..{}, got {k}",
                    label_set.len()
                )));
            }
            other => other,
        };
        let axis_of = |label: usize| match split {
            Some(k) if label >= k => Axis::Secondary,
            _ => Axis::Primary,
        };

        let values = datasets
            .iter()
            .map(DataSet::ordered_values)
            .collect::<ReportResult<Vec<_>>>()?;

        let bars: Vec<Bar> = iproduct!(0..spec.label_count(), 0..spec.series_count())
            .map(|(label, series)| Bar {
                series,
                label,
                x: spec.bar_x(series, label),
                width: spec.bar_width(),
                value: values[series][label],
                axis: axis_of(label),
            })
            .collect();

        let ticks = label_set
            .labels()
            .iter()
            .enumerate()
            .map(|(j, label)| Tick {
                text: label.display.clone(),
                x: spec.tick_x(j),
                axis: axis_of(j),
            })
            .collect();

        let max_on = |axis: Axis| {
            bars.iter()
                .filter(|b| b.axis == axis)
                .map(|b| b.value)
                .fold(0.0_f64, f64::max)
        };
        let primary_max = max_on(Axis::Primary);
        let secondary_max = split.map(|_| max_on(Axis::Secondary));

        debug!(
            "Layout: {} series x {} labels, group width {}, extent {:?}",
            spec.series_count(),
            spec.label_count(),
            spec.group_width(),
            spec.extent()
        );

        Ok(Self {
            spec,
            series_names: datasets
                .iter()
                .map(|d| d.source_name().to_owned())
                .collect(),
            bars,
            ticks,
            extent: spec.extent(),
            primary_max,
            secondary_max,
        })
    }

    pub fn bars_on(&self, axis: Axis) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(move |b| b.axis == axis)
    }

    pub fn bars_of_series(&self, series: usize) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(move |b| b.series == series)
    }
}
