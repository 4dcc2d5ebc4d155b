use core::fmt::Debug;
use std::path::Path;

use crate::{error::ReportResult, layout::Layout};

/// Fixed per-format chart appearance
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Bar width in x axis units
    pub bar_width: f64,
    /// Canvas size in pixels
    pub size: (u32, u32),
    pub y_desc: &'static str,
    /// Description of the right hand axis, for formats with a split label set
    pub secondary_y_desc: Option<&'static str>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_width: 0.25,
            size: (1024, 768),
            y_desc: "",
            secondary_y_desc: None,
        }
    }
}

pub trait Render: Debug {
    /// Draws `layout` and writes the image to `output`, replacing any existing file
    fn render(&self, layout: &Layout, style: &ChartStyle, output: &Path) -> ReportResult<()>;
}
