use core::fmt::Debug;
use std::path::Path;

use tracing::debug;

use crate::{
    error::ReportResult,
    metric::{DataSet, LabelSet},
    plot::ChartStyle,
    util::read_report,
};

/// Turns the raw output of one benchmark tool into a [`DataSet`]
pub trait ReportParser: Debug {
    /// Name of the benchmark tool, for identification
    fn name(&self) -> &'static str;
    /// The labels every report of this tool is normalized to
    fn label_set(&self) -> LabelSet;
    /// How comparisons of this tool are drawn
    fn chart_style(&self) -> ChartStyle;
    /// Parses report `content`, naming the resulting series `source_name`.
    ///
    /// Either the whole report is understood or an error is returned, there
    /// is no partial result.
    fn parse_str(&self, source_name: &str, content: &str) -> ReportResult<DataSet>;

    fn parse_file(&self, path: &Path) -> ReportResult<DataSet> {
        let content = read_report(path)?;
        let set = self.parse_str(&path.display().to_string(), &content)?;
        debug!(
            "Parsed {} report {path:?} into {} records",
            self.name(),
            set.len()
        );
        Ok(set)
    }
}
