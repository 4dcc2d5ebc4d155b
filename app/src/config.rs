use std::{fs::read_to_string, path::PathBuf};

use common::aggregate::Aggregation;
use default_benches::ReportFormat;
use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Everything one comparison run needs, passed explicitly to each stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub format: ReportFormat,
    /// Reports in series order
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    #[serde(default)]
    pub aggregation: Option<Aggregation>,
    /// Overrides the format's bar width
    #[serde(default)]
    pub bar_width: Option<f64>,
    /// Legend entries, one per input. Defaults to the input paths
    #[serde(default)]
    pub series_names: Option<Vec<String>>,
}

impl ComparisonConfig {
    /// Builds a config from positional paths, the last of which is the output
    pub fn from_paths(
        format: ReportFormat,
        mut paths: Vec<PathBuf>,
        aggregation: Option<Aggregation>,
        bar_width: Option<f64>,
        names: Vec<String>,
    ) -> Result<Self> {
        let Some(output) = paths.pop() else {
            bail!("Expected input reports followed by an output path");
        };
        let config = Self {
            format,
            inputs: paths,
            output,
            aggregation,
            bar_width,
            series_names: (!names.is_empty()).then_some(names),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &str) -> Result<Self> {
        let config: Self = serde_yml::from_str(
            &read_to_string(path).wrap_err_with(|| format!("Reading config {path}"))?,
        )
        .wrap_err_with(|| format!("Parsing config {path}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("At least one input report is required");
        }
        if let Some(names) = &self.series_names
            && names.len() != self.inputs.len()
        {
            bail!(
                "Got {} series names for {} inputs",
                names.len(),
                self.inputs.len()
            );
        }
        if let Some(width) = self.bar_width
            && (!width.is_finite() || width <= 0.0)
        {
            bail!("Bar width must be positive, got {width}");
        }
        if self.format.needs_aggregation() && self.aggregation.is_none() {
            bail!(
                "{} reports need an explicit aggregation (sum, first or last)",
                self.format
            );
        }
        if !self.format.needs_aggregation() && self.aggregation.is_some() {
            bail!("{} reports cannot be aggregated", self.format);
        }
        Ok(())
    }

    /// Legend entry of input `index`
    pub fn series_name(&self, index: usize) -> Option<&str> {
        self.series_names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(String::as_str)
    }
}
