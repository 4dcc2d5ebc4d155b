use common::{layout::Layout, plot::Render};
use eyre::{Context, Result};
use tracing::{debug, info};

use crate::config::ComparisonConfig;

/// Parses every input, lays the series out and renders the chart.
///
/// Any failure aborts the run before the output file is written.
pub fn run_comparison(config: &ComparisonConfig, renderer: &dyn Render) -> Result<Layout> {
    config.validate()?;
    let parser = config.format.parser(config.aggregation)?;
    let mut style = parser.chart_style();
    if let Some(width) = config.bar_width {
        style.bar_width = width;
    }

    let mut datasets = Vec::with_capacity(config.inputs.len());
    for (i, input) in config.inputs.iter().enumerate() {
        let set = parser
            .parse_file(input)
            .wrap_err_with(|| format!("Parsing {} report {input:?}", parser.name()))?;
        let set = match config.series_name(i) {
            Some(name) => set.with_source_name(name),
            None => set,
        };
        debug!("Series {i}: {}", set.source_name());
        datasets.push(set);
    }

    let layout = Layout::compute(&datasets, style.bar_width)
        .wrap_err_with(|| format!("Laying out {} comparison", parser.name()))?;
    renderer
        .render(&layout, &style, &config.output)
        .wrap_err_with(|| format!("Rendering {:?}", config.output))?;

    info!(
        "Compared {} {} reports into {:?}",
        datasets.len(),
        parser.name(),
        config.output
    );
    Ok(layout)
}
