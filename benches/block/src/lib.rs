use common::{
    ReportError, ReportResult,
    aggregate::Aggregation,
    bench::ReportParser,
    metric::{DataSet, LabelSet, MetricRecord},
    plot::ChartStyle,
    util::BYTES_PER_GIB,
};
use tracing::{debug, warn};

use crate::result::{BlockRun, parse_output};


pub const BLOCK_LABELS: [&str; 8] = [
    "blk-1k", "blk-32k", "blk-512k", "blk-1m", "blk-32m", "blk-128m", "blk-512m", "blk-1g",
];

/// Block device throughput over HTTP, one label per block size.
///
/// Several runs against the same block are folded with `aggregation`: `Sum`
/// for the total of parallel connections, `First` for a single connection.
#[derive(Debug, Clone)]
pub struct Block {
    pub aggregation: Aggregation,
}

impl Block {
    pub fn new(aggregation: Aggregation) -> Self {
        Self { aggregation }
    }
}

impl BlockRun {
    /// Last non-empty path segment of the url, e.g. `blk-1m`
    pub fn label(&self) -> ReportResult<&str> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.ends_with(':'))
            .ok_or_else(|| ReportError::missing_field(format!("no path in url {}", self.url)))
    }

    /// Throughput in Gbps
    pub fn gbps(&self) -> ReportResult<f64> {
        if self.total_elapsed_second <= 0.0 {
            return Err(ReportError::type_mismatch(format!(
                "totalElapsedSecond must be positive for {}, got {}",
                self.url, self.total_elapsed_second
            )));
        }
        Ok(self.total_size as f64 * 8.0 / self.total_elapsed_second / BYTES_PER_GIB)
    }
}

impl ReportParser for Block {
    fn name(&self) -> &'static str {
        "block"
    }

    fn label_set(&self) -> LabelSet {
        LabelSet::new(&BLOCK_LABELS)
    }

    fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            bar_width: 0.25,
            y_desc: "Gbps",
            ..Default::default()
        }
    }

    fn parse_str(&self, source_name: &str, content: &str) -> ReportResult<DataSet> {
        let label_set = self.label_set();
        let mut records = Vec::new();
        for run in parse_output(content)? {
            let label = run.label()?;
            let record = MetricRecord::new(label, run.gbps()?)?;
            if !label_set.contains(label) {
                warn!("Ignoring {} in {source_name}, not a known block size", run.url);
                continue;
            }
            records.push(record);
        }
        debug!("{} block runs in {source_name}", records.len());
        DataSet::from_records(source_name, label_set, self.aggregation.fold(records))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn line(url: &str, size: u64, secs: f64) -> String {
        format!(
            r#"[{{"url":"{url}","count":10,"totalElapsedSecond":{secs},"totalSize":{size}}}]"#
        )
    }

    #[test]
    fn sums_runs_for_the_same_block() {
        let content = format!(
            "{}\n{}\n",
            line("http://10.0.0.2/blk-1m", GIB, 2.0),
            line("http://10.0.0.2/blk-1m", 3 * GIB, 4.0)
        );
        let set = Block::new(Aggregation::Sum)
            .parse_str("multi", &content)
            .unwrap();
        // 4 Gbps + 6 Gbps
        assert_eq!(set.get("blk-1m"), Some(4.0 + 6.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn first_keeps_a_single_sample() {
        let content = format!(
            "{}\n{}\n",
            line("http://10.0.0.2/blk-1m", GIB, 2.0),
            line("http://10.0.0.2/blk-1m", 3 * GIB, 4.0)
        );
        let set = Block::new(Aggregation::First)
            .parse_str("single", &content)
            .unwrap();
        assert_eq!(set.get("blk-1m"), Some(4.0));
    }

    #[test]
    fn multiple_runs_per_line() {
        let content = r#"[{"url":"http://h/blk-1k","count":1,"totalElapsedSecond":8.0,"totalSize":1073741824},{"url":"http://h/blk-1g","count":1,"totalElapsedSecond":1.0,"totalSize":1073741824}]"#;
        let set = Block::new(Aggregation::Sum).parse_str("x", content).unwrap();
        assert_eq!(set.get("blk-1k"), Some(1.0));
        assert_eq!(set.get("blk-1g"), Some(8.0));
    }

    #[test]
    fn full_report_is_complete() {
        let content = BLOCK_LABELS
            .iter()
            .map(|l| line(&format!("http://h/{l}"), GIB, 1.0))
            .collect::<Vec<_>>()
            .join("\n");
        let set = Block::new(Aggregation::Sum).parse_str("x", &content).unwrap();
        set.ensure_complete().unwrap();
        assert_eq!(set.ordered_values().unwrap(), vec![8.0; 8]);
    }

    #[test]
    fn unknown_blocks_are_ignored() {
        let content = line("http://h/blk-2g", GIB, 1.0);
        let set = Block::new(Aggregation::Sum).parse_str("x", &content).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_lines_fail() {
        let block = Block::new(Aggregation::Sum);
        let err = block.parse_str("x", "[{\"url\": ").unwrap_err();
        assert_eq!(err.parse_kind(), Some(common::ParseErrorKind::Syntax));

        let err = block
            .parse_str("x", r#"[{"url":"http://h/blk-1k","totalSize":1}]"#)
            .unwrap_err();
        assert_eq!(err.parse_kind(), Some(common::ParseErrorKind::MissingField));

        let err = block
            .parse_str(
                "x",
                r#"[{"url":"http://h/blk-1k","totalElapsedSecond":"slow","totalSize":1}]"#,
            )
            .unwrap_err();
        assert_eq!(err.parse_kind(), Some(common::ParseErrorKind::TypeMismatch));
    }

    #[test]
    fn zero_elapsed_is_rejected() {
        let err = Block::new(Aggregation::Sum)
            .parse_str("x", &line("http://h/blk-1k", GIB, 0.0))
            .unwrap_err();
        assert_eq!(err.parse_kind(), Some(common::ParseErrorKind::TypeMismatch));
    }

    #[test]
    fn label_is_last_path_segment() {
        let run = BlockRun {
            url: "http://localhost/blk-32m".to_owned(),
            ..Default::default()
        };
        assert_eq!(run.label().unwrap(), "blk-32m");
        let run = BlockRun {
            url: "http://localhost/data/blk-32m/".to_owned(),
            ..Default::default()
        };
        assert_eq!(run.label().unwrap(), "blk-32m");
        let run = BlockRun {
            url: "http://".to_owned(),
            ..Default::default()
        };
        assert!(run.label().is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", line("http://h/blk-512k", GIB, 1.0)).unwrap();
        let set = Block::new(Aggregation::Sum).parse_file(file.path()).unwrap();
        assert_eq!(set.get("blk-512k"), Some(8.0));
        assert_eq!(set.source_name(), file.path().display().to_string());
    }
}
