use common::{ReportError, ReportResult, util::parse_number};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EtcdSummary {
    pub requests_per_sec: Option<f64>,
    pub average_latency_secs: Option<f64>,
}

/// The token right after the one containing `key`
fn value_after<'a>(tokens: &[&'a str], key: &str) -> Option<&'a str> {
    let pos = tokens.iter().position(|t| t.contains(key))?;
    tokens.get(pos + 1).copied()
}

/// Scans the summary printed by the etcd benchmark tool. Later lines win
pub fn parse_output(output: &str) -> ReportResult<EtcdSummary> {
    let mut summary = EtcdSummary::default();
    for line in output.lines() {
        let line = line.trim().replace('\t', " ");
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if line.contains("Requests/sec") {
            let token = value_after(&tokens, "Requests/sec").ok_or_else(|| {
                ReportError::missing_field(format!("no value after Requests/sec: {line:?}"))
            })?;
            summary.requests_per_sec = Some(parse_number(token, "Requests/sec")?);
        }
        if line.contains("Average") {
            let token = value_after(&tokens, "Average").ok_or_else(|| {
                ReportError::missing_field(format!("no value after Average: {line:?}"))
            })?;
            summary.average_latency_secs = Some(parse_number(token, "Average")?);
        }
    }
    Ok(summary)
}
