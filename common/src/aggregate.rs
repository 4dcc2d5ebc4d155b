use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metric::MetricRecord;

/// How raw records sharing a label are folded into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Total over every record, e.g. throughput of all connections
    Sum,
    /// Only the first record seen, e.g. a single connection sample
    First,
    /// Only the last record seen
    #[serde(alias = "latest")]
    Last,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Aggregation::Sum => "sum",
            Aggregation::First => "first",
            Aggregation::Last => "last",
        })
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(Aggregation::Sum),
            "first" => Ok(Aggregation::First),
            "last" | "latest" => Ok(Aggregation::Last),
            _ => Err(format!("Unknown aggregation {s}, expected sum, first or last")),
        }
    }
}

impl Aggregation {
    /// Folds `records` so that every label appears once.
    ///
    /// Output labels keep the order in which they were first seen.
    pub fn fold(self, records: impl IntoIterator<Item = MetricRecord>) -> Vec<MetricRecord> {
        let mut folded: Vec<MetricRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut raw = 0usize;

        for record in records {
            raw += 1;
            match index.get(&record.label) {
                None => {
                    index.insert(record.label.clone(), folded.len());
                    folded.push(record);
                }
                Some(&i) => match self {
                    Aggregation::Sum => folded[i].value += record.value,
                    Aggregation::First => {}
                    Aggregation::Last => folded[i].value = record.value,
                },
            }
        }

        debug!("Folded {raw} records into {} labels using {self}", folded.len());
        folded
    }
}
