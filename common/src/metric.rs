use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// A single normalized measurement, already converted to its canonical unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub label: String,
    pub value: f64,
}

impl MetricRecord {
    /// Builds a record, rejecting values the data model cannot hold
    pub fn new(label: impl Into<String>, value: f64) -> ReportResult<Self> {
        let label = label.into();
        if !value.is_finite() || value < 0.0 {
            return Err(ReportError::type_mismatch(format!(
                "value for {label} must be finite and non-negative, got {value}"
            )));
        }
        Ok(Self { label, value })
    }
}

/// One group on the x axis: the key used for lookups and the text printed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub display: String,
}

/// The ordered vocabulary of labels a benchmark family reports.
///
/// Order fixes x axis placement. When `secondary_from` is set, labels at and
/// after that index are bound to the secondary y axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<Label>,
    secondary_from: Option<usize>,
}

impl LabelSet {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            labels: keys
                .iter()
                .map(|k| Label {
                    key: (*k).to_owned(),
                    display: (*k).to_owned(),
                })
                .collect(),
            secondary_from: None,
        }
    }

    /// Same keys, but printed differently on the axis
    pub fn with_display(mut self, display: &[&str]) -> Self {
        for (label, display) in self.labels.iter_mut().zip(display) {
            label.display = (*display).to_owned();
        }
        self
    }

    pub fn with_secondary_from(mut self, index: usize) -> Self {
        self.secondary_from = Some(index);
        self
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn secondary_from(&self) -> Option<usize> {
        self.secondary_from
    }

    pub fn contains(&self, key: &str) -> bool {
        self.labels.iter().any(|l| l.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.key == key)
    }
}

/// The normalized result of one input file, one series on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    source_name: String,
    label_set: LabelSet,
    records: HashMap<String, f64>,
}

impl DataSet {
    pub fn new(source_name: impl Into<String>, label_set: LabelSet) -> Self {
        Self {
            source_name: source_name.into(),
            label_set,
            records: HashMap::new(),
        }
    }

    /// Builds a data set from already folded records
    pub fn from_records(
        source_name: impl Into<String>,
        label_set: LabelSet,
        records: impl IntoIterator<Item = MetricRecord>,
    ) -> ReportResult<Self> {
        let mut set = Self::new(source_name, label_set);
        for record in records {
            set.insert(record)?;
        }
        Ok(set)
    }

    /// Adds a record. Labels outside the label set and repeated labels are rejected
    pub fn insert(&mut self, record: MetricRecord) -> ReportResult<()> {
        if !self.label_set.contains(&record.label) {
            return Err(ReportError::LabelMismatch {
                series: self.source_name.clone(),
                detail: format!("unexpected label {}", record.label),
            });
        }
        if self.records.contains_key(&record.label) {
            return Err(ReportError::syntax(format!(
                "duplicate label {} in {}",
                record.label, self.source_name
            )));
        }
        self.records.insert(record.label, record.value);
        Ok(())
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn label_set(&self) -> &LabelSet {
        &self.label_set
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.records.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fails with [`ReportError::MissingMetric`] on the first label without a value
    pub fn ensure_complete(&self) -> ReportResult<()> {
        for key in self.label_set.keys() {
            if !self.records.contains_key(key) {
                return Err(ReportError::missing_metric(&self.source_name, key));
            }
        }
        Ok(())
    }

    /// Values in label set order
    pub fn ordered_values(&self) -> ReportResult<Vec<f64>> {
        self.label_set
            .keys()
            .map(|key| {
                self.get(key)
                    .ok_or_else(|| ReportError::missing_metric(&self.source_name, key))
            })
            .collect()
    }
}
