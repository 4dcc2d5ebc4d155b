use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Why a report could not be turned into a [`crate::metric::DataSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The document is not valid for its format (bad JSON, bad CSV, ...)
    Syntax,
    /// A field the format requires is absent
    MissingField,
    /// A field exists but holds the wrong kind of value
    TypeMismatch,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::Syntax => "syntax",
            ParseErrorKind::MissingField => "missing-field",
            ParseErrorKind::TypeMismatch => "type-mismatch",
        })
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Parse error ({kind}): {detail}")]
    Parse {
        kind: ParseErrorKind,
        detail: String,
    },
    #[error("Label mismatch in series {series}: {detail}")]
    LabelMismatch { series: String, detail: String },
    #[error("Series {series} has no value for {label}")]
    MissingMetric { series: String, label: String },
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Render failed: {0}")]
    Render(String),
}

impl ReportError {
    pub fn syntax(detail: impl Into<String>) -> Self {
        Self::Parse {
            kind: ParseErrorKind::Syntax,
            detail: detail.into(),
        }
    }

    pub fn missing_field(detail: impl Into<String>) -> Self {
        Self::Parse {
            kind: ParseErrorKind::MissingField,
            detail: detail.into(),
        }
    }

    pub fn type_mismatch(detail: impl Into<String>) -> Self {
        Self::Parse {
            kind: ParseErrorKind::TypeMismatch,
            detail: detail.into(),
        }
    }

    pub fn missing_metric(series: &str, label: &str) -> Self {
        Self::MissingMetric {
            series: series.to_owned(),
            label: label.to_owned(),
        }
    }

    /// The parse sub-reason, if this is a [`ReportError::Parse`]
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            ReportError::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
