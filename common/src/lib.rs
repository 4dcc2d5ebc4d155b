pub mod aggregate;
pub mod bench;
pub mod error;
pub mod layout;
pub mod metric;
pub mod plot;
pub mod util;

pub use error::{ParseErrorKind, ReportError, ReportResult};
