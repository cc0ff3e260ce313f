//! Error types for VELEST exports

use thiserror::Error;

/// Fatal failures of an export run.
///
/// An event that ends up without any exportable phase is not an error, it is
/// reported with `log::warn!` and counted in [`crate::ExportCounts`].
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed thresholds, or a destination that already exists
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input data the exporter cannot interpret, e.g. unresolvable phase labels
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// Filesystem failure while reading the run or writing the project folder
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
