use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the reconciliation pipeline. There is no partial
/// success: callers either get all three result groups or one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A configured column name does not exist in the loaded table.
    #[error("column `{column}` not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Separator and quote characters must fit in a single byte for the
    /// CSV reader.
    #[error("separator/quote must be a single ASCII character, got `{0}`")]
    BadDelimiter(char),

    /// A GDP field was non-empty but not parseable as a number.
    #[error("invalid GDP figure `{value}` for {code} in {year}")]
    InvalidNumber {
        code: String,
        year: String,
        value: String,
    },

    /// log10 is undefined for zero or negative GDP figures.
    #[error("non-positive GDP figure {value} for {code} in {year}")]
    NonPositiveValue {
        code: String,
        year: String,
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
