use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconError {
    /// A requested (date, municipality) partition has no records.
    #[error("insufficient data: no movements for '{municipality}' on {date}")]
    MissingPartition {
        municipality: String,
        date: NaiveDate,
    },

    /// Malformed input that should have been filtered upstream.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Decimal overflow while computing a delta.
    #[error("decimal overflow computing delta for '{municipality}' on {date}")]
    Arithmetic {
        municipality: String,
        date: NaiveDate,
    },
}

pub type Result<T> = std::result::Result<T, ReconError>;
