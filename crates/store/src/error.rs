use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (empty path, bad identifier, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// A required field that cannot be skipped (id, balances) failed to parse.
    #[error("row {row}: cannot parse {column} '{value}'")]
    FieldParse {
        row: u64,
        column: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
