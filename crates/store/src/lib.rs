//! Movement record store: configuration and loaders that produce the
//! snapshot handed to `saldo-recon`.

pub mod config;
pub mod csv_store;
pub mod error;
pub mod snapshot;
pub mod sqlite_store;

pub use config::{ColumnMapping, DisplayConfig, SaldoConfig, StoreConfig, StoreKind};
pub use csv_store::CsvStore;
pub use error::{Result, StoreError};
pub use snapshot::{SkipReason, SkippedRow, Snapshot};
pub use sqlite_store::SqliteStore;

/// Read side of the movements source. Each call returns a fresh snapshot.
pub trait MovementStore {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Snapshot>;
}

/// Build the store a validated config points at.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn MovementStore>> {
    match config.kind {
        StoreKind::Csv => Ok(Box::new(CsvStore::new(&config.path, config.columns.clone()))),
        StoreKind::Sqlite => {
            let table = config.table.clone().ok_or_else(|| {
                StoreError::ConfigValidation("store.table is required for sqlite stores".into())
            })?;
            Ok(Box::new(SqliteStore::new(&config.path, table, config.columns.clone())))
        }
    }
}
