//! `saldo-recon`: per-municipality balance reconciliation engine.
//!
//! Pure engine crate: receives an in-memory snapshot of movement records,
//! returns point comparisons and per-day summaries. No CLI or IO dependencies.

pub mod catalog;
pub mod delta;
pub mod error;
pub mod format;
pub mod model;
pub mod partition;
pub mod summary;

pub use delta::{full_reconciliation, point_query};
pub use error::{ReconError, Result};
pub use model::{
    Comparison, ComparisonResult, LongFormRow, MovementRecord, NotFound, PartitionSummary,
    SummaryRow, SummaryTable,
};
pub use summary::{build_summary, unpivot, MunicipalityFilter, SummaryOptions};
