//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success                                           |
//! | 1    | General error (unspecified)                       |
//! | 2    | CLI usage error (bad args, unparseable date)      |
//! | 3    | Invalid or unreadable config                      |
//! | 4    | Store could not be read (IO, CSV, SQLite, fields) |
//! | 5    | Insufficient data for the requested comparison    |
//! | 6    | Engine rejected the input                         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use saldo_recon::ReconError;
use saldo_store::StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file missing, malformed, or failing validation.
pub const EXIT_CONFIG: u8 = 3;

/// Movement store unreadable or holding rows that cannot be computed.
pub const EXIT_STORE: u8 = 4;

/// A requested (date, municipality) partition has no records.
/// Not a crash: the comparison simply has no answer.
pub const EXIT_NOT_FOUND: u8 = 5;

/// Engine error (invalid input reaching the engine, decimal overflow).
pub const EXIT_ENGINE: u8 = 6;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::ConfigParse(_) | StoreError::ConfigValidation(_) => EXIT_CONFIG,
        StoreError::Io { .. }
        | StoreError::Csv(_)
        | StoreError::Sqlite(_)
        | StoreError::MissingColumn { .. }
        | StoreError::FieldParse { .. } => EXIT_STORE,
    }
}

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::MissingPartition { .. } => EXIT_NOT_FOUND,
        ReconError::InvalidInput(_) | ReconError::Arithmetic { .. } => EXIT_ENGINE,
    }
}
