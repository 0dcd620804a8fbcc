use std::path::PathBuf;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::config::ColumnMapping;
use crate::error::{Result, StoreError};
use crate::snapshot::{RawMovement, Snapshot};
use crate::MovementStore;

/// Movements table in a SQLite database, opened read-only.
///
/// Table and column names must already be validated as plain identifiers.
pub struct SqliteStore {
    path: PathBuf,
    table: String,
    columns: ColumnMapping,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>, columns: ColumnMapping) -> Self {
        Self {
            path: path.into(),
            table: table.into(),
            columns,
        }
    }

    fn select_sql(&self) -> String {
        let c = &self.columns;
        format!(
            "SELECT \"{}\", \"{}\", \"{}\", \"{}\", \"{}\" FROM \"{}\"",
            c.id, c.municipality, c.date, c.prior_balance, c.updated_balance, self.table
        )
    }
}

impl MovementStore for SqliteStore {
    fn describe(&self) -> String {
        format!("sqlite:{}#{}", self.path.display(), self.table)
    }

    fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            return Err(StoreError::Io {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "database not found"),
            });
        }

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare(&self.select_sql())?;

        let row_iter = stmt.query_map([], |row| {
            Ok((
                value_text(row.get_ref(0)?),
                value_text(row.get_ref(1)?),
                value_text(row.get_ref(2)?),
                value_text(row.get_ref(3)?),
                value_text(row.get_ref(4)?),
            ))
        })?;

        let mut snapshot = Snapshot::default();
        for (i, row_result) in row_iter.enumerate() {
            let (id, municipality, date, prior_balance, updated_balance) = row_result?;
            snapshot.push_raw(
                RawMovement {
                    row: i as u64 + 1,
                    id,
                    municipality,
                    date,
                    prior_balance,
                    updated_balance,
                },
                &self.columns,
            )?;
        }

        log::debug!(
            "{}: {} record(s), {} skipped",
            self.describe(),
            snapshot.records.len(),
            snapshot.skipped.len()
        );
        Ok(snapshot)
    }
}

/// Text form of a SQLite value. REAL goes through its shortest round-trip
/// representation so `0.1` stays `0.1` once parsed as a decimal. BLOBs are
/// read as (lossy) UTF-8 like TEXT.
fn value_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn seed(path: &std::path::Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE movimentacoes (
                id INTEGER PRIMARY KEY,
                municipio TEXT,
                data_movimentacao TEXT,
                saldo_anterior_valor NUMERIC,
                saldo_atualizado_valor NUMERIC
            );
            INSERT INTO movimentacoes VALUES (1, 'Natal', '2024-01-01 08:00:00', 100.5, 150);
            INSERT INTO movimentacoes VALUES (2, 'Natal', '2024-01-01 18:00:00', 150, '200.25');
            INSERT INTO movimentacoes VALUES (3, NULL, '2024-01-01', 1, 2);
            INSERT INTO movimentacoes VALUES (4, 'Caicó', NULL, 1, 2);",
        )
        .unwrap();
    }

    #[test]
    fn load_normalizes_values() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("precatorios.db");
        seed(&db);

        let store = SqliteStore::new(&db, "movimentacoes", ColumnMapping::default());
        let snapshot = store.load().unwrap();

        assert_eq!(snapshot.records.len(), 2);
        let first = &snapshot.records[0];
        assert_eq!(first.movement_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.prior_balance, Decimal::from_str("100.5").unwrap());
        assert_eq!(first.updated_balance, Decimal::from(150));
        assert_eq!(snapshot.records[1].updated_balance, Decimal::from_str("200.25").unwrap());
        assert_eq!(snapshot.skipped.len(), 2);
    }

    #[test]
    fn missing_table_is_sqlite_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("precatorios.db");
        seed(&db);

        let store = SqliteStore::new(&db, "outra_tabela", ColumnMapping::default());
        assert!(matches!(store.load(), Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn missing_database_is_io_error() {
        let store = SqliteStore::new("/nonexistent/x.db", "movimentacoes", ColumnMapping::default());
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn real_values_keep_short_form() {
        assert_eq!(value_text(ValueRef::Real(0.1)).as_deref(), Some("0.1"));
        assert_eq!(value_text(ValueRef::Integer(42)).as_deref(), Some("42"));
        assert_eq!(value_text(ValueRef::Null), None);
    }

    #[test]
    fn blob_values_read_as_text() {
        assert_eq!(value_text(ValueRef::Blob(b"Natal")).as_deref(), Some("Natal"));

        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("precatorios.db");
        seed(&db);
        Connection::open(&db)
            .unwrap()
            .execute_batch(
                "INSERT INTO movimentacoes VALUES (5, CAST('Mossoró' AS BLOB), '2024-01-03', 7, 9);",
            )
            .unwrap();

        let store = SqliteStore::new(&db, "movimentacoes", ColumnMapping::default());
        let snapshot = store.load().unwrap();
        let mossoro = snapshot.records.iter().find(|r| r.id == 5).unwrap();
        assert_eq!(mossoro.municipality, "Mossoró");
        assert_eq!(snapshot.skipped.len(), 2);
    }

    #[test]
    fn skipped_rows_number_result_positions() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("precatorios.db");
        seed(&db);

        let store = SqliteStore::new(&db, "movimentacoes", ColumnMapping::default());
        let rows: Vec<u64> = store.load().unwrap().skipped.iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![3, 4]);
    }
}
