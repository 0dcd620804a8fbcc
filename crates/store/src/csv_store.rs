use std::io::Read;
use std::path::PathBuf;

use crate::config::ColumnMapping;
use crate::error::{Result, StoreError};
use crate::snapshot::{RawMovement, Snapshot};
use crate::MovementStore;

/// Headered CSV export of the movements table.
pub struct CsvStore {
    path: PathBuf,
    columns: ColumnMapping,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping) -> Self {
        Self { path: path.into(), columns }
    }
}

impl MovementStore for CsvStore {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load(&self) -> Result<Snapshot> {
        let file = std::fs::File::open(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = read_movements(file, &self.columns)?;
        log::debug!(
            "{}: {} record(s), {} skipped",
            self.describe(),
            snapshot.records.len(),
            snapshot.skipped.len()
        );
        Ok(snapshot)
    }
}

/// Read movements from any CSV source using the column mapping.
pub fn read_movements<R: Read>(source: R, columns: &ColumnMapping) -> Result<Snapshot> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let idx = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| StoreError::MissingColumn { column: name.into() })
    };

    let id_idx = idx(&columns.id)?;
    let municipality_idx = idx(&columns.municipality)?;
    let date_idx = idx(&columns.date)?;
    let prior_idx = idx(&columns.prior_balance)?;
    let updated_idx = idx(&columns.updated_balance)?;

    let mut snapshot = Snapshot::default();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

        let field = |idx: usize| -> Option<String> {
            record
                .get(idx)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        snapshot.push_raw(
            RawMovement {
                row,
                id: field(id_idx),
                municipality: field(municipality_idx),
                date: field(date_idx),
                prior_balance: field(prior_idx),
                updated_balance: field(updated_idx),
            },
            columns,
        )?;
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SkipReason;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const MOVIMENTACOES: &str = "\
id,municipio,data_movimentacao,saldo_anterior_valor,saldo_atualizado_valor,observacao
1,Natal,2024-01-01 09:00:00,100.00,150.00,abertura
2,Natal,2024-01-01 17:30:00,150.00,200.00,
3,,2024-01-01,5.00,6.00,sem municipio
4,Caicó,2024-01-02,80.10,80.00,
5,Caicó,NaT,1.00,1.00,
";

    #[test]
    fn read_default_columns() {
        let snapshot = read_movements(MOVIMENTACOES.as_bytes(), &ColumnMapping::default()).unwrap();
        assert_eq!(snapshot.records.len(), 3);

        let first = &snapshot.records[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.municipality, "Natal");
        assert_eq!(first.movement_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.prior_balance, Decimal::from_str("100.00").unwrap());

        assert_eq!(snapshot.records[2].municipality, "Caicó");
        assert_eq!(snapshot.skipped.len(), 2);
        assert_eq!(snapshot.skipped[0].row, 4);
        assert_eq!(snapshot.skipped[0].reason, SkipReason::MissingMunicipality);
        assert_eq!(snapshot.skipped[1].row, 6);
        assert_eq!(snapshot.skipped[1].reason, SkipReason::UnparseableDate("NaT".into()));
    }

    #[test]
    fn read_custom_columns() {
        let csv = "\
movement_id,city,day,before,after
10,Recife,2024-05-01,1,2
";
        let columns = ColumnMapping {
            id: "movement_id".into(),
            municipality: "city".into(),
            date: "day".into(),
            prior_balance: "before".into(),
            updated_balance: "after".into(),
        };
        let snapshot = read_movements(csv.as_bytes(), &columns).unwrap();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].id, 10);
    }

    #[test]
    fn missing_column() {
        let csv = "id,municipio,data_movimentacao,saldo_anterior_valor\n1,Natal,2024-01-01,1\n";
        let err = read_movements(csv.as_bytes(), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingColumn { ref column } if column == "saldo_atualizado_valor"
        ));
    }

    #[test]
    fn store_reports_missing_file() {
        let store = CsvStore::new("/nonexistent/movimentacoes.csv", ColumnMapping::default());
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }
}
