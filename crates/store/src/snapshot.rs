use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use saldo_recon::MovementRecord;

use crate::config::ColumnMapping;
use crate::error::{Result, StoreError};

/// An immutable copy of every usable movement, taken before any engine call.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<MovementRecord>,
    /// Rows dropped because they cannot be bucketed.
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based source position. For CSV this is the physical file line, so
    /// the header is line 1 and the first record is line 2. For SQLite it
    /// is the position in the `SELECT` result, starting at 1.
    pub row: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum SkipReason {
    MissingMunicipality,
    UnparseableDate(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMunicipality => write!(f, "missing municipality"),
            Self::UnparseableDate(value) => write!(f, "unparseable date '{value}'"),
        }
    }
}

/// Raw field values for one source row, as text. `None` is SQL NULL or an
/// empty CSV cell.
pub(crate) struct RawMovement {
    pub row: u64,
    pub id: Option<String>,
    pub municipality: Option<String>,
    pub date: Option<String>,
    pub prior_balance: Option<String>,
    pub updated_balance: Option<String>,
}

impl Snapshot {
    /// Normalize a raw row: skip what cannot be grouped, fail on what cannot
    /// be computed.
    pub(crate) fn push_raw(&mut self, raw: RawMovement, columns: &ColumnMapping) -> Result<()> {
        let municipality = match raw.municipality.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => {
                self.skip(raw.row, SkipReason::MissingMunicipality);
                return Ok(());
            }
        };

        let date_text = raw.date.as_deref().unwrap_or("").trim();
        let Some(movement_date) = parse_movement_date(date_text) else {
            self.skip(raw.row, SkipReason::UnparseableDate(date_text.to_string()));
            return Ok(());
        };

        let id = required(raw.row, &columns.id, raw.id.as_deref(), |s| s.parse::<i64>().ok())?;
        let prior_balance = required(
            raw.row,
            &columns.prior_balance,
            raw.prior_balance.as_deref(),
            parse_balance,
        )?;
        let updated_balance = required(
            raw.row,
            &columns.updated_balance,
            raw.updated_balance.as_deref(),
            parse_balance,
        )?;

        self.records.push(MovementRecord {
            id,
            municipality,
            movement_date,
            prior_balance,
            updated_balance,
        });
        Ok(())
    }

    fn skip(&mut self, row: u64, reason: SkipReason) {
        log::warn!("row {row} skipped: {reason}");
        self.skipped.push(SkippedRow { row, reason });
    }
}

fn required<T>(
    row: u64,
    column: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T> {
    let text = value.unwrap_or("").trim();
    parse(text).ok_or_else(|| StoreError::FieldParse {
        row,
        column: column.to_string(),
        value: text.to_string(),
    })
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a movement date, dropping any time-of-day.
pub fn parse_movement_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

/// Parse a balance as an exact decimal. Accepts plain and scientific notation.
pub fn parse_balance(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .ok()
        .or_else(|| Decimal::from_scientific(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: u64, municipality: Option<&str>, date: Option<&str>) -> RawMovement {
        RawMovement {
            row,
            id: Some(row.to_string()),
            municipality: municipality.map(String::from),
            date: date.map(String::from),
            prior_balance: Some("10.50".into()),
            updated_balance: Some("12".into()),
        }
    }

    #[test]
    fn dates_drop_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        for input in [
            "2024-01-31",
            "2024-01-31 23:59:59",
            "2024-01-31 08:15:00.123456",
            "2024-01-31T08:15:00",
            "2024-01-31 08:15",
            "2024-01-31T08:15:00-03:00",
            "31/01/2024",
            " 2024-01-31 ",
        ] {
            assert_eq!(parse_movement_date(input), Some(expected), "input {input:?}");
        }
        assert_eq!(parse_movement_date(""), None);
        assert_eq!(parse_movement_date("NaT"), None);
        assert_eq!(parse_movement_date("2024-02-30"), None);
    }

    #[test]
    fn balances_are_exact() {
        assert_eq!(parse_balance("1234.56"), Decimal::from_str("1234.56").ok());
        assert_eq!(parse_balance("-0.10"), Decimal::from_str("-0.10").ok());
        assert_eq!(parse_balance("1.5e3"), Some(Decimal::from(1500)));
        assert_eq!(parse_balance("abc"), None);
        assert_eq!(parse_balance(""), None);
    }

    #[test]
    fn skips_rows_that_cannot_be_grouped() {
        let columns = ColumnMapping::default();
        let mut snapshot = Snapshot::default();
        snapshot.push_raw(raw(2, Some("Natal"), Some("2024-01-01")), &columns).unwrap();
        snapshot.push_raw(raw(3, None, Some("2024-01-01")), &columns).unwrap();
        snapshot.push_raw(raw(4, Some("   "), Some("2024-01-01")), &columns).unwrap();
        snapshot.push_raw(raw(5, Some("Natal"), Some("not a date")), &columns).unwrap();

        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].prior_balance, Decimal::from_str("10.50").unwrap());
        assert_eq!(
            snapshot.skipped,
            vec![
                SkippedRow { row: 3, reason: SkipReason::MissingMunicipality },
                SkippedRow { row: 4, reason: SkipReason::MissingMunicipality },
                SkippedRow {
                    row: 5,
                    reason: SkipReason::UnparseableDate("not a date".into()),
                },
            ]
        );
    }

    #[test]
    fn bad_balance_is_an_error() {
        let columns = ColumnMapping::default();
        let mut snapshot = Snapshot::default();
        let mut row = raw(7, Some("Natal"), Some("2024-01-01"));
        row.updated_balance = Some("12,5".into());
        let err = snapshot.push_raw(row, &columns).unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 7: cannot parse saldo_atualizado_valor '12,5'"
        );
    }

    #[test]
    fn missing_id_is_an_error() {
        let columns = ColumnMapping::default();
        let mut snapshot = Snapshot::default();
        let mut row = raw(8, Some("Natal"), Some("2024-01-01"));
        row.id = None;
        assert!(matches!(
            snapshot.push_raw(row, &columns),
            Err(StoreError::FieldParse { row: 8, .. })
        ));
    }
}
