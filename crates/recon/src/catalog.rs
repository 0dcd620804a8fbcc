//! Lookups that drive municipality and date selection.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::model::MovementRecord;

/// Distinct municipalities, sorted.
pub fn municipalities(records: &[MovementRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.municipality.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct movement dates for one municipality, oldest first.
pub fn dates_for(records: &[MovementRecord], municipality: &str) -> Vec<NaiveDate> {
    records
        .iter()
        .filter(|r| r.municipality == municipality)
        .map(|r| r.movement_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// First and last known dates for a municipality, the default comparison window.
pub fn default_window(records: &[MovementRecord], municipality: &str) -> Option<(NaiveDate, NaiveDate)> {
    let dates = dates_for(records, municipality);
    Some((*dates.first()?, *dates.last()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn rec(id: i64, date: &str, muni: &str) -> MovementRecord {
        MovementRecord {
            id,
            municipality: muni.into(),
            movement_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            prior_balance: Decimal::ZERO,
            updated_balance: Decimal::ONE,
        }
    }

    #[test]
    fn municipalities_sorted_unique() {
        let records = vec![
            rec(1, "2024-01-01", "Natal"),
            rec(2, "2024-01-01", "Caicó"),
            rec(3, "2024-01-02", "Natal"),
        ];
        assert_eq!(municipalities(&records), vec!["Caicó", "Natal"]);
    }

    #[test]
    fn dates_sorted_unique_per_municipality() {
        let records = vec![
            rec(1, "2024-01-05", "Natal"),
            rec(2, "2024-01-01", "Natal"),
            rec(3, "2024-01-05", "Natal"),
            rec(4, "2024-01-03", "Caicó"),
        ];
        let dates = dates_for(&records, "Natal");
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            ]
        );
        assert_eq!(
            default_window(&records, "Natal"),
            Some((dates[0], dates[1]))
        );
        assert_eq!(default_window(&records, "Recife"), None);
    }
}
