use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::{ReconError, Result};
use crate::model::{MovementRecord, Partition, PartitionKey};

/// Group records by (date, municipality) and pick each partition's opening
/// (min id) and closing (max id) record in a single pass.
///
/// On duplicate ids the first record seen keeps its slot.
pub fn partition_records<'a, I>(records: I) -> Result<BTreeMap<PartitionKey, Partition<'a>>>
where
    I: IntoIterator<Item = &'a MovementRecord>,
{
    let mut groups: BTreeMap<PartitionKey, Partition<'a>> = BTreeMap::new();
    let mut seen = 0usize;

    for record in records {
        validate_record(record)?;
        seen += 1;

        match groups.entry(PartitionKey::of(record)) {
            Entry::Vacant(slot) => {
                slot.insert(Partition {
                    opening: record,
                    closing: record,
                    record_count: 1,
                });
            }
            Entry::Occupied(mut slot) => {
                let partition = slot.get_mut();
                partition.opening = pick_opening(Some(partition.opening), record);
                partition.closing = pick_closing(Some(partition.closing), record);
                partition.record_count += 1;
            }
        }
    }

    log::debug!("partitioned {seen} record(s) into {} partition(s)", groups.len());
    Ok(groups)
}

/// Keep whichever of `current` and `candidate` has the smaller id.
pub(crate) fn pick_opening<'a>(
    current: Option<&'a MovementRecord>,
    candidate: &'a MovementRecord,
) -> &'a MovementRecord {
    match current {
        Some(current) if current.id <= candidate.id => current,
        _ => candidate,
    }
}

/// Keep whichever of `current` and `candidate` has the larger id.
pub(crate) fn pick_closing<'a>(
    current: Option<&'a MovementRecord>,
    candidate: &'a MovementRecord,
) -> &'a MovementRecord {
    match current {
        Some(current) if current.id >= candidate.id => current,
        _ => candidate,
    }
}

pub(crate) fn validate_municipality(municipality: &str) -> Result<()> {
    if municipality.trim().is_empty() {
        return Err(ReconError::InvalidInput("municipality must not be empty".into()));
    }
    Ok(())
}

fn validate_record(record: &MovementRecord) -> Result<()> {
    validate_municipality(&record.municipality).map_err(|_| {
        ReconError::InvalidInput(format!(
            "record {} on {} has an empty municipality",
            record.id, record.movement_date
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn rec(id: i64, date: &str, muni: &str, prior: i64, updated: i64) -> MovementRecord {
        MovementRecord {
            id,
            municipality: muni.into(),
            movement_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            prior_balance: Decimal::from(prior),
            updated_balance: Decimal::from(updated),
        }
    }

    #[test]
    fn opening_and_closing_by_id() {
        let records = vec![
            rec(7, "2024-01-01", "A", 300, 350),
            rec(2, "2024-01-01", "A", 100, 150),
            rec(9, "2024-01-01", "A", 350, 400),
            rec(4, "2024-01-01", "A", 150, 300),
        ];
        let groups = partition_records(&records).unwrap();
        assert_eq!(groups.len(), 1);
        let p = groups.values().next().unwrap();
        assert_eq!(p.opening.id, 2);
        assert_eq!(p.closing.id, 9);
        assert_eq!(p.record_count, 4);
    }

    #[test]
    fn separates_dates_and_municipalities() {
        let records = vec![
            rec(1, "2024-01-01", "A", 0, 1),
            rec(2, "2024-01-01", "B", 0, 1),
            rec(3, "2024-01-02", "A", 1, 2),
            rec(4, "2024-01-01", "A", 1, 5),
        ];
        let groups = partition_records(&records).unwrap();
        assert_eq!(groups.len(), 3);

        let key = PartitionKey {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            municipality: "A".into(),
        };
        let p = &groups[&key];
        assert_eq!((p.opening.id, p.closing.id, p.record_count), (1, 4, 2));
    }

    #[test]
    fn municipality_match_is_exact() {
        let records = vec![rec(1, "2024-01-01", "Natal", 0, 1), rec(2, "2024-01-01", "natal", 0, 1)];
        let groups = partition_records(&records).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn single_record_is_both_sides() {
        let records = vec![rec(5, "2024-02-01", "B", 50, 80)];
        let groups = partition_records(&records).unwrap();
        let p = groups.values().next().unwrap();
        assert!(std::ptr::eq(p.opening, p.closing));
    }

    #[test]
    fn duplicate_ids_keep_first_seen() {
        let records = vec![rec(3, "2024-01-01", "A", 10, 20), rec(3, "2024-01-01", "A", 99, 99)];
        let groups = partition_records(&records).unwrap();
        let p = groups.values().next().unwrap();
        assert_eq!(p.opening.prior_balance, Decimal::from(10));
        assert_eq!(p.closing.updated_balance, Decimal::from(20));
    }

    #[test]
    fn rejects_blank_municipality() {
        let records = vec![rec(1, "2024-01-01", "  ", 0, 1)];
        let err = partition_records(&records).unwrap_err();
        assert!(matches!(err, ReconError::InvalidInput(_)));
    }

    #[test]
    fn empty_input_yields_no_partitions() {
        let records: Vec<MovementRecord> = Vec::new();
        assert!(partition_records(&records).unwrap().is_empty());
    }
}
