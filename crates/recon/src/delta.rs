use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ReconError, Result};
use crate::model::{Comparison, ComparisonResult, MovementRecord, NotFound, PartitionSummary};
use crate::partition::{partition_records, pick_closing, pick_opening, validate_municipality};

/// Compare a municipality's prior balance at the start of `date1` with its
/// updated balance at the end of `date2`.
///
/// The dates are taken as given: `date1` may be after `date2`, in which case
/// the delta can be negative. A date with no records for the municipality
/// yields `Comparison::NotFound`, never a zero delta.
pub fn point_query(
    records: &[MovementRecord],
    municipality: &str,
    date1: NaiveDate,
    date2: NaiveDate,
) -> Result<Comparison> {
    validate_municipality(municipality)?;

    let mut opening: Option<&MovementRecord> = None;
    let mut closing: Option<&MovementRecord> = None;

    for record in records.iter().filter(|r| r.municipality == municipality) {
        if record.movement_date == date1 {
            opening = Some(pick_opening(opening, record));
        }
        if record.movement_date == date2 {
            closing = Some(pick_closing(closing, record));
        }
    }

    let (opening, closing) = match (opening, closing) {
        (Some(opening), Some(closing)) => (opening, closing),
        (opening, closing) => {
            log::debug!("point query for '{municipality}' {date1}..{date2}: insufficient data");
            return Ok(Comparison::NotFound(NotFound {
                municipality: municipality.to_string(),
                missing_opening: opening.is_none().then_some(date1),
                missing_closing: closing.is_none().then_some(date2),
            }));
        }
    };

    let delta = checked_delta(
        closing.updated_balance,
        opening.prior_balance,
        municipality,
        date2,
    )?;

    Ok(Comparison::Found(ComparisonResult {
        municipality: municipality.to_string(),
        date1,
        opening_balance: opening.prior_balance,
        date2,
        closing_balance: closing.updated_balance,
        delta,
        opening_id: opening.id,
        closing_id: closing.id,
    }))
}

/// Reconcile every (date, municipality) partition present in `records`.
///
/// Rows come back sorted by date descending, municipality ascending. Any bad
/// record or overflowing partition fails the whole call.
pub fn full_reconciliation(records: &[MovementRecord]) -> Result<Vec<PartitionSummary>> {
    reconcile(records)
}

pub(crate) fn reconcile<'a, I>(records: I) -> Result<Vec<PartitionSummary>>
where
    I: IntoIterator<Item = &'a MovementRecord>,
{
    let groups = partition_records(records)?;

    let mut summaries = Vec::with_capacity(groups.len());
    for (key, partition) in groups {
        let opening_balance = partition.opening.prior_balance;
        let closing_balance = partition.closing.updated_balance;
        let delta = checked_delta(closing_balance, opening_balance, &key.municipality, key.date)?;

        summaries.push(PartitionSummary {
            date: key.date,
            municipality: key.municipality,
            opening_balance,
            closing_balance,
            delta,
            record_count: partition.record_count,
            opening_id: partition.opening.id,
            closing_id: partition.closing.id,
        });
    }

    sort_most_recent_first(&mut summaries);
    Ok(summaries)
}

/// Date descending, then municipality ascending. Stable.
pub fn sort_most_recent_first(summaries: &mut [PartitionSummary]) {
    summaries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.municipality.cmp(&b.municipality))
    });
}

fn checked_delta(
    closing: Decimal,
    opening: Decimal,
    municipality: &str,
    date: NaiveDate,
) -> Result<Decimal> {
    closing
        .checked_sub(opening)
        .ok_or_else(|| ReconError::Arithmetic {
            municipality: municipality.to_string(),
            date,
        })
}
