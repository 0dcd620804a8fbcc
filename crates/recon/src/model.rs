use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One observed movement on a municipality's account.
///
/// `id` orders records that share a calendar day. It is an ordering proxy for
/// processing order, not a timestamp: rows backfilled with out-of-sequence ids
/// still give a well-defined opening/closing pick, just not a chronological one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: i64,
    pub municipality: String,
    pub movement_date: NaiveDate,
    pub prior_balance: Decimal,
    pub updated_balance: Decimal,
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Partition key = (calendar date, municipality).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    pub date: NaiveDate,
    pub municipality: String,
}

impl PartitionKey {
    pub fn of(record: &MovementRecord) -> Self {
        Self {
            date: record.movement_date,
            municipality: record.municipality.clone(),
        }
    }
}

/// The representative records of one non-empty partition.
///
/// A single-record partition holds the same record as opening and closing.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    pub opening: &'a MovementRecord,
    pub closing: &'a MovementRecord,
    pub record_count: usize,
}

/// Reconciled view of one (date, municipality) partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionSummary {
    pub date: NaiveDate,
    pub municipality: String,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub delta: Decimal,
    pub record_count: usize,
    pub opening_id: i64,
    pub closing_id: i64,
}

// ---------------------------------------------------------------------------
// Point query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub municipality: String,
    pub date1: NaiveDate,
    pub opening_balance: Decimal,
    pub date2: NaiveDate,
    pub closing_balance: Decimal,
    pub delta: Decimal,
    pub opening_id: i64,
    pub closing_id: i64,
}

/// Which side(s) of a point query had no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFound {
    pub municipality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_opening: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_closing: Option<NaiveDate>,
}

impl NotFound {
    /// Missing dates in query order, deduplicated when both sides name the same day.
    pub fn missing_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .missing_opening
            .iter()
            .chain(self.missing_closing.iter())
            .copied()
            .collect();
        dates.dedup();
        dates
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparison {
    Found(ComparisonResult),
    NotFound(NotFound),
}

impl Comparison {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Collapse into a `Result`, turning an absent side into `MissingPartition`.
    pub fn into_result(self) -> crate::Result<ComparisonResult> {
        match self {
            Self::Found(result) => Ok(result),
            Self::NotFound(missing) => {
                let date = missing
                    .missing_opening
                    .or(missing.missing_closing)
                    .ok_or_else(|| {
                        crate::ReconError::InvalidInput(
                            "not-found comparison without a missing date".into(),
                        )
                    })?;
                Err(crate::ReconError::MissingPartition {
                    municipality: missing.municipality,
                    date,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Raw date; the sort key.
    pub date: NaiveDate,
    /// Display form, produced after sorting.
    pub date_display: String,
    pub municipality: String,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub delta: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryMeta {
    pub engine_version: String,
    pub municipality_filter: String,
    pub date_format: String,
    pub partitions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub meta: SummaryMeta,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    Opening,
    Closing,
}

impl std::fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opening => write!(f, "opening"),
            Self::Closing => write!(f, "closing"),
        }
    }
}

/// Long-form (unpivoted) row for chart feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongFormRow {
    pub date: NaiveDate,
    pub date_display: String,
    pub municipality: String,
    pub kind: BalanceKind,
    pub value: Decimal,
}
