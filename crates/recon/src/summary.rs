use serde::Serialize;

use crate::delta::reconcile;
use crate::error::Result;
use crate::format::{format_date, validate_date_format, DEFAULT_DATE_FORMAT};
use crate::model::{
    BalanceKind, LongFormRow, MovementRecord, PartitionSummary, SummaryMeta, SummaryRow,
    SummaryTable,
};

/// Restrict the summary to one municipality, or keep them all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MunicipalityFilter {
    #[default]
    All,
    Only(String),
}

impl MunicipalityFilter {
    pub fn from_option(municipality: Option<String>) -> Self {
        match municipality {
            Some(name) => Self::Only(name),
            None => Self::All,
        }
    }

    pub fn matches(&self, municipality: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == municipality,
        }
    }
}

impl std::fmt::Display for MunicipalityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub filter: MunicipalityFilter,
    pub date_format: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            filter: MunicipalityFilter::All,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Build the per-day reconciliation table.
///
/// The filter applies before grouping. Rows are sorted on the raw date and
/// only then given their display string.
pub fn build_summary(records: &[MovementRecord], options: &SummaryOptions) -> Result<SummaryTable> {
    validate_date_format(&options.date_format)?;

    let partitions = reconcile(
        records
            .iter()
            .filter(|record| options.filter.matches(&record.municipality)),
    )?;

    let rows: Vec<SummaryRow> = partitions
        .into_iter()
        .map(|partition| summary_row(partition, &options.date_format))
        .collect();

    log::debug!("summary for {}: {} row(s)", options.filter, rows.len());

    Ok(SummaryTable {
        meta: SummaryMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            municipality_filter: options.filter.to_string(),
            date_format: options.date_format.clone(),
            partitions: rows.len(),
        },
        rows,
    })
}

/// One opening and one closing row per summary row, in table order.
pub fn unpivot(rows: &[SummaryRow]) -> Vec<LongFormRow> {
    rows.iter()
        .flat_map(|row| {
            [
                (BalanceKind::Opening, row.opening_balance),
                (BalanceKind::Closing, row.closing_balance),
            ]
            .into_iter()
            .map(move |(kind, value)| LongFormRow {
                date: row.date,
                date_display: row.date_display.clone(),
                municipality: row.municipality.clone(),
                kind,
                value,
            })
        })
        .collect()
}

fn summary_row(partition: PartitionSummary, date_format: &str) -> SummaryRow {
    SummaryRow {
        date_display: format_date(partition.date, date_format),
        date: partition.date,
        municipality: partition.municipality,
        opening_balance: partition.opening_balance,
        closing_balance: partition.closing_balance,
        delta: partition.delta,
    }
}
