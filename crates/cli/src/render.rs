//! Human-readable rendering of engine results.

use saldo_recon::format::{format_date, format_money, format_signed};
use saldo_recon::{ComparisonResult, LongFormRow, NotFound, SummaryRow};
use saldo_store::DisplayConfig;

use crate::util::{display_width, pad_left, pad_right};

fn money(display: &DisplayConfig, value: rust_decimal::Decimal) -> String {
    format!("{} {}", display.currency_symbol, format_money(value))
}

pub(crate) fn comparison(result: &ComparisonResult, display: &DisplayConfig) -> String {
    let date1 = format_date(result.date1, &display.date_format);
    let date2 = format_date(result.date2, &display.date_format);

    let labels = [
        format!("prior balance ({date1})"),
        format!("updated balance ({date2})"),
        "delta".to_string(),
    ];
    let values = [
        money(display, result.opening_balance),
        money(display, result.closing_balance),
        format!("{} {}", display.currency_symbol, format_signed(result.delta)),
    ];

    let label_width = labels.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let value_width = values.iter().map(|v| display_width(v)).max().unwrap_or(0);

    let mut out = format!("{}\n", result.municipality);
    for (label, value) in labels.iter().zip(&values) {
        out.push_str(&format!(
            "  {}  {}\n",
            pad_right(label, label_width),
            pad_left(value, value_width)
        ));
    }
    out
}

pub(crate) fn not_found(missing: &NotFound, display: &DisplayConfig) -> String {
    let dates: Vec<String> = missing
        .missing_dates()
        .into_iter()
        .map(|d| format_date(d, &display.date_format))
        .collect();
    format!(
        "insufficient data for '{}': no movements on {}",
        missing.municipality,
        dates.join(", ")
    )
}

/// Aligned text table; text columns left-aligned, amounts right-aligned.
fn table(headers: &[&str], rows: &[Vec<String>], numeric_from: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i >= numeric_from {
                    pad_left(cell, widths[i])
                } else {
                    pad_right(cell, widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.iter().map(|h| h.to_string()).collect()));
    out.push('\n');
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.clone()));
        out.push('\n');
    }
    out
}

pub(crate) fn summary(rows: &[SummaryRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.date_display.clone(),
                r.municipality.clone(),
                format_money(r.opening_balance),
                format_money(r.closing_balance),
                format_signed(r.delta),
            ]
        })
        .collect();
    table(&["Date", "Municipality", "Opening", "Closing", "Delta"], &body, 2)
}

pub(crate) fn long_form(rows: &[LongFormRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.date_display.clone(),
                r.municipality.clone(),
                r.kind.to_string(),
                format_money(r.value),
            ]
        })
        .collect();
    table(&["Date", "Municipality", "Balance", "Value"], &body, 3)
}
