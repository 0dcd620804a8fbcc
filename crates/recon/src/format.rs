//! Display helpers for dates and money amounts.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ReconError, Result};

/// Day/month/year, e.g. `31/01/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Reject strftime patterns chrono cannot render.
pub fn validate_date_format(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(ReconError::InvalidInput("date format must not be empty".into()));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ReconError::InvalidInput(format!("invalid date format '{pattern}'")));
    }
    // Time and zone fields parse fine but fail to render on a bare date.
    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDate::MIN.format(pattern)).map_err(|_| {
        ReconError::InvalidInput(format!("date format '{pattern}' needs more than a date"))
    })?;
    Ok(())
}

/// Render a date with a pattern already checked by [`validate_date_format`].
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}

/// Two decimals with comma thousands separators: `1,234.50`, `-12.00`.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{}.{frac_part}", group_thousands(int_part))
}

/// Like [`format_money`] with a leading `+` on strictly positive values.
pub fn format_signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_money(value))
    } else {
        format_money(value)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
