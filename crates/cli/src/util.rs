use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

/// Display width of a string, accounting for accents, CJK double-width, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Right-pad to `width` display columns. Longer strings are left as-is.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(sw)))
}

/// Left-pad to `width` display columns, for right-aligned amounts.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    let sw = display_width(s);
    format!("{}{}", " ".repeat(width.saturating_sub(sw)), s)
}

/// Parse a date typed on the command line: ISO `YYYY-MM-DD`, or the
/// configured display pattern (so dates copied from `saldo dates` work).
pub(crate) fn parse_user_date(value: &str, display_format: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, display_format))
        .ok()
}

/// Municipality names are trimmed when loaded; match that on the way in.
pub(crate) fn municipality_arg(value: String) -> String {
    value.trim().to_string()
}
