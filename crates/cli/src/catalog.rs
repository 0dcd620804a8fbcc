//! `saldo municipalities` and `saldo dates`.

use std::io::Write;

use saldo_recon::catalog::{dates_for, municipalities};
use saldo_recon::format::format_date;

use crate::exit_codes::{EXIT_ERROR, EXIT_NOT_FOUND};
use crate::{CliError, Context};

pub(crate) fn cmd_municipalities(ctx: &Context, json: bool) -> Result<(), CliError> {
    let names = municipalities(&ctx.snapshot.records);
    if json {
        return print_json(&names);
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for name in names {
        writeln!(handle, "{name}").map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    }
    Ok(())
}

pub(crate) fn cmd_dates(ctx: &Context, municipality: String, json: bool) -> Result<(), CliError> {
    let dates = dates_for(&ctx.snapshot.records, &municipality);
    if dates.is_empty() {
        return Err(CliError::new(
            EXIT_NOT_FOUND,
            format!("insufficient data: no movements for '{municipality}'"),
        )
        .with_hint("run `saldo municipalities` to list known names"));
    }

    if json {
        return print_json(&dates);
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for date in dates {
        writeln!(handle, "{}", format_date(date, &ctx.config.display.date_format))
            .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    println!("{json_str}");
    Ok(())
}
