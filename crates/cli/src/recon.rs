//! `saldo compare` and `saldo summary`.

use std::path::PathBuf;

use saldo_recon::{build_summary, point_query, unpivot, Comparison, MunicipalityFilter, SummaryOptions};

use crate::exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_NOT_FOUND, EXIT_USAGE};
use crate::util::parse_user_date;
use crate::{render, CliError, Context};

pub(crate) fn cmd_compare(
    ctx: &Context,
    municipality: String,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let records = &ctx.snapshot.records;
    let display = &ctx.config.display;

    let window = saldo_recon::catalog::default_window(records, &municipality);
    let resolve = |arg: Option<String>, fallback: Option<chrono::NaiveDate>, flag: &str| {
        match arg {
            Some(text) => parse_user_date(&text, &display.date_format).ok_or_else(|| {
                CliError::new(EXIT_USAGE, format!("cannot parse {flag} date '{text}'"))
                    .with_hint("use YYYY-MM-DD or the configured display format")
            }),
            None => fallback.ok_or_else(|| {
                CliError::new(
                    EXIT_NOT_FOUND,
                    format!("insufficient data: no movements for '{municipality}'"),
                )
                .with_hint("run `saldo municipalities` to list known names")
            }),
        }
    };
    let date1 = resolve(from, window.map(|(first, _)| first), "--from")?;
    let date2 = resolve(to, window.map(|(_, last)| last), "--to")?;

    tracing::debug!(%municipality, %date1, %date2, "point query");
    let comparison = point_query(records, &municipality, date1, date2)
        .map_err(|e| CliError::new(recon_exit_code(&e), e.to_string()))?;

    if json {
        println!("{}", to_json(&comparison)?);
    }

    match comparison {
        Comparison::Found(result) => {
            if !json {
                print!("{}", render::comparison(&result, display));
            }
            Ok(())
        }
        Comparison::NotFound(missing) => {
            let message = render::not_found(&missing, display);
            // JSON already carries the not-found payload; keep the exit code.
            Err(CliError::new(EXIT_NOT_FOUND, if json { String::new() } else { message }))
        }
    }
}

pub(crate) fn cmd_summary(
    ctx: &Context,
    municipality: Option<String>,
    long: bool,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let options = SummaryOptions {
        filter: MunicipalityFilter::from_option(municipality),
        date_format: ctx.config.display.date_format.clone(),
    };

    let table = build_summary(&ctx.snapshot.records, &options)
        .map_err(|e| CliError::new(recon_exit_code(&e), e.to_string()))?;

    let json_str = if long {
        to_json(&unpivot(&table.rows))?
    } else {
        to_json(&table)?
    };

    if let Some(ref path) = output {
        std::fs::write(path, &json_str).map_err(|e| {
            CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display()))
        })?;
        eprintln!("wrote {}", path.display());
    }

    if json {
        println!("{json_str}");
    } else if long {
        print!("{}", render::long_form(&unpivot(&table.rows)));
    } else {
        print!("{}", render::summary(&table.rows));
    }

    eprintln!(
        "{} partition(s) for {} ({} row(s) skipped at load)",
        table.meta.partitions,
        table.meta.municipality_filter,
        ctx.snapshot.skipped.len(),
    );
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))
}
