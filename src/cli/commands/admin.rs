use super::Session;
use crate::cli::parser::{AdminCommands, Commands};
use crate::core::admin::AdminGate;
use crate::core::export::{ExportLogic, ExportSelection};
use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::claim::HistoryEntry;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{format_date, format_time, parse_date_arg};
use crate::utils::formatting::{bold, share_bar};
use crate::utils::table::Table;
use std::fs::File;
use std::io::BufReader;

const SHARE_BAR_WIDTH: usize = 30;

/// Handle `admin --password <PW> <subcommand>`.
pub fn handle(cmd: &Commands, session: &Session) -> AppResult<()> {
    let Commands::Admin { password, command } = cmd else {
        return Ok(());
    };

    AdminGate::from_config(&session.cfg).verify(password)?;
    let mut ledger = session.open_ledger()?;

    match command {
        AdminCommands::Stats => stats(&ledger),
        AdminCommands::Today => {
            let today = ledger.today();
            header(format!("Claims on {}", format_date(&today)));
            print_history(&ledger.claims_on(&today)?);
            Ok(())
        }
        AdminCommands::History { days } => {
            let days = days.unwrap_or(ledger.policy().retention_days);
            header(format!("Claims of the last {} day(s)", days));
            print_history(&ledger.history_window(days)?);
            Ok(())
        }
        AdminCommands::Import { file } => import(&mut ledger, file),
        AdminCommands::Export {
            format,
            file,
            day,
            days,
            force,
        } => {
            let selection = match day {
                Some(d) => ExportSelection::Day(parse_date_arg(d)?),
                None => ExportSelection::Window(days.unwrap_or(ledger.policy().retention_days)),
            };
            ExportLogic::export(&ledger, *format, file, selection, *force)?;
            Ok(())
        }
        AdminCommands::Sweep { days } => {
            let window = days.unwrap_or(ledger.policy().retention_days);
            let deleted = ledger.retention_sweep(window)?;
            success(format!(
                "Removed {} claim(s) older than {} day(s)",
                deleted, window
            ));
            Ok(())
        }
        AdminCommands::Purge { yes } => {
            if !*yes {
                warning("This deletes every claim row. Re-run with --yes to confirm.");
                return Ok(());
            }
            let deleted = ledger.purge_claims()?;
            success(format!("Purged {} claim(s)", deleted));
            Ok(())
        }
    }
}

fn stats(ledger: &Ledger) -> AppResult<()> {
    let summary = ledger.admin_summary()?;
    let agg = ledger.aggregate_today()?;

    header(format!("Statistics for {}", format_date(&ledger.today())));
    println!("{} {}", bold("Total employees:"), summary.total_employees);
    println!("{} {}", bold("Claimed today:  "), summary.claimed_today);
    println!("{} {}", bold("Not claimed:    "), summary.not_claimed);
    println!(
        "{} {} / {}",
        bold("Pool remaining: "),
        agg.remaining,
        agg.pool_size
    );
    println!("{}", share_bar(&summary.share, SHARE_BAR_WIDTH));
    Ok(())
}

fn import(ledger: &mut Ledger, file: &str) -> AppResult<()> {
    let reader = File::open(file)
        .map(BufReader::new)
        .map_err(|e| AppError::Import(format!("cannot open {}: {}", file, e)))?;

    let report = ledger.import_employees(reader)?;
    success(format!(
        "Imported {} of {} row(s) from {}",
        report.inserted, report.rows, file
    ));
    if report.skipped > 0 {
        info(format!(
            "{} row(s) skipped: NRP already registered",
            report.skipped
        ));
    }
    Ok(())
}

fn print_history(entries: &[HistoryEntry]) {
    let mut table = Table::new(&["#", "NRP", "NAME", "DATE", "TIME"]);
    for e in entries {
        table.add_row(vec![
            e.id.to_string(),
            e.nrp.clone(),
            e.name.clone(),
            format_date(&e.date),
            format_time(&e.time),
        ]);
    }

    if table.is_empty() {
        info("No claims.");
    } else {
        print!("{}", table.render());
    }
}
