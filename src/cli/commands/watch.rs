use super::Session;
use crate::cli::parser::Commands;
use crate::core::scheduler::{MaintenanceScheduler, run_maintenance_loop};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::sync::mpsc;
use std::time::Duration;

pub fn handle(cmd: &Commands, session: &Session) -> AppResult<()> {
    if let Commands::Watch { interval, ticks } = cmd {
        let secs = interval.unwrap_or(session.cfg.maintenance_interval_secs).max(1);
        let interval = Duration::from_secs(secs);
        let mut ledger = session.open_ledger_raw()?;

        info(format!("Running maintenance every {}s", secs));

        match ticks {
            Some(n) => {
                let (_stop, rx) = mpsc::channel();
                let done = run_maintenance_loop(&mut ledger, interval, &rx, Some(*n));
                success(format!("Maintenance finished after {} pass(es)", done));
            }
            // runs until the process is interrupted
            None => {
                MaintenanceScheduler::spawn(ledger, interval)?.join()?;
            }
        }
    }

    Ok(())
}
