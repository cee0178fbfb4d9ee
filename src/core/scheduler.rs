//! Periodic maintenance: daily reset + retention sweep on a timer.
//!
//! The worker owns its own `Ledger` (and so its own connection). Overlapping
//! ticks, or a scheduler running next to CLI commands that maintain lazily,
//! are harmless: the reset is guarded by the date stored in `metadata`.

use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::outcome::ResetOutcome;
use crate::ui::messages::{error, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Run maintenance every `interval` until `stop` fires (or is dropped), or
/// `max_ticks` passes have run. Returns the number of passes.
pub fn run_maintenance_loop(
    ledger: &mut Ledger,
    interval: Duration,
    stop: &Receiver<()>,
    max_ticks: Option<usize>,
) -> usize {
    let mut ticks = 0;

    loop {
        match ledger.maintain() {
            Ok(report) => {
                if let ResetOutcome::Performed {
                    today,
                    employees_reset,
                    ..
                } = report.reset
                {
                    info(format!(
                        "Daily reset for {}: {} quota(s) restored",
                        today, employees_reset
                    ));
                }
                if report.swept > 0 {
                    info(format!("Retention sweep removed {} claim(s)", report.swept));
                }
            }
            // storage trouble is reported and retried on the next tick
            Err(e) => error(format!("Maintenance failed: {}", e)),
        }
        ticks += 1;

        if max_ticks.is_some_and(|max| ticks >= max) {
            return ticks;
        }

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return ticks,
        }
    }
}

/// Handle to a background maintenance thread.
pub struct MaintenanceScheduler {
    stop: Sender<()>,
    handle: JoinHandle<usize>,
}

impl MaintenanceScheduler {
    pub fn spawn(mut ledger: Ledger, interval: Duration) -> AppResult<Self> {
        let (stop, rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("mealclaim-maintenance".into())
            .spawn(move || run_maintenance_loop(&mut ledger, interval, &rx, None))?;

        Ok(Self { stop, handle })
    }

    /// Signal the worker and wait for it. Returns the number of passes it ran.
    pub fn stop(self) -> AppResult<usize> {
        // a send error only means the worker already left its loop
        let _ = self.stop.send(());
        self.join()
    }

    /// Block until the worker exits on its own.
    pub fn join(self) -> AppResult<usize> {
        self.handle
            .join()
            .map_err(|_| AppError::Other("maintenance thread panicked".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::ledger::QuotaPolicy;
    use crate::db::pool::DbPool;
    use crate::db::queries;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn ledger(clock: Arc<FixedClock>) -> Ledger {
        Ledger::with_pool(
            DbPool::in_memory().unwrap(),
            QuotaPolicy::default(),
            Box::new(clock),
        )
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn bounded_loop_resets_once_per_day() {
        let clock = Arc::new(FixedClock::new(day(1).and_hms_opt(0, 0, 5).unwrap()));
        let mut ledger = ledger(clock.clone());
        ledger.claim("E1", "Alice").unwrap();

        let (_tx, rx) = mpsc::channel();
        let ticks = run_maintenance_loop(&mut ledger, Duration::from_millis(1), &rx, Some(3));
        assert_eq!(ticks, 3);
        assert_eq!(queries::last_reset(ledger.conn()).unwrap(), Some(day(1)));

        let resets: i64 = ledger
            .conn()
            .query_row("SELECT COUNT(*) FROM log WHERE operation = 'reset'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(resets, 1);
    }

    #[test]
    fn background_thread_stops_on_request() {
        let clock = Arc::new(FixedClock::new(day(2).and_hms_opt(12, 0, 0).unwrap()));
        let scheduler =
            MaintenanceScheduler::spawn(ledger(clock), Duration::from_secs(3600)).unwrap();

        // first pass runs immediately, then the worker waits on the channel
        let ticks = scheduler.stop().unwrap();
        assert_eq!(ticks, 1);
    }
}
