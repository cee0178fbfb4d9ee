pub mod admin;
pub mod claim;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod maintain;
pub mod status;
pub mod summary;
pub mod watch;

use crate::config::Config;
use crate::core::clock::{Clock, FixedClock, ZonedClock};
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::utils::date::parse_local_datetime;
use chrono::NaiveDateTime;

/// Everything a command handler needs besides its own arguments.
pub struct Session {
    pub cfg: Config,
    pub now: Option<NaiveDateTime>,
}

impl Session {
    pub fn new(cfg: Config, now: Option<&str>) -> AppResult<Self> {
        let now = now.map(parse_local_datetime).transpose()?;
        Ok(Self { cfg, now })
    }

    pub fn clock(&self) -> AppResult<Box<dyn Clock>> {
        let clock: Box<dyn Clock> = match self.now {
            Some(now) => Box::new(FixedClock::new(now)),
            None => Box::new(ZonedClock::new(self.cfg.tz()?)),
        };
        Ok(clock)
    }

    /// Open the ledger without touching the day-rollover state.
    pub fn open_ledger_raw(&self) -> AppResult<Ledger> {
        Ledger::open(&self.cfg, self.clock()?)
    }

    /// Open the ledger and run the (idempotent) daily maintenance first, so
    /// every command sees quotas that belong to today.
    pub fn open_ledger(&self) -> AppResult<Ledger> {
        let mut ledger = self.open_ledger_raw()?;
        ledger.maintain()?;
        Ok(ledger)
    }
}
