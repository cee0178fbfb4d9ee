//! The quota ledger: employees, daily claims and the day-rollover bookkeeping.
//!
//! Every state transition that reads before it writes (claiming, the daily
//! reset) runs inside a `BEGIN IMMEDIATE` transaction, so concurrent
//! processes sharing the database file are serialized on the write lock and
//! the check-then-act sequence cannot interleave.

use crate::config::{Config, DEFAULT_POOL_SIZE};
use crate::core::clock::Clock;
use crate::core::import;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::claim::{Claim, HistoryEntry};
use crate::models::employee::Employee;
use crate::models::outcome::{
    ClaimOutcome, ImportReport, MaintenanceReport, Rejection, ResetOutcome,
};
use crate::models::summary::{AdminSummary, ClaimShare, DailyAggregate};
use crate::utils::date::format_date;
use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use rusqlite::{Connection, ErrorCode, TransactionBehavior};
use std::io::Read;

/// The three independent policies of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaPolicy {
    /// Claims allowed system-wide per day, and the value quotas reset to.
    pub pool_size: i64,
    /// Trailing days of claim history kept by the retention sweep.
    pub retention_days: u32,
    /// Also drop claims dated before today when the daily reset runs.
    pub clear_claims_on_reset: bool,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            retention_days: 7,
            clear_claims_on_reset: false,
        }
    }
}

impl QuotaPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            pool_size: cfg.pool_size,
            retention_days: cfg.retention_days,
            clear_claims_on_reset: cfg.clear_claims_on_reset,
        }
    }
}

pub struct Ledger {
    pool: DbPool,
    policy: QuotaPolicy,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Open the configured database file, bringing its schema up to date.
    pub fn open(cfg: &Config, clock: Box<dyn Clock>) -> AppResult<Self> {
        cfg.validate()?;
        let pool = DbPool::new(&cfg.database)?;
        Self::with_pool(pool, QuotaPolicy::from_config(cfg), clock)
    }

    pub fn with_pool(pool: DbPool, policy: QuotaPolicy, clock: Box<dyn Clock>) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self {
            pool,
            policy,
            clock,
        })
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn days_before_today(&self, days: u32) -> Option<NaiveDate> {
        self.today().checked_sub_days(Days::new(u64::from(days)))
    }

    // ------------------------------------------------
    // Employees
    // ------------------------------------------------

    /// Insert the employee with a full quota unless the identity is already known.
    pub fn register_if_absent(&self, nrp: &str, name: &str) -> AppResult<bool> {
        let created =
            queries::insert_employee_if_absent(&self.pool.conn, nrp, name, self.policy.pool_size)?;
        if created {
            ttlog_quiet(&self.pool.conn, "register", nrp, &format!("Registered {}", name));
        }
        Ok(created)
    }

    pub fn get_employee(&self, nrp: &str) -> AppResult<Option<Employee>> {
        Ok(queries::find_employee(&self.pool.conn, nrp)?)
    }

    pub fn has_claimed_today(&self, nrp: &str) -> AppResult<Option<Claim>> {
        Ok(queries::find_claim(&self.pool.conn, nrp, &self.today())?)
    }

    // ------------------------------------------------
    // Claims
    // ------------------------------------------------

    /// Submission path: validate the form fields, register on first sight, claim.
    pub fn claim(&mut self, nrp: &str, name: &str) -> AppResult<ClaimOutcome> {
        let nrp = nrp.trim();
        let name = name.trim();
        if nrp.is_empty() {
            return Err(AppError::MissingField("nrp"));
        }
        if name.is_empty() {
            return Err(AppError::MissingField("name"));
        }

        self.register_if_absent(nrp, name)?;
        self.record_claim(nrp)
    }

    /// Admit at most one claim per employee per day.
    ///
    /// A claim that is the first write of a new day performs that day's reset
    /// in the same transaction, so the decrement it makes is never undone by a
    /// later reset. Check order: personal quota, then duplicate, then the
    /// shared pool.
    pub fn record_claim(&mut self, nrp: &str) -> AppResult<ClaimOutcome> {
        let now = self.clock.now();
        let today = now.date();
        let time = now.time().with_nanosecond(0).unwrap_or(now.time());
        let policy = self.policy.clone();

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        roll_over(&tx, &today, &policy)?;
        let outcome = admit_claim(&tx, nrp, &today, &time, policy.pool_size)?;

        match &outcome {
            ClaimOutcome::Accepted(c) => ttlog_quiet(
                &tx,
                "claim",
                nrp,
                &format!("Claim #{} on {} at {}", c.id, c.date_str(), c.time_str()),
            ),
            ClaimOutcome::Rejected(r) => {
                ttlog_quiet(&tx, "claim_rejected", r.code(), &format!("{}: {}", nrp, r))
            }
        }

        tx.commit()?;
        Ok(outcome)
    }

    // ------------------------------------------------
    // Day rollover & retention
    // ------------------------------------------------

    /// Restore every quota once per calendar day. Safe to call at any frequency.
    pub fn daily_reset(&mut self) -> AppResult<ResetOutcome> {
        let today = self.today();
        let policy = self.policy.clone();

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = roll_over(&tx, &today, &policy)?;
        tx.commit()?;

        Ok(outcome)
    }

    /// Delete claims dated strictly before `today - window_days`.
    pub fn retention_sweep(&mut self, window_days: u32) -> AppResult<usize> {
        let Some(cutoff) = self.days_before_today(window_days) else {
            return Ok(0);
        };

        let deleted = queries::delete_claims_before(&self.pool.conn, &cutoff)?;
        if deleted > 0 {
            ttlog_quiet(
                &self.pool.conn,
                "sweep",
                &format_date(&cutoff),
                &format!("Deleted {} claim(s) older than {} day(s)", deleted, window_days),
            );
        }
        Ok(deleted)
    }

    /// Daily reset followed by the configured retention sweep.
    pub fn maintain(&mut self) -> AppResult<MaintenanceReport> {
        let reset = self.daily_reset()?;
        let swept = self.retention_sweep(self.policy.retention_days)?;
        Ok(MaintenanceReport { reset, swept })
    }

    /// Admin action: drop every claim row. Quotas are left as they are.
    pub fn purge_claims(&mut self) -> AppResult<usize> {
        let deleted = queries::delete_all_claims(&self.pool.conn)?;
        ttlog_quiet(
            &self.pool.conn,
            "purge",
            "claims",
            &format!("Deleted all {} claim(s)", deleted),
        );
        Ok(deleted)
    }

    // ------------------------------------------------
    // Read models
    // ------------------------------------------------

    pub fn aggregate_today(&self) -> AppResult<DailyAggregate> {
        let claimed = queries::count_claims_on(&self.pool.conn, &self.today())?;
        Ok(DailyAggregate::new(self.policy.pool_size, claimed))
    }

    pub fn admin_summary(&self) -> AppResult<AdminSummary> {
        let total_employees = queries::count_employees(&self.pool.conn)?;
        let claimed_today = queries::count_claims_on(&self.pool.conn, &self.today())?;

        Ok(AdminSummary {
            total_employees,
            claimed_today,
            not_claimed: (total_employees - claimed_today).max(0),
            share: ClaimShare::of(claimed_today, self.policy.pool_size),
        })
    }

    /// Claims dated within the last `days` days (today included), newest first.
    pub fn history_window(&self, days: u32) -> AppResult<Vec<HistoryEntry>> {
        let since = self.days_before_today(days).unwrap_or(NaiveDate::MIN);
        Ok(queries::load_history_since(&self.pool.conn, &since)?)
    }

    pub fn claims_on(&self, date: &NaiveDate) -> AppResult<Vec<HistoryEntry>> {
        Ok(queries::load_history_on(&self.pool.conn, date)?)
    }

    pub fn latest_claim(&self) -> AppResult<Option<HistoryEntry>> {
        Ok(queries::latest_claim(&self.pool.conn)?)
    }

    // ------------------------------------------------
    // Bulk import
    // ------------------------------------------------

    pub fn import_employees<R: Read>(&mut self, reader: R) -> AppResult<ImportReport> {
        let records = import::parse_employee_csv(reader, self.policy.pool_size)?;
        let report = import::insert_employees(&mut self.pool.conn, &records)?;

        ttlog_quiet(
            &self.pool.conn,
            "import",
            "employees",
            &format!(
                "{} row(s): {} inserted, {} skipped",
                report.rows, report.inserted, report.skipped
            ),
        );
        Ok(report)
    }
}

/// Day-rollover step shared by [`Ledger::daily_reset`] and
/// [`Ledger::record_claim`]; runs inside the caller's transaction.
fn roll_over(conn: &Connection, today: &NaiveDate, policy: &QuotaPolicy) -> AppResult<ResetOutcome> {
    let previous = queries::last_reset(conn)?;
    if previous == Some(*today) {
        return Ok(ResetOutcome::AlreadyDone(*today));
    }

    let employees_reset = queries::reset_all_quotas(conn, policy.pool_size)?;
    let claims_cleared = if policy.clear_claims_on_reset {
        queries::delete_claims_before(conn, today)?
    } else {
        0
    };
    queries::set_meta(conn, queries::LAST_RESET_KEY, &format_date(today))?;

    ttlog_quiet(
        conn,
        "reset",
        &format_date(today),
        &format!(
            "Quota restored to {} for {} employee(s), {} stale claim(s) cleared",
            policy.pool_size, employees_reset, claims_cleared
        ),
    );

    Ok(ResetOutcome::Performed {
        previous,
        today: *today,
        employees_reset,
        claims_cleared,
    })
}

/// Body of [`Ledger::record_claim`]; runs inside the caller's transaction.
fn admit_claim(
    conn: &Connection,
    nrp: &str,
    today: &NaiveDate,
    time: &NaiveTime,
    pool_size: i64,
) -> AppResult<ClaimOutcome> {
    let Some(employee) = queries::find_employee(conn, nrp)? else {
        return Ok(ClaimOutcome::Rejected(Rejection::UnknownEmployee));
    };

    if !employee.has_quota() {
        return Ok(ClaimOutcome::Rejected(Rejection::QuotaExhausted));
    }

    if let Some(existing) = queries::find_claim(conn, nrp, today)? {
        return Ok(ClaimOutcome::Rejected(Rejection::AlreadyClaimed(existing)));
    }

    if queries::count_claims_on(conn, today)? >= pool_size {
        return Ok(ClaimOutcome::Rejected(Rejection::PoolExhausted { pool_size }));
    }

    let claim = match queries::insert_claim(conn, nrp, today, time) {
        Ok(claim) => claim,
        // the unique (nrp, claim_date) index fired: somebody else got there first
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return match queries::find_claim(conn, nrp, today)? {
                Some(existing) => Ok(ClaimOutcome::Rejected(Rejection::AlreadyClaimed(existing))),
                None => Err(AppError::Other(format!(
                    "claim for {} on {} violated a constraint",
                    nrp, today
                ))),
            };
        }
        Err(e) => return Err(e.into()),
    };

    // quota > 0 was read under the same write lock; failing here aborts the
    // transaction so the inserted row goes away with it
    if !queries::decrement_quota(conn, nrp)? {
        return Err(AppError::Other(format!(
            "quota of {} changed during the claim transaction",
            nrp
        )));
    }

    Ok(ClaimOutcome::Accepted(claim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use std::sync::Arc;

    fn at(date: &str, time: &str) -> chrono::NaiveDateTime {
        chrono::NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn ledger_with(policy: QuotaPolicy) -> (Ledger, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(at("2025-03-10", "11:30:00")));
        let ledger = Ledger::with_pool(
            DbPool::in_memory().unwrap(),
            policy,
            Box::new(clock.clone()),
        )
        .unwrap();
        (ledger, clock)
    }

    fn ledger() -> (Ledger, Arc<FixedClock>) {
        ledger_with(QuotaPolicy::default())
    }

    fn set_quota(ledger: &Ledger, nrp: &str, quota: i64) {
        ledger
            .conn()
            .execute(
                "UPDATE employees SET quota = ?1 WHERE nrp = ?2",
                rusqlite::params![quota, nrp],
            )
            .unwrap();
    }

    #[test]
    fn register_is_idempotent() {
        let (ledger, _) = ledger();
        assert!(ledger.register_if_absent("E1", "Alice").unwrap());
        assert!(!ledger.register_if_absent("E1", "Someone Else").unwrap());

        let e = ledger.get_employee("E1").unwrap().unwrap();
        assert_eq!(e.name, "Alice");
        assert_eq!(e.quota, 168);
        assert!(ledger.get_employee("E2").unwrap().is_none());
    }

    #[test]
    fn second_claim_same_day_is_duplicate() {
        let (mut ledger, _) = ledger();

        let first = ledger.claim("E1", "Alice").unwrap();
        let ClaimOutcome::Accepted(claim) = first else {
            panic!("first claim rejected: {:?}", first);
        };
        assert_eq!(claim.time, NaiveTime::from_hms_opt(11, 30, 0).unwrap());
        assert_eq!(ledger.has_claimed_today("E1").unwrap(), Some(claim.clone()));

        let second = ledger.claim("E1", "Alice").unwrap();
        assert_eq!(
            second,
            ClaimOutcome::Rejected(Rejection::AlreadyClaimed(claim))
        );
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 167);
    }

    #[test]
    fn blank_fields_persist_nothing() {
        let (mut ledger, _) = ledger();
        assert!(matches!(
            ledger.claim("  ", "Alice"),
            Err(AppError::MissingField("nrp"))
        ));
        assert!(matches!(
            ledger.claim("E1", ""),
            Err(AppError::MissingField("name"))
        ));
        assert!(ledger.get_employee("E1").unwrap().is_none());
    }

    #[test]
    fn unknown_identity_is_rejected() {
        let (mut ledger, _) = ledger();
        assert_eq!(
            ledger.record_claim("ghost").unwrap(),
            ClaimOutcome::Rejected(Rejection::UnknownEmployee)
        );
    }

    #[test]
    fn exhausted_quota_wins_over_duplicate() {
        let (mut ledger, _) = ledger();
        assert!(ledger.claim("E1", "Alice").unwrap().is_accepted());
        set_quota(&ledger, "E1", 0);

        assert_eq!(
            ledger.record_claim("E1").unwrap(),
            ClaimOutcome::Rejected(Rejection::QuotaExhausted)
        );
    }

    #[test]
    fn quota_steps_down_by_one_and_stops_at_zero() {
        let (mut ledger, _) = ledger();
        ledger.register_if_absent("E1", "Alice").unwrap();
        ledger.daily_reset().unwrap();
        set_quota(&ledger, "E1", 1);

        assert!(ledger.record_claim("E1").unwrap().is_accepted());
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 0);

        // with today's row gone only the counter stands in the way
        ledger.purge_claims().unwrap();
        assert_eq!(
            ledger.record_claim("E1").unwrap(),
            ClaimOutcome::Rejected(Rejection::QuotaExhausted)
        );
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 0);
    }

    #[test]
    fn claim_before_maintenance_keeps_its_decrement() {
        let (mut ledger, clock) = ledger();
        assert!(ledger.claim("E1", "Alice").unwrap().is_accepted());

        // new day, nobody ran maintenance yet
        clock.advance_days(1);
        assert!(ledger.claim("E1", "Alice").unwrap().is_accepted());
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 167);
        assert_eq!(
            queries::last_reset(ledger.conn()).unwrap(),
            Some(ledger.today())
        );

        assert_eq!(
            ledger.daily_reset().unwrap(),
            ResetOutcome::AlreadyDone(ledger.today())
        );
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 167);
        assert!(ledger.has_claimed_today("E1").unwrap().is_some());
    }

    #[test]
    fn shared_pool_caps_daily_claims() {
        let (mut ledger, _) = ledger_with(QuotaPolicy {
            pool_size: 2,
            ..QuotaPolicy::default()
        });

        assert!(ledger.claim("E1", "Alice").unwrap().is_accepted());
        assert!(ledger.claim("E2", "Bob").unwrap().is_accepted());
        assert_eq!(
            ledger.claim("E3", "Carol").unwrap(),
            ClaimOutcome::Rejected(Rejection::PoolExhausted { pool_size: 2 })
        );
        assert_eq!(ledger.aggregate_today().unwrap().remaining, 0);
    }

    #[test]
    fn daily_reset_runs_once_per_day() {
        let (mut ledger, clock) = ledger();
        ledger.register_if_absent("E1", "Alice").unwrap();

        let first = ledger.daily_reset().unwrap();
        assert!(first.performed());

        ledger.claim("E1", "Alice").unwrap();
        let again = ledger.daily_reset().unwrap();
        assert_eq!(again, ResetOutcome::AlreadyDone(ledger.today()));
        // the second call must not hand Alice her meal back
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 167);
        assert_eq!(
            queries::last_reset(ledger.conn()).unwrap(),
            Some(ledger.today())
        );

        clock.advance_days(1);
        let next = ledger.daily_reset().unwrap();
        let ResetOutcome::Performed { previous, .. } = next else {
            panic!("expected a reset on the next day");
        };
        assert_eq!(previous, NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 168);
    }

    #[test]
    fn reset_keeps_history_unless_configured() {
        let (mut keep, keep_clock) = ledger();
        keep.claim("E1", "Alice").unwrap();
        keep_clock.advance_days(1);
        keep.daily_reset().unwrap();
        assert_eq!(keep.history_window(7).unwrap().len(), 1);

        let (mut wipe, wipe_clock) = ledger_with(QuotaPolicy {
            clear_claims_on_reset: true,
            ..QuotaPolicy::default()
        });
        wipe.claim("E1", "Alice").unwrap();
        wipe_clock.advance_days(1);
        let ResetOutcome::Performed { claims_cleared, .. } = wipe.daily_reset().unwrap() else {
            panic!("expected reset");
        };
        assert_eq!(claims_cleared, 1);
        assert!(wipe.history_window(7).unwrap().is_empty());
    }

    #[test]
    fn retention_sweep_boundary() {
        let (mut ledger, _) = ledger();
        ledger.register_if_absent("E1", "Alice").unwrap();
        for (i, date) in ["2025-03-10", "2025-03-03", "2025-03-02", "2025-02-20"]
            .iter()
            .enumerate()
        {
            ledger
                .conn()
                .execute(
                    "INSERT INTO claims (nrp, claim_date, claim_time) VALUES (?1, ?2, '12:00:00')",
                    rusqlite::params![format!("E{}", i), date],
                )
                .unwrap();
        }

        // today is 2025-03-10: 03-03 is exactly 7 days back and stays
        assert_eq!(ledger.retention_sweep(7).unwrap(), 2);
        assert_eq!(ledger.retention_sweep(7).unwrap(), 0);

        let dates: Vec<String> = ledger
            .history_window(30)
            .unwrap()
            .iter()
            .map(|h| format_date(&h.date))
            .collect();
        assert_eq!(dates, vec!["2025-03-10", "2025-03-03"]);
    }

    #[test]
    fn history_is_newest_first_with_names() {
        let (mut ledger, clock) = ledger();
        ledger.claim("E1", "Alice").unwrap();
        clock.set(at("2025-03-10", "11:45:00"));
        ledger.claim("E2", "Bob").unwrap();
        clock.advance_days(1);
        ledger.daily_reset().unwrap();
        ledger.claim("E1", "Alice").unwrap();

        let h = ledger.history_window(7).unwrap();
        let got: Vec<(&str, &str)> = h.iter().map(|e| (e.nrp.as_str(), e.name.as_str())).collect();
        assert_eq!(got, vec![("E1", "Alice"), ("E2", "Bob"), ("E1", "Alice")]);

        let latest = ledger.latest_claim().unwrap().unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        let on_tenth = ledger
            .claims_on(&NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
            .unwrap();
        assert_eq!(on_tenth.len(), 2);
        assert_eq!(on_tenth[0].nrp, "E2");
    }

    #[test]
    fn admin_summary_counts() {
        let (mut ledger, _) = ledger();
        ledger.register_if_absent("E1", "Alice").unwrap();
        ledger.register_if_absent("E2", "Bob").unwrap();
        ledger.register_if_absent("E3", "Carol").unwrap();
        ledger.record_claim("E2").unwrap();

        let s = ledger.admin_summary().unwrap();
        assert_eq!(s.total_employees, 3);
        assert_eq!(s.claimed_today, 1);
        assert_eq!(s.not_claimed, 2);
        assert!((s.share.claimed_pct - 100.0 / 168.0).abs() < 1e-9);
    }

    #[test]
    fn purge_keeps_quotas() {
        let (mut ledger, _) = ledger();
        ledger.claim("E1", "Alice").unwrap();
        assert_eq!(ledger.purge_claims().unwrap(), 1);
        assert!(ledger.has_claimed_today("E1").unwrap().is_none());
        assert_eq!(ledger.get_employee("E1").unwrap().unwrap().quota, 167);
    }

    #[test]
    fn rejections_are_audited() {
        let (mut ledger, _) = ledger();
        ledger.claim("E1", "Alice").unwrap();
        ledger.claim("E1", "Alice").unwrap();

        let n: i64 = ledger
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'claim_rejected' AND target = 'already_claimed'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 1);
    }
}
