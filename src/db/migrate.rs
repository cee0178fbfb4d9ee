use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result, Transaction, TransactionBehavior};

const UNIQUE_DAILY_CLAIM: &str = "20251020_0001_unique_daily_claim";
const CLAIM_TIME_COLUMN: &str = "20251020_0002_claim_time_column";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the tables with the modern schema. Tables left by older
/// revisions are kept as they are and upgraded by the steps below.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            nrp    TEXT PRIMARY KEY,
            name   TEXT NOT NULL DEFAULT '',
            quota  INTEGER NOT NULL DEFAULT 168
        );

        CREATE TABLE IF NOT EXISTS claims (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nrp         TEXT NOT NULL,
            claim_date  TEXT NOT NULL,
            claim_time  TEXT NOT NULL DEFAULT '00:00:00'
        );

        CREATE TABLE IF NOT EXISTS metadata (
            key    TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_claims_date ON claims(claim_date);
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run `step` unless `version` is already recorded in the log.
fn apply_once<F>(conn: &Connection, version: &str, message: &str, step: F) -> AppResult<bool>
where
    F: FnOnce(&Connection) -> Result<()>,
{
    if is_applied(conn, version)? {
        return Ok(false);
    }

    step(conn).map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;
    ttlog(conn, "migration_applied", version, message)?;

    success(format!("Migration applied: {} → {}", version, message));
    Ok(true)
}

/// Claims written by older revisions carry only a date.
fn add_claim_time_column(conn: &Connection) -> Result<()> {
    if has_column(conn, "claims", "claim_time")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE claims ADD COLUMN claim_time TEXT NOT NULL DEFAULT '00:00:00'",
        [],
    )?;
    Ok(())
}

/// Collapse duplicate (nrp, day) rows to the earliest one, then let the
/// database refuse new duplicates.
fn enforce_unique_daily_claim(conn: &Connection) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM claims
         WHERE id NOT IN (SELECT MIN(id) FROM claims GROUP BY nrp, claim_date)",
        [],
    )?;

    if removed > 0 {
        warning(format!(
            "Removed {} duplicate claim row(s) left by an older version.",
            removed
        ));
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_claims_nrp_date ON claims(nrp, claim_date);",
    )?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Runs under one IMMEDIATE transaction so that several processes opening
/// the same file at once do not race each other through the upgrade.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    ensure_log_table(&tx)?;

    if table_exists(&tx, "claims")? && !has_column(&tx, "claims", "claim_time")? {
        warning("Legacy claims table detected, upgrading schema...");
    }
    create_schema(&tx)?;

    apply_once(
        &tx,
        CLAIM_TIME_COLUMN,
        "claims carry a time of day",
        add_claim_time_column,
    )?;
    apply_once(
        &tx,
        UNIQUE_DAILY_CLAIM,
        "one claim per employee per day enforced by index",
        enforce_unique_daily_claim,
    )?;

    tx.commit()?;
    Ok(())
}
