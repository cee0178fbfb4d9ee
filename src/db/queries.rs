//! Plain SQL over the ledger tables. Every function takes a `&Connection`
//! so it can run inside a caller-owned transaction.

use crate::errors::AppError;
use crate::models::claim::{Claim, HistoryEntry};
use crate::models::employee::Employee;
use crate::utils::date::{format_date, format_time, parse_date, parse_time};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub const LAST_RESET_KEY: &str = "last_reset";

const HISTORY_SELECT: &str = "
    SELECT c.id, c.nrp, COALESCE(e.name, '') AS name, c.claim_date, c.claim_time
    FROM claims c
    LEFT JOIN employees e ON e.nrp = c.nrp";

const HISTORY_ORDER: &str = "ORDER BY c.claim_date DESC, c.claim_time DESC, c.id DESC";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn date_col(row: &Row, idx: usize) -> Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_date(&raw).ok_or_else(|| conversion_error(idx, AppError::InvalidDate(raw)))
}

fn time_col(row: &Row, idx: usize) -> Result<NaiveTime> {
    let raw: String = row.get(idx)?;
    parse_time(&raw).ok_or_else(|| conversion_error(idx, AppError::InvalidTime(raw)))
}

pub fn map_employee(row: &Row) -> Result<Employee> {
    Ok(Employee {
        nrp: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        quota: row.get(2)?,
    })
}

pub fn map_claim(row: &Row) -> Result<Claim> {
    Ok(Claim {
        id: row.get(0)?,
        nrp: row.get(1)?,
        date: date_col(row, 2)?,
        time: time_col(row, 3)?,
    })
}

pub fn map_history(row: &Row) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        nrp: row.get(1)?,
        name: row.get(2)?,
        date: date_col(row, 3)?,
        time: time_col(row, 4)?,
    })
}

// ---------------------------
// Employees
// ---------------------------

pub fn find_employee(conn: &Connection, nrp: &str) -> Result<Option<Employee>> {
    conn.prepare_cached("SELECT nrp, name, quota FROM employees WHERE nrp = ?1")?
        .query_row([nrp], map_employee)
        .optional()
}

/// Insert-or-ignore. Returns true when a row was created.
pub fn insert_employee_if_absent(
    conn: &Connection,
    nrp: &str,
    name: &str,
    quota: i64,
) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO employees (nrp, name, quota) VALUES (?1, ?2, ?3)",
        params![nrp, name, quota],
    )?;
    Ok(n == 1)
}

/// Decrement one employee's quota, never below zero.
/// Returns false when there was nothing left to take.
pub fn decrement_quota(conn: &Connection, nrp: &str) -> Result<bool> {
    let n = conn.execute(
        "UPDATE employees SET quota = quota - 1 WHERE nrp = ?1 AND quota > 0",
        [nrp],
    )?;
    Ok(n == 1)
}

pub fn reset_all_quotas(conn: &Connection, quota: i64) -> Result<usize> {
    conn.execute("UPDATE employees SET quota = ?1", [quota])
}

pub fn count_employees(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM employees", [], |r| r.get(0))
}

// ---------------------------
// Claims
// ---------------------------

pub fn find_claim(conn: &Connection, nrp: &str, date: &NaiveDate) -> Result<Option<Claim>> {
    conn.prepare_cached(
        "SELECT id, nrp, claim_date, claim_time FROM claims
         WHERE nrp = ?1 AND claim_date = ?2",
    )?
    .query_row(params![nrp, format_date(date)], map_claim)
    .optional()
}

pub fn insert_claim(conn: &Connection, nrp: &str, date: &NaiveDate, time: &NaiveTime) -> Result<Claim> {
    conn.execute(
        "INSERT INTO claims (nrp, claim_date, claim_time) VALUES (?1, ?2, ?3)",
        params![nrp, format_date(date), format_time(time)],
    )?;

    Ok(Claim {
        id: conn.last_insert_rowid(),
        nrp: nrp.to_string(),
        date: *date,
        time: *time,
    })
}

pub fn count_claims_on(conn: &Connection, date: &NaiveDate) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM claims WHERE claim_date = ?1",
        [format_date(date)],
        |r| r.get(0),
    )
}

pub fn delete_claims_before(conn: &Connection, date: &NaiveDate) -> Result<usize> {
    conn.execute(
        "DELETE FROM claims WHERE claim_date < ?1",
        [format_date(date)],
    )
}

pub fn delete_all_claims(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM claims", [])
}

// ---------------------------
// History
// ---------------------------

pub fn load_history_since(conn: &Connection, since: &NaiveDate) -> Result<Vec<HistoryEntry>> {
    let sql = format!("{HISTORY_SELECT} WHERE c.claim_date >= ?1 {HISTORY_ORDER}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([format_date(since)], map_history)?;
    rows.collect()
}

pub fn load_history_on(conn: &Connection, date: &NaiveDate) -> Result<Vec<HistoryEntry>> {
    let sql = format!("{HISTORY_SELECT} WHERE c.claim_date = ?1 {HISTORY_ORDER}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([format_date(date)], map_history)?;
    rows.collect()
}

pub fn latest_claim(conn: &Connection) -> Result<Option<HistoryEntry>> {
    let sql = format!("{HISTORY_SELECT} {HISTORY_ORDER} LIMIT 1");
    conn.query_row(&sql, [], map_history).optional()
}

// ---------------------------
// Metadata
// ---------------------------

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM metadata WHERE key = ?1", [key], |r| r.get(0))
        .optional()
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

pub fn last_reset(conn: &Connection) -> Result<Option<NaiveDate>> {
    Ok(get_meta(conn, LAST_RESET_KEY)?.and_then(|v| parse_date(&v)))
}
