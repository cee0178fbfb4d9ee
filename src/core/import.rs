//! Bulk employee import from CSV (`nrp,name,quota`).
//!
//! The whole file is parsed and validated before anything touches the
//! database; a bad row fails the import with nothing written.

use crate::errors::{AppError, AppResult};
use crate::models::outcome::ImportReport;
use rusqlite::{Connection, TransactionBehavior, params};
use serde::Deserialize;
use std::io::Read;

const REQUIRED_COLUMNS: [&str; 3] = ["nrp", "name", "quota"];

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    nrp: String,
    name: String,
    quota: Option<i64>,
}

/// A validated import row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub nrp: String,
    pub name: String,
    pub quota: i64,
}

pub fn parse_employee_csv<R: Read>(reader: R, default_quota: i64) -> AppResult<Vec<EmployeeRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::Import(format!("cannot read header row: {e}")))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.eq_ignore_ascii_case(col)))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Import(format!(
            "missing column(s): {} (expected header: nrp,name,quota)",
            missing.join(", ")
        )));
    }

    // serde matches headers case-sensitively
    let normalized: csv::StringRecord = headers.iter().map(|h| h.to_ascii_lowercase()).collect();
    rdr.set_headers(normalized);

    let mut out = Vec::new();
    for (idx, result) in rdr.deserialize::<EmployeeRow>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let row = result.map_err(|e| AppError::Import(format!("line {line}: {e}")))?;

        if row.nrp.is_empty() {
            return Err(AppError::Import(format!("line {line}: empty nrp")));
        }
        let quota = row.quota.unwrap_or(default_quota);
        if quota < 0 {
            return Err(AppError::Import(format!(
                "line {line}: negative quota {quota}"
            )));
        }

        out.push(EmployeeRecord {
            nrp: row.nrp,
            name: row.name,
            quota,
        });
    }

    Ok(out)
}

/// Append the records in one transaction. Identities already present (in the
/// table or earlier in the same file) are left untouched.
pub fn insert_employees(conn: &mut Connection, records: &[EmployeeRecord]) -> AppResult<ImportReport> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut report = ImportReport {
        rows: records.len(),
        ..ImportReport::default()
    };

    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO employees (nrp, name, quota) VALUES (?1, ?2, ?3)",
        )?;
        for r in records {
            if stmt.execute(params![r.nrp, r.name, r.quota])? == 1 {
                report.inserted += 1;
            } else {
                report.skipped += 1;
            }
        }
    }

    tx.commit()?;
    Ok(report)
}
