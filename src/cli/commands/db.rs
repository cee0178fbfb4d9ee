use super::Session;
use crate::cli::parser::Commands;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use std::fs;

/// `db --migrate --info --check --vacuum`, run in that order on one connection.
pub fn handle(cmd: &Commands, session: &Session) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let db_path = session.cfg.database.as_str();
    let mut pool = DbPool::new(db_path)?;

    if *migrate {
        info("Running pending migrations…");
        run_pending_migrations(&pool.conn)?;
        success("Schema is up to date.");
    }

    if *show_info {
        stats::print_db_info(&mut pool, db_path)?;
    }

    if *check {
        integrity_check(&pool)?;
    }

    if *vacuum {
        compact(&pool, db_path)?;
    }

    Ok(())
}

/// A damaged file is an error: the process exits non-zero.
fn integrity_check(pool: &DbPool) -> AppResult<()> {
    info("Running integrity check…");

    let problems: Vec<String> = pool
        .conn
        .prepare("PRAGMA integrity_check")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    match problems.as_slice() {
        [only] if only == "ok" => {
            success("Integrity check passed.");
            Ok(())
        }
        _ => Err(AppError::Other(format!(
            "integrity check failed: {}",
            problems.join("; ")
        ))),
    }
}

fn compact(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let size = |p: &str| fs::metadata(p).map(|m| m.len()).unwrap_or(0);

    let before = size(db_path);
    pool.conn.execute_batch("VACUUM;")?;
    let after = size(db_path);

    success(format!(
        "Vacuum completed: {:.1} KB → {:.1} KB",
        before as f64 / 1024.0,
        after as f64 / 1024.0
    ));
    Ok(())
}
