use crate::db::pool::DbPool;
use crate::db::queries;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW, colorize_optional};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) ROW COUNTS
    //
    let employees = queries::count_employees(&pool.conn)?;
    let claims: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM claims", [], |row| row.get(0))?;

    println!("{}• Employees:{} {}{}{}", CYAN, RESET, GREEN, employees, RESET);
    println!("{}• Claims:{} {}{}{}", CYAN, RESET, GREEN, claims, RESET);

    //
    // 3) CLAIM DATE RANGE
    //
    let (first, last): (Option<String>, Option<String>) = pool
        .conn
        .query_row(
            "SELECT MIN(claim_date), MAX(claim_date) FROM claims",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    println!("{}• Claim dates:{}", CYAN, RESET);
    println!("    from: {}", colorize_optional(first.as_deref()));
    println!("    to:   {}", colorize_optional(last.as_deref()));

    //
    // 4) LAST DAILY RESET
    //
    let last_reset = queries::get_meta(&pool.conn, queries::LAST_RESET_KEY)?;
    println!(
        "{}• Last daily reset:{} {}",
        CYAN,
        RESET,
        colorize_optional(last_reset.as_deref())
    );

    println!();
    Ok(())
}
