use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

/// Width of the "operation (target)" column, escape codes excluded.
const OP_COLUMN_MAX: usize = 48;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[mK]").unwrap_or_else(|e| panic!("bad ANSI regex: {e}"))
});

fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// ANSI colour per audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "claim" => Colour::Green,
        "claim_rejected" => Colour::Yellow,
        "purge" | "sweep" => Colour::Red,
        "reset" => Colour::Cyan,
        "register" | "import" => Colour::Blue,
        "export" => Colour::RGB(255, 153, 51), // arancione
        "migration_applied" | "init" => Colour::Purple,
        _ => Colour::White,
    }
}

#[derive(Debug)]
struct LogEntry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

impl LogEntry {
    fn label(&self) -> String {
        if self.target.is_empty() {
            self.operation.clone()
        } else {
            format!("{} ({})", self.operation, self.target)
        }
    }

    /// Coloured operation + plain target, truncated on visible characters.
    fn render_label(&self, width: usize) -> String {
        let visible = self.label();
        let visible = if visible.chars().count() > OP_COLUMN_MAX {
            let mut s: String = visible.chars().take(OP_COLUMN_MAX - 3).collect();
            s.push_str("...");
            s
        } else {
            visible
        };

        let color = color_for_operation(&self.operation);
        let painted = match visible.split_once(' ') {
            Some((op, rest)) => format!("{} {}", color.paint(op), rest),
            None => color.paint(visible.as_str()).to_string(),
        };

        let padding = " ".repeat(width.saturating_sub(strip_ansi(&painted).chars().count()));
        format!("{painted}{padding}")
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool, limit: Option<usize>) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id DESC LIMIT ?1",
        )?;

        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = stmt.query_map([limit], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }
        entries.reverse();

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| e.label().chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_COLUMN_MAX);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|e| e.date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            println!(
                "{:>id_w$}: {:<date_w$} | {} => {}",
                e.id,
                e.date,
                e.render_label(op_w),
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
