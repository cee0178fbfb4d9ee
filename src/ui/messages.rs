//! User-facing status lines. Everything the CLI tells a human goes through here;
//! the persistent audit trail lives in `db::log`.

use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_MAGENTA: &str = "\x1b[35m";

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Rejected,
    Error,
}

impl Level {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Info => (FG_BLUE, "ℹ️"),
            Level::Success => (FG_GREEN, "✅"),
            Level::Warning => (FG_YELLOW, "⚠️"),
            Level::Rejected => (FG_MAGENTA, "🚫"),
            Level::Error => (FG_RED, "❌"),
        }
    }
}

fn emit<T: fmt::Display>(level: Level, msg: T) {
    let (color, icon) = level.style();
    match level {
        Level::Error => eprintln!("{}{}{} {}{}", color, BOLD, icon, RESET, msg),
        _ => println!("{}{}{} {}{}", color, BOLD, icon, RESET, msg),
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Level::Info, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Level::Success, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    emit(Level::Warning, msg);
}

/// A claim the ledger turned down. Routine, so it goes to stdout.
pub fn rejected<T: fmt::Display>(msg: T) {
    emit(Level::Rejected, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    emit(Level::Error, msg);
}

/// Section header for multi-part reports.
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}{}=== {} ==={}", FG_BLUE, BOLD, msg, RESET);
}
