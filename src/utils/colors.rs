/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Remaining-slots color:
/// nothing left → red
/// under a fifth of the pool → yellow
/// otherwise → green
pub fn color_for_remaining(remaining: i64, pool_size: i64) -> &'static str {
    if remaining <= 0 {
        RED
    } else if remaining * 5 < pool_size {
        YELLOW
    } else {
        GREEN
    }
}

/// Grey placeholder for absent values ("--").
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_thresholds() {
        assert_eq!(color_for_remaining(0, 168), RED);
        assert_eq!(color_for_remaining(20, 168), YELLOW);
        assert_eq!(color_for_remaining(167, 168), GREEN);
    }
}
