//! Formatting utilities used for CLI outputs.

use crate::models::summary::ClaimShare;
use crate::utils::colors::{GREEN, GREY, RESET};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Text rendition of the two-slice pool chart:
/// `[██████░░░░░░░░░░░░░░]  30.0% claimed / 70.0% remaining`
pub fn share_bar(share: &ClaimShare, width: usize) -> String {
    let filled = ((share.claimed_pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!(
        "[{GREEN}{}{GREY}{}{RESET}] {:>5.1}% claimed / {:>5.1}% remaining",
        "█".repeat(filled),
        "░".repeat(width - filled),
        share.claimed_pct,
        share.remaining_pct
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_proportional() {
        let share = ClaimShare::of(42, 168);
        let bar = share_bar(&share, 20);
        assert_eq!(bar.matches('█').count(), 5);
        assert_eq!(bar.matches('░').count(), 15);
        assert!(bar.contains("25.0% claimed"));
    }

    #[test]
    fn bar_never_overflows() {
        let share = ClaimShare::of(500, 168);
        let bar = share_bar(&share, 10);
        assert_eq!(bar.matches('█').count(), 10);
    }
}
