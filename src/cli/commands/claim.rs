use super::Session;
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::models::outcome::{ClaimOutcome, Rejection};
use crate::ui::messages::{info, rejected, success};

/// Claim today's meal for an employee, registering them on first sight.
pub fn handle(cmd: &Commands, session: &Session) -> AppResult<()> {
    if let Commands::Claim { nrp, name } = cmd {
        let mut ledger = session.open_ledger()?;

        match ledger.claim(nrp, name)? {
            ClaimOutcome::Accepted(c) => {
                success(format!(
                    "Claim recorded for {} ({}) at {}. Enjoy your meal!",
                    c.nrp,
                    name.trim(),
                    c.time_str()
                ));
            }
            ClaimOutcome::Rejected(r) => {
                rejected(format!("{}: {}", nrp.trim(), r));
                if matches!(r, Rejection::AlreadyClaimed(_)) {
                    info("Wait for the daily reset to claim again.");
                }
            }
        }

        let agg = ledger.aggregate_today()?;
        info(format!(
            "Meals left today: {} / {}",
            agg.remaining, agg.pool_size
        ));
    }

    Ok(())
}
