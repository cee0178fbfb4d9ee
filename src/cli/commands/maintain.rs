use super::Session;
use crate::errors::AppResult;
use crate::models::outcome::ResetOutcome;
use crate::ui::messages::{info, success};

pub fn handle(session: &Session) -> AppResult<()> {
    let mut ledger = session.open_ledger_raw()?;
    let report = ledger.maintain()?;

    match report.reset {
        ResetOutcome::Performed {
            today,
            employees_reset,
            claims_cleared,
            ..
        } => success(format!(
            "Daily reset for {}: {} quota(s) restored to {}, {} stale claim(s) cleared",
            today,
            employees_reset,
            ledger.policy().pool_size,
            claims_cleared
        )),
        ResetOutcome::AlreadyDone(today) => {
            info(format!("Daily reset already done for {}", today))
        }
    }

    info(format!(
        "Retention sweep ({} day(s)) removed {} claim(s)",
        ledger.policy().retention_days,
        report.swept
    ));
    Ok(())
}
