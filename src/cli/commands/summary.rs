use super::Session;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_remaining};
use crate::utils::date::{format_date, format_time};

/// Public readout: remaining meals and the most recent claim.
pub fn handle(session: &Session) -> AppResult<()> {
    let ledger = session.open_ledger()?;
    let agg = ledger.aggregate_today()?;

    header(format!("Meals for {}", format_date(&ledger.today())));
    println!(
        "Remaining today: {}{} / {}{}",
        color_for_remaining(agg.remaining, agg.pool_size),
        agg.remaining,
        agg.pool_size,
        RESET
    );
    println!("Claimed today:   {}", agg.claimed);

    match ledger.latest_claim()? {
        Some(last) => println!(
            "Latest claim:    {} {} ({} {})",
            last.nrp,
            last.name,
            format_date(&last.date),
            format_time(&last.time)
        ),
        None => println!("Latest claim:    --"),
    }

    Ok(())
}
