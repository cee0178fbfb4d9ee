use super::Session;
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, RESET};

pub fn handle(cmd: &Commands, session: &Session) -> AppResult<()> {
    if let Commands::Status { nrp } = cmd {
        let ledger = session.open_ledger()?;

        let Some(employee) = ledger.get_employee(nrp.trim())? else {
            info(format!("No employee with NRP {}", nrp.trim()));
            return Ok(());
        };

        println!("{}• NRP:{} {}", CYAN, RESET, employee.nrp);
        println!("{}• Name:{} {}", CYAN, RESET, employee.name);
        println!("{}• Quota left:{} {}", CYAN, RESET, employee.quota);

        match ledger.has_claimed_today(&employee.nrp)? {
            Some(c) => println!(
                "{}• Today:{} claimed at {} (claim #{})",
                CYAN,
                RESET,
                c.time_str(),
                c.id
            ),
            None => println!("{}• Today:{} not claimed yet", CYAN, RESET),
        }
    }

    Ok(())
}
