use super::Session;
use crate::cli::parser::Commands;
use crate::core::log::LogLogic;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, session: &Session) -> AppResult<()> {
    if let Commands::Log { print, last } = cmd
        && (*print || last.is_some())
    {
        let mut pool = DbPool::new(&session.cfg.database)?;
        init_db(&pool.conn)?;
        LogLogic::print_log(&mut pool, *last)?;
    }

    Ok(())
}
