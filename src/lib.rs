//! mealclaim library root.
//! Exposes the CLI parser, the high-level `run()` function and the ledger modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands::{self, Session};
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::path::expand_tilde;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, session: &Session) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli, session),
        Commands::Config { .. } => commands::config::handle(&cli.command, session),
        Commands::Db { .. } => commands::db::handle(&cli.command, session),
        Commands::Log { .. } => commands::log::handle(&cli.command, session),
        Commands::Claim { .. } => commands::claim::handle(&cli.command, session),
        Commands::Status { .. } => commands::status::handle(&cli.command, session),
        Commands::Summary => commands::summary::handle(session),
        Commands::Maintain => commands::maintain::handle(session),
        Commands::Watch { .. } => commands::watch::handle(&cli.command, session),
        Commands::Admin { .. } => commands::admin::handle(&cli.command, session),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once and shared by every handler
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = expand_tilde(custom_db).to_string_lossy().to_string();
    }

    let session = Session::new(cfg, cli.now.as_deref())?;
    dispatch(&cli, &session)
}
