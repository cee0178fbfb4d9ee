pub mod admin;
pub mod clock;
pub mod config;
pub mod export;
pub mod import;
pub mod ledger;
pub mod log;
pub mod scheduler;
