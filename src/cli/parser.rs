use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for mealclaim
/// CLI ledger for daily meal-quota claims with SQLite
#[derive(Parser)]
#[command(
    name = "mealclaim",
    version = env!("CARGO_PKG_VERSION"),
    about = "Daily meal-quota claims: one claim per employee per day against a shared pool, stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the ledger clock ("YYYY-MM-DD HH:MM[:SS]", local to the configured timezone)
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "last", help = "Only show the most recent N rows")]
        last: Option<usize>,
    },

    /// Claim today's meal
    Claim {
        /// Employee identity key (NRP)
        nrp: String,

        /// Full name (used when the employee is seen for the first time)
        name: String,
    },

    /// Show an employee's quota and whether they claimed today
    Status {
        /// Employee identity key (NRP)
        nrp: String,
    },

    /// Show today's remaining meals and the latest claim
    Summary,

    /// Run the daily reset and retention sweep once
    Maintain,

    /// Keep running maintenance on a timer
    Watch {
        #[arg(long, value_name = "SECS", help = "Seconds between passes (default: from config)")]
        interval: Option<u64>,

        #[arg(long, value_name = "N", help = "Stop after N passes")]
        ticks: Option<usize>,
    },

    /// Admin commands (password protected)
    Admin {
        #[arg(long, help = "Admin password")]
        password: String,

        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Employee totals and today's claimed/remaining split
    Stats,

    /// Employees who claimed today
    Today,

    /// Claim history, newest first
    History {
        #[arg(long, help = "Trailing days to show (default: retention window)")]
        days: Option<u32>,
    },

    /// Append employees from a CSV file (columns: nrp,name,quota)
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Export claims joined with employee names
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "days")]
        day: Option<String>,

        #[arg(long, help = "Trailing days to export (default: retention window)")]
        days: Option<u32>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete claims older than the retention window (or --days)
    Sweep {
        #[arg(long)]
        days: Option<u32>,
    },

    /// Delete ALL claim rows
    Purge {
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}
