use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

/// Size of the shared daily pool in every deployment so far.
pub const DEFAULT_POOL_SIZE: i64 = 168;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: i64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default)]
    pub clear_claims_on_reset: bool,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval_secs: u64,
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}
fn default_pool_size() -> i64 {
    DEFAULT_POOL_SIZE
}
fn default_retention_days() -> u32 {
    7
}
fn default_admin_password() -> String {
    "admin123".to_string()
}
fn default_maintenance_interval() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            timezone: default_timezone(),
            pool_size: default_pool_size(),
            retention_days: default_retention_days(),
            clear_claims_on_reset: false,
            admin_password: default_admin_password(),
            maintenance_interval_secs: default_maintenance_interval(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("mealclaim")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".mealclaim")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("mealclaim.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("mealclaim.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Resolve the configured IANA timezone ("Asia/Jakarta", "Europe/Rome", ...).
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(self.timezone.clone()))
    }

    /// Sanity checks that serde cannot express.
    pub fn validate(&self) -> AppResult<()> {
        self.tz()?;

        if self.pool_size <= 0 {
            return Err(AppError::Config(format!(
                "pool_size must be positive (got {})",
                self.pool_size
            )));
        }
        if self.maintenance_interval_secs == 0 {
            return Err(AppError::Config(
                "maintenance_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            dir.join("mealclaim.sqlite")
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                AppError::from(io::Error::new(
                    e.kind(),
                    format!("Cannot create database {}: {}", db_path.display(), e),
                ))
            })?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
