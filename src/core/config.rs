use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration (file values plus defaults).
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("📄 Current configuration:\n");
        println!("{}", yaml);
        Ok(())
    }

    /// Report missing keys and validate the loaded values.
    /// Returns true when nothing needs attention.
    pub fn check(path: &Path, cfg: &Config) -> AppResult<bool> {
        let mut clean = true;

        if path.exists() {
            let missing = missing_fields(path)?;
            if !missing.is_empty() {
                clean = false;
                warning(format!(
                    "Missing fields in {}: {} (run `config --migrate`)",
                    path.display(),
                    missing.join(", ")
                ));
            }
        } else {
            info(format!(
                "No configuration file at {}; defaults are in use.",
                path.display()
            ));
        }

        if let Err(e) = cfg.validate() {
            clean = false;
            error(format!("Invalid configuration: {}", e));
        }

        if clean {
            success("Configuration OK.");
        }
        Ok(clean)
    }

    pub fn migrate(path: &Path) -> AppResult<Vec<String>> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist (run `init` first)",
                path.display()
            )));
        }
        migrate_config_file(path)
    }

    /// Open the file in the requested editor, then $EDITOR / $VISUAL, then the
    /// platform default.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let first = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        if Self::run_editor(&first, path) {
            success(format!("Configuration file edited using '{}'", first));
            return Ok(());
        }

        if first != default_editor {
            warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                first, default_editor
            ));
            if Self::run_editor(&default_editor, path) {
                success(format!("Configuration file edited using '{}'", default_editor));
                return Ok(());
            }
        }

        Err(AppError::Config(format!(
            "could not open {} in an editor",
            path.display()
        )))
    }

    fn run_editor(editor: &str, path: &Path) -> bool {
        Command::new(editor)
            .arg(path)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
