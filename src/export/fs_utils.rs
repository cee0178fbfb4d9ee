// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Check whether the export target may be written.
///
/// A missing file, or `force`, passes straight through; otherwise the user
/// is asked on stdin.
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    let stdin = io::stdin();
    confirm_overwrite(path, force, &mut stdin.lock())
}

fn confirm_overwrite<R: BufRead>(path: &Path, force: bool, input: &mut R) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => {
            info("Existing file will be overwritten.");
            Ok(())
        }
        _ => Err(AppError::Export(
            "export cancelled: existing file not overwritten".into(),
        )),
    }
}
