#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const ADMIN_PW: &str = "admin123";

pub fn mc() -> Command {
    cargo_bin_cmd!("mealclaim")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_mealclaim.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write `content` to a temp CSV file and return its path
pub fn write_csv(name: &str, content: &str) -> String {
    let p = temp_out(name, "csv");
    fs::write(&p, content).expect("write csv");
    p
}

/// Initialize a fresh test database
pub fn init_db(db_path: &str) {
    mc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Run a command against `db_path` with the clock pinned at `now`
pub fn at(db_path: &str, now: &str) -> Command {
    let mut cmd = mc();
    cmd.args(["--db", db_path, "--test", "--now", now]);
    cmd
}
