use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{ADMIN_PW, at, init_db, setup_test_db, temp_out, write_csv};

#[test]
fn test_wrong_password_is_refused() {
    let db = setup_test_db("admin_wrong_pw");
    init_db(&db);

    at(&db, "2025-05-05 10:00")
        .args(["admin", "--password", "nope", "stats"])
        .assert()
        .failure()
        .stderr(contains("Wrong admin password"));
}

#[test]
fn test_import_and_stats() {
    let db = setup_test_db("admin_import");
    init_db(&db);

    let csv = write_csv(
        "admin_import_employees",
        "NRP, Name ,Quota\nE10,Dina,\nE11,Eko,3\n",
    );

    at(&db, "2025-05-05 09:00")
        .args(["admin", "--password", ADMIN_PW, "import", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("Imported 2 of 2 row(s)"));

    // existing identities are left alone
    at(&db, "2025-05-05 09:01")
        .args(["admin", "--password", ADMIN_PW, "import", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("Imported 0 of 2 row(s)"))
        .stdout(contains("2 row(s) skipped"));

    at(&db, "2025-05-05 09:02")
        .args(["status", "E11"])
        .assert()
        .success()
        .stdout(contains("Eko"));

    at(&db, "2025-05-05 11:00")
        .args(["claim", "E10", "Dina"])
        .assert()
        .success();

    at(&db, "2025-05-05 11:05")
        .args(["admin", "--password", ADMIN_PW, "stats"])
        .assert()
        .success()
        .stdout(contains("Total employees:"))
        .stdout(contains("167 / 168"))
        .stdout(contains("claimed /"));

    at(&db, "2025-05-05 11:06")
        .args(["admin", "--password", ADMIN_PW, "today"])
        .assert()
        .success()
        .stdout(contains("Dina"))
        .stdout(contains("Eko").not());

    fs::remove_file(&csv).ok();
}

#[test]
fn test_import_rejects_bad_quota() {
    let db = setup_test_db("admin_import_bad");
    init_db(&db);

    let csv = write_csv("admin_import_bad", "nrp,name,quota\nE1,Alice,lots\n");

    at(&db, "2025-05-05 09:00")
        .args(["admin", "--password", ADMIN_PW, "import", "--file", &csv])
        .assert()
        .failure()
        .stderr(contains("Import failed"));

    fs::remove_file(&csv).ok();
}

#[test]
fn test_export_day_and_window() {
    let db = setup_test_db("admin_export");
    init_db(&db);

    at(&db, "2025-05-05 11:30")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success();
    at(&db, "2025-05-06 11:30")
        .args(["claim", "E2", "Bob"])
        .assert()
        .success();

    let day_out = temp_out("admin_export_day", "csv");
    at(&db, "2025-05-06 12:00")
        .args([
            "admin", "--password", ADMIN_PW, "export", "--file", &day_out, "--day", "2025-05-05",
        ])
        .assert()
        .success()
        .stdout(contains("export completed: 1 row(s)"));

    let content = fs::read_to_string(&day_out).expect("read export");
    assert!(content.starts_with("id,nrp,name,date,time"));
    assert!(content.contains("E1,Alice,2025-05-05,11:30:00"));
    assert!(!content.contains("Bob"));

    let window_out = temp_out("admin_export_window", "json");
    at(&db, "2025-05-06 12:00")
        .args([
            "admin", "--password", ADMIN_PW, "export", "--format", "json", "--file", &window_out,
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&window_out).expect("read json")).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // newest first
    assert_eq!(rows[0]["nrp"], "E2");

    fs::remove_file(&day_out).ok();
    fs::remove_file(&window_out).ok();
}

#[test]
fn test_purge_needs_confirmation() {
    let db = setup_test_db("admin_purge");
    init_db(&db);

    at(&db, "2025-05-05 11:30")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success();

    at(&db, "2025-05-05 12:00")
        .args(["admin", "--password", ADMIN_PW, "purge"])
        .assert()
        .success()
        .stdout(contains("--yes"));

    at(&db, "2025-05-05 12:01")
        .args(["admin", "--password", ADMIN_PW, "today"])
        .assert()
        .success()
        .stdout(contains("Alice"));

    at(&db, "2025-05-05 12:02")
        .args(["admin", "--password", ADMIN_PW, "purge", "--yes"])
        .assert()
        .success()
        .stdout(contains("Purged 1 claim(s)"));

    at(&db, "2025-05-05 12:03")
        .args(["admin", "--password", ADMIN_PW, "today"])
        .assert()
        .success()
        .stdout(contains("No claims."));
}

#[test]
fn test_log_records_claims_and_rejections() {
    let db = setup_test_db("admin_log");
    init_db(&db);

    at(&db, "2025-05-05 11:30")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success();
    at(&db, "2025-05-05 11:31")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success();

    at(&db, "2025-05-05 11:32")
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("claim"))
        .stdout(contains("already_claimed"))
        .stdout(contains("migration_applied"));
}

#[test]
fn test_import_leaves_existing_employee_untouched() {
    let db = setup_test_db("admin_import_existing");
    init_db(&db);

    at(&db, "2025-05-05 08:00")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success();

    let csv = write_csv(
        "admin_import_existing",
        "nrp,name,quota\nE1,Someone Else,0\nE2,Bob,\n",
    );

    at(&db, "2025-05-05 09:00")
        .args(["admin", "--password", ADMIN_PW, "import", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("Imported 1 of 2 row(s)"))
        .stdout(contains("1 row(s) skipped"));

    at(&db, "2025-05-05 09:01")
        .args(["status", "E1"])
        .assert()
        .success()
        .stdout(contains("Alice"))
        .stdout(contains("Someone Else").not())
        .stdout(contains("claimed at 08:00:00"));

    at(&db, "2025-05-05 09:02")
        .args(["status", "E2"])
        .assert()
        .success()
        .stdout(contains("Bob"));

    fs::remove_file(&csv).ok();
}
