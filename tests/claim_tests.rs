use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{ADMIN_PW, at, init_db, setup_test_db};

#[test]
fn test_claim_then_duplicate_then_next_day() {
    let db = setup_test_db("claim_lifecycle");
    init_db(&db);

    at(&db, "2025-05-05 11:30")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success()
        .stdout(contains("Claim recorded for E1 (Alice) at 11:30:00"))
        .stdout(contains("167 / 168"));

    at(&db, "2025-05-05 11:35")
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("167 / 168"))
        .stdout(contains("E1 Alice (2025-05-05 11:30:00)"));

    at(&db, "2025-05-05 11:45")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success()
        .stdout(contains("already claimed today at 11:30:00"))
        .stdout(contains("Claim recorded").not());

    // the next day starts with a full pool
    at(&db, "2025-05-06 07:00")
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("168 / 168"));

    at(&db, "2025-05-06 07:01")
        .args(["status", "E1"])
        .assert()
        .success()
        .stdout(contains("Alice"))
        .stdout(contains("not claimed yet"));

    // yesterday's claim is still inside the retention window
    at(&db, "2025-05-06 07:02")
        .args(["admin", "--password", ADMIN_PW, "history"])
        .assert()
        .success()
        .stdout(contains("2025-05-05"))
        .stdout(contains("Alice"));

    at(&db, "2025-05-06 12:00")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success()
        .stdout(contains("Claim recorded for E1 (Alice) at 12:00:00"));
}

#[test]
fn test_old_claims_age_out() {
    let db = setup_test_db("claim_retention");
    init_db(&db);

    at(&db, "2025-05-05 11:30")
        .args(["claim", "E1", "Alice"])
        .assert()
        .success();

    at(&db, "2025-05-20 08:00")
        .arg("maintain")
        .assert()
        .success()
        .stdout(contains("Daily reset for 2025-05-20"))
        .stdout(contains("removed 1 claim(s)"));

    at(&db, "2025-05-20 08:01")
        .arg("maintain")
        .assert()
        .success()
        .stdout(contains("already done for 2025-05-20"));

    at(&db, "2025-05-20 08:02")
        .args(["admin", "--password", ADMIN_PW, "history", "--days", "30"])
        .assert()
        .success()
        .stdout(contains("No claims."));
}

#[test]
fn test_claim_requires_identity_and_name() {
    let db = setup_test_db("claim_validation");
    init_db(&db);

    at(&db, "2025-05-05 11:30")
        .args(["claim", "  ", "Alice"])
        .assert()
        .failure()
        .stderr(contains("Missing required field: nrp"));

    at(&db, "2025-05-05 11:30")
        .args(["claim", "E1", ""])
        .assert()
        .failure()
        .stderr(contains("Missing required field: name"));
}

#[test]
fn test_bad_now_value_is_an_error() {
    let db = setup_test_db("claim_bad_now");
    init_db(&db);

    at(&db, "yesterday")
        .arg("summary")
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_status_of_unknown_employee() {
    let db = setup_test_db("claim_status_unknown");
    init_db(&db);

    at(&db, "2025-05-05 09:00")
        .args(["status", "E404"])
        .assert()
        .success()
        .stdout(contains("No employee with NRP E404"));
}
