mod common;

use common::{init_seeded, login, open_period, setup_test_db, temp_out, tp};
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    tp().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db_path).is_ok());
}

#[test]
fn test_commands_need_init_and_login() {
    let db_path = setup_test_db("cli_no_session");

    tp().args(["--db", &db_path, "whoami"])
        .assert()
        .failure()
        .stderr(contains("timeportal init"));

    init_seeded(&db_path);

    tp().args(["--db", &db_path, "list"])
        .assert()
        .failure()
        .stderr(contains("No active session"));
}

#[test]
fn test_login_whoami_logout() {
    let db_path = setup_test_db("cli_login");
    init_seeded(&db_path);

    tp().args(["--db", &db_path, "login", "employe", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(contains("Invalid username or password"));

    tp().args(["--db", &db_path, "login", "employe", "--password", "password"])
        .assert()
        .success()
        .stdout(contains("Logged in as employe (employee)"));

    tp().args(["--db", &db_path, "whoami"])
        .assert()
        .success()
        .stdout(contains("employe"));

    tp().args(["--db", &db_path, "logout"])
        .assert()
        .success()
        .stdout(contains("logged out"));

    tp().args(["--db", &db_path, "whoami"])
        .assert()
        .failure();
}

#[test]
fn test_submit_approve_and_list() {
    let db_path = setup_test_db("cli_workflow");
    init_seeded(&db_path);

    let period = open_period();
    let date = period.start().format("%Y-%m-%d").to_string();
    let number = period.number.to_string();
    let year = period.year.to_string();

    login(&db_path, "employe");
    tp().args([
        "--db",
        &db_path,
        "submit",
        "-p",
        &number,
        "-y",
        &year,
        "--day",
        &format!("{date},09:00,17:00,Presence,60,Meal"),
    ])
    .assert()
    .success()
    .stdout(contains("6.50 h (submitted)"));

    tp().args(["--db", &db_path, "period", "-p", &number, "-y", &year])
        .assert()
        .success()
        .stdout(contains("Period total: 6.50"));

    // employees cannot decide
    tp().args(["--db", &db_path, "approve", "1"])
        .assert()
        .failure()
        .stderr(contains("not allowed"));

    login(&db_path, "gestionnaire");
    tp().args(["--db", &db_path, "pending"])
        .assert()
        .success()
        .stdout(contains(date.as_str()));

    tp().args(["--db", &db_path, "approve", "1"])
        .assert()
        .success()
        .stdout(contains("approved: 6.50 h"));

    tp().args(["--db", &db_path, "approve", "1"])
        .assert()
        .failure()
        .stderr(contains("already approved"));

    tp().args(["--db", &db_path, "list", "--status", "approved", "--json"])
        .assert()
        .success()
        .stdout(contains("\"status\": \"approved\""));

    tp().args(["--db", &db_path, "report", "by-employee", "--range", &year])
        .assert()
        .success()
        .stdout(contains("employe"));
}

#[test]
fn test_submit_outside_period_is_refused() {
    let db_path = setup_test_db("cli_outside");
    init_seeded(&db_path);

    let period = open_period();
    let outside = (period.end() + chrono::TimeDelta::days(1))
        .format("%Y-%m-%d")
        .to_string();

    login(&db_path, "employe");
    tp().args([
        "--db",
        &db_path,
        "submit",
        "-p",
        &period.number.to_string(),
        "-y",
        &period.year.to_string(),
        "--day",
        &format!("{outside},09:00,17:00,Presence"),
    ])
    .assert()
    .failure()
    .stderr(contains("is outside"));
}

#[test]
fn test_admin_exports_and_reads_log() {
    let db_path = setup_test_db("cli_export");
    init_seeded(&db_path);
    login(&db_path, "admin");

    let out = temp_out("cli_export_users", "csv");
    tp().args([
        "--db", &db_path, "export", "users", "--format", "csv", "--file", &out, "--force",
    ])
    .assert()
    .success()
    .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read export");
    assert!(content.starts_with("ID,Nom d'utilisateur,Email,Prénom,Nom,Rôle\r\n"));
    assert!(content.contains("gestionnaire@example.com"));

    let bad = temp_out("cli_export_bad", "xml");
    tp().args([
        "--db", &db_path, "export", "users", "--format", "xml", "--file", &bad,
    ])
    .assert()
    .failure()
    .stderr(contains("Export format not supported"));
    assert!(fs::metadata(&bad).is_err());

    tp().args(["--db", &db_path, "log", "--action", "login_success"])
        .assert()
        .success()
        .stdout(contains("admin"))
        .stdout(contains("Actions in the log:"))
        .stdout(contains("create"));

    tp().args(["--db", &db_path, "log", "--action", "reject"])
        .assert()
        .success()
        .stdout(contains("No audit entries found."))
        .stdout(contains("login_success"));

    tp().args(["--db", &db_path, "report", "activity"])
        .assert()
        .success()
        .stdout(contains("User activity"))
        .stdout(contains("gestionnaire"))
        .stdout(contains("employe"));

    fs::remove_file(&out).ok();
}

#[test]
fn test_admin_manages_users_and_catalog() {
    let db_path = setup_test_db("cli_admin");
    init_seeded(&db_path);
    login(&db_path, "admin");

    tp().args([
        "--db",
        &db_path,
        "user",
        "add",
        "jdupont",
        "--email",
        "jdupont@example.com",
        "--password",
        "secret123",
        "--first",
        "Jean",
        "--last",
        "Dupont",
    ])
    .assert()
    .success()
    .stdout(contains("User 'jdupont' created"));

    tp().args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("jdupont"));

    tp().args(["--db", &db_path, "modifier", "add", "Travel", "-15"])
        .assert()
        .success()
        .stdout(contains("Modifier 'Travel' created (-15 min)"));

    tp().args(["--db", &db_path, "code", "add", "Presence"])
        .assert()
        .failure()
        .stderr(contains("already exists"));

    tp().args(["--db", &db_path, "stats"]).assert().success();
}

#[test]
fn test_period_beyond_the_calendar_is_refused() {
    let db_path = setup_test_db("cli_period_range");
    init_seeded(&db_path);
    login(&db_path, "employe");

    tp().args(["--db", &db_path, "period", "-y", "262143", "-p", "26"])
        .assert()
        .failure()
        .stderr(contains("invalid year 262143"));
}
