#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::PathBuf;
use timeportal::core::context::{RequestContext, RequestSource};
use timeportal::core::input::DayEntry;
use timeportal::core::period::Period;
use timeportal::db::catalog::{insert_code, insert_modifier};
use timeportal::db::initialize::init_db;
use timeportal::db::pool::DbPool;
use timeportal::db::users::insert_user;
use timeportal::models::role::Role;
use timeportal::models::user::User;
use timeportal::utils::date::today;

pub fn tp() -> Command {
    cargo_bin_cmd!("timeportal")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timeportal.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}.session")).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timeportal_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `init` + `seed` on a fresh database file.
pub fn init_seeded(db_path: &str) {
    tp().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
    tp().args(["--db", db_path, "seed"]).assert().success();
}

pub fn login(db_path: &str, username: &str) {
    tp().args(["--db", db_path, "login", username, "--password", "password"])
        .assert()
        .success();
}

/// A period that still accepts submissions today.
pub fn open_period() -> Period {
    let today = today();
    let current = Period::current(today).expect("current period");
    if current.is_read_only(today) {
        Period::new(1, current.year + 1).expect("next year's first period")
    } else {
        current
    }
}

// ---------------------------------------------------------------------------
// Library-level fixtures
// ---------------------------------------------------------------------------

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

/// Migrated in-memory database.
pub fn memory_db() -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory db");
    init_db(&pool.conn).expect("migrations");
    pool
}

/// Insert a user without hashing a real password, return its context.
pub fn add_user(pool: &DbPool, username: &str, role: Role) -> RequestContext {
    let user = User {
        id: 0,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-hash".to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        role,
        employee_type: None,
    };
    let id = insert_user(&pool.conn, &user).expect("insert user");
    RequestContext::new(id, username, role, RequestSource::local())
}

/// Default catalog used by most tests: Presence, Vacation and Meal (-30).
pub fn add_catalog(pool: &DbPool) {
    insert_code(&pool.conn, "Presence").expect("code");
    insert_code(&pool.conn, "Vacation").expect("code");
    insert_modifier(&pool.conn, "Meal", Some(-30)).expect("modifier");
}

pub fn day(s: &str) -> DayEntry {
    s.parse().expect("valid day entry")
}

/// Period 1 of 2025 runs from Monday 2025-01-06 to Sunday 2025-01-19.
pub fn p1_2025() -> Period {
    Period::new(1, 2025).expect("period")
}

/// A day inside `p1_2025` on which it is still open.
pub fn p1_today() -> NaiveDate {
    d("2025-01-06")
}
