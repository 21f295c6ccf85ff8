mod common;

use common::{add_catalog, add_user, day, memory_db, p1_2025, p1_today, temp_out};
use std::fs;
use std::path::Path;
use timeportal::core::approval::approve;
use timeportal::core::submit::submit_period;
use timeportal::db::pool::DbPool;
use timeportal::errors::AppError;
use timeportal::export::{ExportFilter, ExportKind, ExportLogic};
use timeportal::models::audit::AuditAction;
use timeportal::models::role::Role;
use timeportal::models::timesheet::TimesheetStatus;

/// root (admin), bob (manager), alice (employee) with one approved and one
/// submitted day.
fn populated() -> (DbPool, timeportal::core::context::RequestContext) {
    let pool = memory_db();
    add_catalog(&pool);
    let admin = add_user(&pool, "root", Role::Admin);
    let mgr = add_user(&pool, "bob", Role::Manager);
    let emp = add_user(&pool, "alice", Role::Employee);

    let records = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[
            day("2025-01-06,09:00,17:00,Presence,60"),
            day("2025-01-07,09:00,17:00,Presence,60,Meal"),
        ],
        p1_today(),
    )
    .expect("submit")
    .records;
    approve(&pool.conn, &mgr, records[0].id).expect("approve");

    (pool, admin)
}

#[test]
fn test_invalid_format_writes_nothing() {
    let (pool, admin) = populated();
    let out = temp_out("export_invalid_format", "xlsx");

    let err = ExportLogic::export(
        &pool.conn,
        &admin,
        ExportKind::Users,
        "xlsx",
        Path::new(&out),
        &ExportFilter::default(),
        true,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::InvalidExportFormat(_)));
    assert!(!Path::new(&out).exists());

    let upper = ExportLogic::export(
        &pool.conn,
        &admin,
        ExportKind::Users,
        "CSV",
        Path::new(&out),
        &ExportFilter::default(),
        true,
    );
    assert!(matches!(upper, Err(AppError::InvalidExportFormat(_))));
}

#[test]
fn test_export_requires_admin_and_absolute_path() {
    let (pool, admin) = populated();
    let mgr = timeportal::core::context::RequestContext::new(
        2,
        "bob",
        Role::Manager,
        timeportal::core::context::RequestSource::local(),
    );
    let out = temp_out("export_forbidden", "csv");

    let err = ExportLogic::export(
        &pool.conn,
        &mgr,
        ExportKind::Users,
        "csv",
        Path::new(&out),
        &ExportFilter::default(),
        true,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = ExportLogic::export(
        &pool.conn,
        &admin,
        ExportKind::Users,
        "csv",
        Path::new("relative.csv"),
        &ExportFilter::default(),
        true,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!Path::new("relative.csv").exists());
}

#[test]
fn test_complete_csv_layout() {
    let (pool, admin) = populated();
    let out = temp_out("export_complete", "csv");

    let rows = ExportLogic::export(
        &pool.conn,
        &admin,
        ExportKind::Complete,
        "csv",
        Path::new(&out),
        &ExportFilter::default(),
        true,
    )
    .expect("export");
    assert_eq!(rows, 3 + 2);

    let content = fs::read_to_string(&out).expect("read csv");
    let lines: Vec<&str> = content.split("\r\n").collect();

    assert_eq!(lines[0], "--- UTILISATEURS ---");
    assert_eq!(lines[1], "ID,Nom d'utilisateur,Email,Prénom,Nom,Rôle");
    // three users, then one empty separator line
    assert_eq!(lines[5], "");
    assert_eq!(lines[6], "--- FEUILLES DE TEMPS ---");
    assert!(lines[7].starts_with("ID,Utilisateur ID,Nom utilisateur,Date"));
    assert!(lines[8].contains("2025-01-06"));
    assert!(lines[8].contains("7.00"));
    assert!(lines[8].ends_with("approved"));
    assert!(lines[9].contains("6.50"));
    assert!(lines[9].ends_with("submitted"));

    fs::remove_file(&out).ok();
}

#[test]
fn test_complete_json_has_export_date() {
    let (pool, _admin) = populated();

    let (bytes, rows) = ExportLogic::render(
        &pool.conn,
        ExportKind::Complete,
        "json".parse().unwrap(),
        &ExportFilter::default(),
    )
    .unwrap();
    assert_eq!(rows, 5);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\n    \"exportDate\""));

    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(v["exportDate"].is_string());
    assert_eq!(v["users"].as_array().unwrap().len(), 3);
    assert_eq!(v["timesheets"].as_array().unwrap().len(), 2);
    assert!(v["users"][0].get("password_hash").is_none());
}

#[test]
fn test_timesheet_export_filters() {
    let (pool, _admin) = populated();

    let mut filter = ExportFilter::default();
    filter.timesheets.status = Some(TimesheetStatus::Approved);

    let (bytes, rows) =
        ExportLogic::render(&pool.conn, ExportKind::Timesheets, "json".parse().unwrap(), &filter)
            .unwrap();
    assert_eq!(rows, 1);

    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v[0]["user"]["name"], "Test alice");
    assert_eq!(v[0]["total_hours"], "7.00");
    assert_eq!(v[0]["status"], "approved");
}

#[test]
fn test_audit_export_oldest_first() {
    let (pool, _admin) = populated();

    let mut filter = ExportFilter::default();
    filter.audit.action = Some(AuditAction::Approve);

    let (bytes, rows) =
        ExportLogic::render(&pool.conn, ExportKind::Audit, "csv".parse().unwrap(), &filter).unwrap();
    assert_eq!(rows, 1);

    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("ID,Date/Heure,Utilisateur,Action,Ressource,ID Ressource,Adresse IP,Agent utilisateur,Détails")
    );
    let row = lines.next().unwrap();
    assert!(row.contains(",bob,approve,timesheet,"));

    let (_, all) = ExportLogic::render(
        &pool.conn,
        ExportKind::Audit,
        "json".parse().unwrap(),
        &ExportFilter::default(),
    )
    .unwrap();
    // two creates and one approve
    assert_eq!(all, 3);
}

#[test]
fn test_existing_file_needs_force() {
    let (pool, admin) = populated();
    let out = temp_out("export_force", "json");
    fs::write(&out, "old").unwrap();

    ExportLogic::export(
        &pool.conn,
        &admin,
        ExportKind::Users,
        "json",
        Path::new(&out),
        &ExportFilter::default(),
        true,
    )
    .expect("forced export");

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("\"username\": \"alice\""));

    fs::remove_file(&out).ok();
}
