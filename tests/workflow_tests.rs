mod common;

use common::{add_catalog, add_user, d, day, memory_db, p1_2025, p1_today, temp_out};
use std::fs;
use std::path::Path;
use timeportal::config::Config;
use timeportal::core::approval::{approve, pending, reject};
use timeportal::core::audit::{AuditRecord, list_entries, record};
use timeportal::core::context::RequestSource;
use timeportal::core::input::{DayEntry, RecordEdit};
use timeportal::core::period::Period;
use timeportal::core::submit::{edit_record, list_records, period_overview, submit_period};
use timeportal::db::audit_log::{AuditFilter, AuditOrder};
use timeportal::db::timesheets::{TimesheetFilter, find_timesheet};
use timeportal::errors::AppError;
use timeportal::models::audit::{AuditAction, AuditResource};
use timeportal::models::role::Role;
use timeportal::models::timesheet::TimesheetStatus;

fn all_entries(pool: &timeportal::db::pool::DbPool) -> Vec<timeportal::models::audit::AuditEntry> {
    timeportal::db::audit_log::query_entries(&pool.conn, &AuditFilter::default(), AuditOrder::OldestFirst)
        .expect("audit entries")
}

#[test]
fn test_submit_stores_complete_days_and_skips_the_rest() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let entries = [
        day("2025-01-06,09:00,17:00,Presence,60,Meal"),
        day("2025-01-07,09:00,17:00,Presence,60"),
        day("2025-01-08,09:00,,Presence"),
        day("2025-01-09,,,"),
    ];

    let out = submit_period(&pool.conn, &emp, &p1_2025(), &entries, p1_today()).unwrap();

    assert_eq!(out.records.len(), 2);
    assert_eq!(out.skipped, 2);
    assert_eq!(out.records[0].total_hours(), 6.5);
    assert_eq!(out.records[1].total_hours(), 7.0);
    assert!(out.records.iter().all(|r| r.status == TimesheetStatus::Submitted));

    let creates = all_entries(&pool)
        .into_iter()
        .filter(|e| e.action == AuditAction::Create && e.resource == AuditResource::Timesheet)
        .count();
    assert_eq!(creates, 2);
}

#[test]
fn test_resubmitting_a_day_updates_the_same_record() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let first = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence,60")],
        p1_today(),
    )
    .unwrap();
    let second = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,08:00,17:00,Vacation,60")],
        p1_today(),
    )
    .unwrap();

    assert_eq!(first.records[0].id, second.records[0].id);
    assert_eq!(second.records[0].total_hours(), 8.0);
    assert_eq!(second.records[0].code_name(), "Vacation");

    let all = list_records(&pool.conn, &emp, &TimesheetFilter::default()).unwrap();
    assert_eq!(all.len(), 1);

    let last = all_entries(&pool).pop().unwrap();
    assert_eq!(last.action, AuditAction::Update);
    let details = last.details_json().unwrap();
    assert_eq!(details["old"]["hours"], "7.00");
    assert_eq!(details["new"]["hours"], "8.00");
}

#[test]
fn test_day_outside_period_refuses_whole_batch() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let entries = [
        day("2025-01-06,09:00,17:00,Presence"),
        day("2025-01-20,09:00,17:00,Presence"),
    ];
    let err = submit_period(&pool.conn, &emp, &p1_2025(), &entries, p1_today()).unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(list_records(&pool.conn, &emp, &TimesheetFilter::default()).unwrap().is_empty());
}

#[test]
fn test_unknown_code_or_modifier_refuses_batch() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let bad_code = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Remote")],
        p1_today(),
    );
    assert!(matches!(bad_code, Err(AppError::Validation(_))));

    let bad_mod = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence,0,Dinner")],
        p1_today(),
    );
    assert!(matches!(bad_mod, Err(AppError::Validation(_))));
}

#[test]
fn test_closed_period_is_forbidden() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let err = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence")],
        d("2025-02-01"),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn test_manager_cannot_submit() {
    let pool = memory_db();
    add_catalog(&pool);
    let mgr = add_user(&pool, "bob", Role::Manager);

    let err = submit_period(
        &pool.conn,
        &mgr,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence")],
        p1_today(),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn test_approve_records_one_audit_entry_with_hours() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);
    let mgr = add_user(&pool, "bob", Role::Manager);

    let out = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence,60,Meal")],
        p1_today(),
    )
    .unwrap();
    let id = out.records[0].id;

    let before = all_entries(&pool).len();
    let ts = approve(&pool.conn, &mgr, id).unwrap();
    let after = all_entries(&pool);

    assert_eq!(ts.status, TimesheetStatus::Approved);
    assert_eq!(ts.validator_id, Some(mgr.user_id));
    assert_eq!(after.len(), before + 1);

    let entry = after.last().unwrap();
    assert_eq!(entry.action, AuditAction::Approve);
    assert_eq!(entry.resource_id, Some(id));
    assert_eq!(entry.user_id, Some(mgr.user_id));
    assert_eq!(entry.username.as_deref(), Some("bob"));
    let details = entry.details_json().unwrap();
    assert_eq!(details["hours"], "6.50");
    assert_eq!(details["user_id"], emp.user_id);
    assert_eq!(details["date"], "2025-01-06");

    let stored = find_timesheet(&pool.conn, id).unwrap().unwrap();
    assert_eq!(stored.status, TimesheetStatus::Approved);
}

#[test]
fn test_decided_record_cannot_be_decided_again() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);
    let mgr = add_user(&pool, "bob", Role::Manager);

    let id = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence")],
        p1_today(),
    )
    .unwrap()
    .records[0]
        .id;

    reject(&pool.conn, &mgr, id).unwrap();
    assert!(matches!(approve(&pool.conn, &mgr, id), Err(AppError::Forbidden(_))));
    assert!(matches!(
        approve(&pool.conn, &mgr, 9999),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn test_employee_cannot_decide() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let id = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence")],
        p1_today(),
    )
    .unwrap()
    .records[0]
        .id;

    assert!(matches!(approve(&pool.conn, &emp, id), Err(AppError::Forbidden(_))));
    assert!(matches!(pending(&pool.conn, &emp), Err(AppError::Forbidden(_))));
}

#[test]
fn test_rejected_day_resubmitted_goes_back_to_pending() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);
    let mgr = add_user(&pool, "bob", Role::Manager);

    let id = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence")],
        p1_today(),
    )
    .unwrap()
    .records[0]
        .id;
    reject(&pool.conn, &mgr, id).unwrap();
    assert!(pending(&pool.conn, &mgr).unwrap().is_empty());

    submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,16:00,Presence")],
        p1_today(),
    )
    .unwrap();

    let ts = find_timesheet(&pool.conn, id).unwrap().unwrap();
    assert_eq!(ts.status, TimesheetStatus::Submitted);
    assert_eq!(ts.validator_id, None);
    assert_eq!(pending(&pool.conn, &mgr).unwrap().len(), 1);
}

#[test]
fn test_edit_own_submitted_record() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let id = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence,60")],
        p1_today(),
    )
    .unwrap()
    .records[0]
        .id;

    let edit = RecordEdit {
        break_minutes: Some(30),
        modifiers: Some(vec!["Meal".to_string()]),
        ..Default::default()
    };
    let ts = edit_record(&pool.conn, &emp, id, &edit).unwrap();
    assert_eq!(ts.total_hours(), 7.0);
    assert_eq!(ts.modifiers.len(), 1);

    let stored = find_timesheet(&pool.conn, id).unwrap().unwrap();
    assert_eq!(stored.break_minutes, 30);
    assert_eq!(stored.total_hours(), 7.0);
}

#[test]
fn test_edit_refuses_other_owner_and_decided_records() {
    let pool = memory_db();
    add_catalog(&pool);
    let alice = add_user(&pool, "alice", Role::Employee);
    let carol = add_user(&pool, "carol", Role::Employee);
    let mgr = add_user(&pool, "bob", Role::Manager);

    let id = submit_period(
        &pool.conn,
        &alice,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence")],
        p1_today(),
    )
    .unwrap()
    .records[0]
        .id;

    let edit = RecordEdit {
        break_minutes: Some(15),
        ..Default::default()
    };
    assert!(matches!(
        edit_record(&pool.conn, &carol, id, &edit),
        Err(AppError::Forbidden(_))
    ));

    approve(&pool.conn, &mgr, id).unwrap();
    assert!(matches!(
        edit_record(&pool.conn, &alice, id, &edit),
        Err(AppError::Forbidden(_))
    ));

    assert!(matches!(
        edit_record(&pool.conn, &alice, id, &RecordEdit::default()),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_employee_lists_only_own_records() {
    let pool = memory_db();
    add_catalog(&pool);
    let alice = add_user(&pool, "alice", Role::Employee);
    let carol = add_user(&pool, "carol", Role::Employee);
    let mgr = add_user(&pool, "bob", Role::Manager);

    for ctx in [&alice, &carol] {
        submit_period(
            &pool.conn,
            ctx,
            &p1_2025(),
            &[day("2025-01-06,09:00,17:00,Presence")],
            p1_today(),
        )
        .unwrap();
    }

    let own = list_records(&pool.conn, &alice, &TimesheetFilter::default()).unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].user_id, alice.user_id);

    let other = TimesheetFilter {
        user_id: Some(carol.user_id),
        ..Default::default()
    };
    assert!(matches!(
        list_records(&pool.conn, &alice, &other),
        Err(AppError::Forbidden(_))
    ));

    assert_eq!(list_records(&pool.conn, &mgr, &TimesheetFilter::default()).unwrap().len(), 2);
    assert_eq!(list_records(&pool.conn, &mgr, &other).unwrap().len(), 1);

    let reversed = TimesheetFilter {
        from: Some(d("2025-02-01")),
        to: Some(d("2025-01-01")),
        ..Default::default()
    };
    assert!(matches!(
        list_records(&pool.conn, &mgr, &reversed),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_period_overview_totals() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[
            day("2025-01-06,09:00,17:00,Presence,60"),
            day("2025-01-14,09:00,13:00,Presence"),
        ],
        p1_today(),
    )
    .unwrap();

    let view = period_overview(&pool.conn, &emp, &p1_2025(), p1_today()).unwrap();
    assert_eq!(view.days.len(), 14);
    assert_eq!(view.week_totals, [7.0, 4.0]);
    assert_eq!(view.total, 11.0);
    assert_eq!(view.previous, 26);
    assert_eq!(view.next, 2);
    assert!(!view.read_only);

    let closed = period_overview(&pool.conn, &emp, &p1_2025(), d("2025-03-01")).unwrap();
    assert!(closed.read_only);

    let empty = period_overview(&pool.conn, &emp, &Period::new(2, 2025).unwrap(), p1_today()).unwrap();
    assert_eq!(empty.total, 0.0);
}

#[test]
fn test_audit_username_comes_from_user_id() {
    let pool = memory_db();
    let admin = add_user(&pool, "root", Role::Admin);

    let entry = record(
        &pool.conn,
        None,
        AuditRecord::new(AuditAction::Update, AuditResource::Code)
            .user_id(admin.user_id)
            .details("plain text"),
    )
    .unwrap();
    assert_eq!(entry.username.as_deref(), Some("root"));
    assert_eq!(entry.details.as_deref(), Some("plain text"));

    let inferred = record(
        &pool.conn,
        Some(&admin),
        AuditRecord::new(AuditAction::Create, AuditResource::Code),
    )
    .unwrap();
    assert_eq!(inferred.user_id, Some(admin.user_id));
    assert_eq!(inferred.ip_address.as_deref(), Some("127.0.0.1"));

    let unknown = record(
        &pool.conn,
        None,
        AuditRecord::new(AuditAction::Create, AuditResource::Code)
            .source(RequestSource::new("10.0.0.1", "curl")),
    )
    .unwrap();
    assert_eq!(unknown.username, None);
    assert_eq!(unknown.ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(unknown.user_agent.as_deref(), Some("curl"));
}

#[test]
fn test_audit_timestamps_never_decrease() {
    let pool = memory_db();
    let admin = add_user(&pool, "root", Role::Admin);

    for _ in 0..20 {
        record(
            &pool.conn,
            Some(&admin),
            AuditRecord::new(AuditAction::Update, AuditResource::Code),
        )
        .unwrap();
    }

    let entries = all_entries(&pool);
    assert_eq!(entries.len(), 20);
    for w in entries.windows(2) {
        assert!(w[0].timestamp <= w[1].timestamp);
        assert!(w[0].id < w[1].id);
    }
}

#[test]
fn test_audit_listing_is_admin_only() {
    let pool = memory_db();
    let admin = add_user(&pool, "root", Role::Admin);
    let mgr = add_user(&pool, "bob", Role::Manager);

    record(
        &pool.conn,
        Some(&admin),
        AuditRecord::new(AuditAction::Create, AuditResource::Code),
    )
    .unwrap();

    let filter = AuditFilter {
        action: Some(AuditAction::Create),
        ..Default::default()
    };
    assert_eq!(
        list_entries(&pool.conn, &admin, &filter, AuditOrder::NewestFirst)
            .unwrap()
            .len(),
        1
    );
    assert!(matches!(
        list_entries(&pool.conn, &mgr, &filter, AuditOrder::NewestFirst),
        Err(AppError::Forbidden(_))
    ));
}

#[test]
fn test_break_longer_than_a_day_is_rejected() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let parsed = "2025-01-06,09:00,17:00,Presence,200000000000000000".parse::<DayEntry>();
    assert!(matches!(parsed, Err(AppError::Validation(_))));
    assert!(matches!(
        "2025-01-06,09:00,17:00,Presence,1441".parse::<DayEntry>(),
        Err(AppError::Validation(_))
    ));

    let full_day = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[day("2025-01-06,09:00,17:00,Presence,1440")],
        p1_today(),
    )
    .unwrap();
    assert_eq!(full_day.records[0].total_hours(), 0.0);

    let id = full_day.records[0].id;
    let edit = RecordEdit {
        break_minutes: Some(1_000_000),
        ..Default::default()
    };
    assert!(matches!(
        edit_record(&pool.conn, &emp, id, &edit),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_unknown_code_on_skipped_day_does_not_block_batch() {
    let pool = memory_db();
    add_catalog(&pool);
    let emp = add_user(&pool, "alice", Role::Employee);

    let out = submit_period(
        &pool.conn,
        &emp,
        &p1_2025(),
        &[
            day("2025-01-06,09:00,17:00,Presence"),
            day("2025-01-07,,,Remote,0,Dinner"),
        ],
        p1_today(),
    )
    .unwrap();

    assert_eq!(out.records.len(), 1);
    assert_eq!(out.skipped, 1);
}

#[test]
fn test_config_default_break_is_bounded() {
    let path = temp_out("config_break", "yaml");

    fs::write(&path, "database: /tmp/x.sqlite\ndefault_break_minutes: 200000000000000000\n")
        .expect("write config");
    assert!(matches!(Config::load_from(Path::new(&path)), Err(AppError::Config(_))));

    fs::write(&path, "database: /tmp/x.sqlite\ndefault_break_minutes: -5\n").expect("write config");
    assert!(matches!(Config::load_from(Path::new(&path)), Err(AppError::Config(_))));

    fs::write(&path, "database: /tmp/x.sqlite\ndefault_break_minutes: 1440\n").expect("write config");
    assert_eq!(Config::load_from(Path::new(&path)).unwrap().default_break_minutes, 1440);

    fs::remove_file(&path).ok();
}
