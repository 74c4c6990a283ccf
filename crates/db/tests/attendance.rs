//! Integration tests for the attendance workflows.
//!
//! - Check-in happy path and the daily "already marked" gate
//! - Form gating for registration events
//! - Attendable-log resolution failures
//! - Day-filtered attendance listings and full-attendance eligibility

use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_core::schedule::DaySelector;
use tally_db::models::composite::{CompositeEventRequest, RosterEntry};
use tally_db::models::department::CreateDepartment;
use tally_db::models::event::CreateEvent;
use tally_db::models::form::CreateForm;
use tally_db::models::member::CreateMember;
use tally_db::models::submission::CreateSubmission;
use tally_db::repositories::{
    ActionRepo, AttendanceRepo, CompositeRepo, DepartmentRepo, FormRepo, MemberRepo,
    SubmissionRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap()
}

fn new_event(name: &str, start_day: u32, end_day: u32) -> CreateEvent {
    CreateEvent {
        name: name.to_string(),
        location_type: "on_site".into(),
        location: "Auditorium".into(),
        start_datetime: ts(start_day, 9),
        end_datetime: ts(end_day, 17),
        status: "active".into(),
        is_official: true,
        description: None,
        image_url: None,
    }
}

fn new_member(uni_id: &str, name: &str) -> CreateMember {
    CreateMember {
        name: name.to_string(),
        email: None,
        phone_number: None,
        uni_id: uni_id.to_string(),
        gender: "Male".into(),
        uni_level: 2,
        uni_college: "Science".into(),
    }
}

/// Seed a composite event and return (event_id, member_action_id).
async fn seed_event(
    pool: &PgPool,
    name: &str,
    start_day: u32,
    end_day: u32,
    roster: Vec<RosterEntry>,
) -> (i64, i64) {
    let department_id = DepartmentRepo::create(
        pool,
        &CreateDepartment {
            name: format!("{name} dept"),
            arabic_name: String::new(),
            category: "administrative".into(),
        },
    )
    .await
    .unwrap()
    .id;
    let dept_action = ActionRepo::create(
        pool,
        &tally_db::models::action::CreateAction {
            name: format!("{name} organizing"),
            arabic_name: String::new(),
            category: "department".into(),
            points: 10,
        },
    )
    .await
    .unwrap()
    .id;
    let member_action = ActionRepo::create(
        pool,
        &tally_db::models::action::CreateAction {
            name: format!("{name} attendance"),
            arabic_name: String::new(),
            category: "composite".into(),
            points: 0,
        },
    )
    .await
    .unwrap()
    .id;

    let report = CompositeRepo::create_composite(
        pool,
        &CompositeEventRequest {
            event: new_event(name, start_day, end_day),
            department_id,
            department_action_id: dept_action,
            member_action_id: member_action,
            department_bonus: 0,
            department_discount: 0,
            member_bonus: 0,
            member_discount: 0,
            roster,
        },
    )
    .await
    .unwrap();
    (report.event.id, member_action)
}

// ---------------------------------------------------------------------------
// Test: check-in writes one dated row, twice a day is AlreadyDone
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_checkin_once_per_day(pool: PgPool) {
    let (event_id, member_action) = seed_event(&pool, "Tech Talk", 1, 1, vec![]).await;
    let member = MemberRepo::create(&pool, &new_member("442000001", "Omar"))
        .await
        .unwrap();

    let row = AttendanceRepo::mark_attendance(&pool, event_id, member.id, &[member_action])
        .await
        .unwrap();
    assert_eq!(row.member_id, member.id);
    assert_eq!(row.date.date_naive(), Utc::now().date_naive());

    let err = AttendanceRepo::mark_attendance(&pool, event_id, member.id, &[member_action])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::AlreadyDone(_));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_logs WHERE member_id = $1")
        .bind(member.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Test: registration form gates check-in on an accepted submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_form_gates_checkin(pool: PgPool) {
    let (event_id, member_action) = seed_event(&pool, "Workshop", 2, 2, vec![]).await;
    let form = FormRepo::create(
        &pool,
        &CreateForm {
            event_id,
            form_type: "registration".into(),
            external_form_id: None,
            responders_url: None,
        },
    )
    .await
    .unwrap();
    let member = MemberRepo::create(&pool, &new_member("442000002", "Khalid"))
        .await
        .unwrap();

    let err = AttendanceRepo::mark_attendance(&pool, event_id, member.id, &[member_action])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Forbidden(_));

    // A pending (not accepted) submission is not enough.
    let submission = SubmissionRepo::create(
        &pool,
        &CreateSubmission {
            form_id: form.id,
            member_id: member.id,
            is_accepted: false,
        },
    )
    .await
    .unwrap();
    let err = AttendanceRepo::mark_attendance(&pool, event_id, member.id, &[member_action])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Forbidden(_));

    SubmissionRepo::set_accepted(&pool, submission.id, true)
        .await
        .unwrap();
    AttendanceRepo::mark_attendance(&pool, event_id, member.id, &[member_action])
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: an event without an attendable log is a server-side invariant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_attendable_log_is_invariant_violation(pool: PgPool) {
    let (event_id, _member_action) = seed_event(&pool, "Seminar", 3, 3, vec![]).await;
    let member = MemberRepo::create(&pool, &new_member("442000003", "Faisal"))
        .await
        .unwrap();

    // Whitelist that matches none of the event's logs.
    let err = AttendanceRepo::mark_attendance(&pool, event_id, member.id, &[9999])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvariantViolation(_));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_checkin_unknown_event_or_member(pool: PgPool) {
    let (event_id, member_action) = seed_event(&pool, "Panel", 4, 4, vec![]).await;

    let err = AttendanceRepo::mark_attendance(&pool, 9999, 1, &[member_action])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "event", .. });

    let err = AttendanceRepo::mark_attendance(&pool, event_id, 9999, &[member_action])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "member", .. });
}

// ---------------------------------------------------------------------------
// Test: attendance listing day filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_event_attendance_day_filters(pool: PgPool) {
    let roster = vec![
        RosterEntry {
            member: new_member("442000010", "Aisha"),
            days_present: vec![true, true],
        },
        RosterEntry {
            member: new_member("442000011", "Dana"),
            days_present: vec![true, false],
        },
    ];
    let (event_id, member_action) = seed_event(&pool, "Bootcamp", 10, 11, roster).await;

    let all = AttendanceRepo::event_attendance(&pool, event_id, DaySelector::All, &[member_action])
        .await
        .unwrap();
    assert_eq!(all.event_days, 2);
    assert_eq!(all.attendance.len(), 2);

    // Full-attendance eligibility: only Aisha attended every day.
    let exclusive = AttendanceRepo::event_attendance(
        &pool,
        event_id,
        DaySelector::ExclusiveAll,
        &[member_action],
    )
    .await
    .unwrap();
    assert_eq!(exclusive.attendance.len(), 1);
    assert_eq!(exclusive.attendance[0].member.uni_id, "442000010");
    assert_eq!(exclusive.attendance[0].dates.len(), 2);

    // Day 2 only Aisha was present.
    let day2 = AttendanceRepo::event_attendance(
        &pool,
        event_id,
        DaySelector::Day(2),
        &[member_action],
    )
    .await
    .unwrap();
    assert_eq!(day2.attendance.len(), 1);
    assert_eq!(day2.attendance[0].member.uni_id, "442000010");

    let err = AttendanceRepo::event_attendance(
        &pool,
        event_id,
        DaySelector::Day(3),
        &[member_action],
    )
    .await
    .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
}
