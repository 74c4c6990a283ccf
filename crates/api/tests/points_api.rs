//! HTTP-level integration tests for custom point grants, totals, and
//! certificate submission.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    admin_token, delete_auth, expect_status, get, get_auth, member_token, post_auth,
    post_json_auth, put_json_auth, StubCertificateService,
};
use sqlx::PgPool;

use tally_db::models::member::CreateMember;
use tally_db::repositories::MemberRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_member(pool: &PgPool, name: &str, uni_id: &str) -> i64 {
    MemberRepo::create(
        pool,
        &CreateMember {
            name: name.to_string(),
            email: Some(format!("{uni_id}@test.com")),
            phone_number: None,
            uni_id: uni_id.to_string(),
            gender: "Male".to_string(),
            uni_level: 2,
            uni_college: "Science".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn grant_body(member_ids: &[i64], points: i64) -> serde_json::Value {
    serde_json::json!({
        "event_name": "Season Wrap-up",
        "start_datetime": "2025-05-01T10:00:00Z",
        "end_datetime": "2025-05-01T14:00:00Z",
        "details": [
            { "target_ids": member_ids, "points": points }
        ]
    })
}

// ---------------------------------------------------------------------------
// Test: default container grant flows into member totals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn custom_grant_reaches_member_totals(pool: PgPool) {
    let m0 = seed_member(&pool, "Omar", "443200201").await;
    let m1 = seed_member(&pool, "Dana", "443200202").await;
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/v1/points/members/custom",
        &admin_token(),
        grant_body(&[m0, m1], 30),
    )
    .await;
    let json = expect_status(created, StatusCode::CREATED).await;
    assert_eq!(json["data"]["log_ids"].as_array().unwrap().len(), 1);

    let totals = get(app, "/api/v1/points/members").await;
    let json = expect_status(totals, StatusCode::OK).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["total_points"] == 30));
}

// ---------------------------------------------------------------------------
// Test: grant update rewrites the line, delete is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn custom_grant_update_and_delete(pool: PgPool) {
    let m0 = seed_member(&pool, "Omar", "443200201").await;
    let m1 = seed_member(&pool, "Dana", "443200202").await;
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/v1/points/members/custom",
        &admin_token(),
        grant_body(&[m0], 30),
    )
    .await;
    let json = expect_status(created, StatusCode::CREATED).await;
    let event_id = json["data"]["event_id"].as_i64().unwrap();
    let log_id = json["data"]["log_ids"][0].as_i64().unwrap();

    // Retarget the grant and flip it to a deduction.
    let updated = put_json_auth(
        app.clone(),
        &format!("/api/v1/points/members/custom/{log_id}"),
        &admin_token(),
        serde_json::json!({ "target_ids": [m1], "points": -10 }),
    )
    .await;
    let json = expect_status(updated, StatusCode::OK).await;
    assert_eq!(json["data"]["points"], -10);
    assert_eq!(json["data"]["target_ids"], serde_json::json!([m1]));

    let listing = get_auth(
        app.clone(),
        &format!("/api/v1/points/members/events/{event_id}"),
        &admin_token(),
    )
    .await;
    let json = expect_status(listing, StatusCode::OK).await;
    let details = json["data"]["point_details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["points"], -10);

    let first_delete = delete_auth(
        app.clone(),
        &format!("/api/v1/points/custom/{log_id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(first_delete.status(), StatusCode::NO_CONTENT);

    // Deleting the same line again still succeeds.
    let second_delete = delete_auth(
        app,
        &format!("/api/v1/points/custom/{log_id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(second_delete.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Test: certificates go to every full-attendance member
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn certificates_submitted_for_full_attendance(pool: PgPool) {
    use tally_db::models::action::CreateAction;
    use tally_db::models::composite::{CompositeEventRequest, RosterEntry};
    use tally_db::models::department::CreateDepartment;
    use tally_db::models::event::CreateEvent;
    use tally_db::repositories::{ActionRepo, CompositeRepo, DepartmentRepo};

    let department = DepartmentRepo::create(
        &pool,
        &CreateDepartment {
            name: "Media".to_string(),
            arabic_name: "الإعلام".to_string(),
            category: "practical".to_string(),
        },
    )
    .await
    .unwrap();
    let dept_action = ActionRepo::create(
        &pool,
        &CreateAction {
            name: "Organize event".to_string(),
            arabic_name: String::new(),
            category: "department".to_string(),
            points: 10,
        },
    )
    .await
    .unwrap();
    let member_action = ActionRepo::create(
        &pool,
        &CreateAction {
            name: "Attend event".to_string(),
            arabic_name: String::new(),
            category: "composite".to_string(),
            points: 5,
        },
    )
    .await
    .unwrap();

    let report = CompositeRepo::create_composite(
        &pool,
        &CompositeEventRequest {
            event: CreateEvent {
                name: "Closing Ceremony".to_string(),
                location_type: "on_site".to_string(),
                location: "Auditorium".to_string(),
                start_datetime: Utc::now() - Duration::hours(1),
                end_datetime: Utc::now() + Duration::hours(1),
                status: "active".to_string(),
                is_official: true,
                description: None,
                image_url: None,
            },
            department_id: department.id,
            department_action_id: dept_action.id,
            member_action_id: member_action.id,
            department_bonus: 0,
            department_discount: 0,
            member_bonus: 0,
            member_discount: 0,
            roster: vec![RosterEntry {
                member: CreateMember {
                    name: "Aisha".to_string(),
                    email: Some("aisha@test.com".to_string()),
                    phone_number: None,
                    uni_id: "443200111".to_string(),
                    gender: "Female".to_string(),
                    uni_level: 3,
                    uni_college: "Engineering".to_string(),
                },
                days_present: vec![false],
            }],
        },
    )
    .await
    .unwrap();
    let event_id = report.event.id;

    let stub = Arc::new(StubCertificateService::default());
    let mut config = common::test_config();
    config.attendable_action_ids = vec![member_action.id];
    let app = common::build_test_app_with(pool, config, stub.clone());

    // Without any check-in there is no eligible member.
    let empty = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/certificates"),
        &admin_token(),
        serde_json::json!({ "announced_name": "Closing Ceremony 2025" }),
    )
    .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    // Check in, then resubmit.
    let token_response = get_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/checkin-token"),
        &admin_token(),
    )
    .await;
    let token = common::body_json(token_response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();
    let checkin = post_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/checkin?token={token}"),
        &member_token("443200111"),
    )
    .await;
    assert_eq!(checkin.status(), StatusCode::CREATED);

    let submitted = post_json_auth(
        app,
        &format!("/api/v1/events/{event_id}/certificates"),
        &admin_token(),
        serde_json::json!({ "announced_name": "Closing Ceremony 2025" }),
    )
    .await;
    let json = expect_status(submitted, StatusCode::ACCEPTED).await;
    assert_eq!(json["data"]["job_id"], "job-test-1");
    assert_eq!(json["data"]["recipients"], 1);

    let batches = stub.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].announced_name, "Closing Ceremony 2025");
    assert_eq!(batches[0].members.len(), 1);
    assert_eq!(batches[0].members[0].name, "Aisha");
}
