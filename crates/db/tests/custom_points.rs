//! Integration tests for the custom point-grant workflows.
//!
//! - Default Bonus/Discount container resolution and lazy creation
//! - Named and looked-up action resolution
//! - Wholesale target-set replacement on update
//! - Modification replace-not-append invariant
//! - Idempotent delete and the event listing read model

use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_db::models::custom::{CustomPointsRequest, PointDetail, PointTarget};
use tally_db::models::member::CreateMember;
use tally_db::repositories::{ActionRepo, CustomPointsRepo, MemberRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap()
}

fn new_member(uni_id: &str, name: &str) -> CreateMember {
    CreateMember {
        name: name.to_string(),
        email: None,
        phone_number: None,
        uni_id: uni_id.to_string(),
        gender: "Female".into(),
        uni_level: 1,
        uni_college: "Business".into(),
    }
}

async fn seed_members(pool: &PgPool, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let member = MemberRepo::create(pool, &new_member(&format!("44300000{i}"), &format!("Member {i}")))
            .await
            .unwrap();
        ids.push(member.id);
    }
    ids
}

fn request(details: Vec<PointDetail>) -> CustomPointsRequest {
    CustomPointsRequest {
        event_id: None,
        event_name: Some("Extra Credit".into()),
        start_datetime: Some(ts(1)),
        end_datetime: Some(ts(1)),
        details,
    }
}

fn detail(target_ids: Vec<i64>, points: i64) -> PointDetail {
    PointDetail {
        target_ids,
        points,
        action_id: None,
        action_name: None,
    }
}

// ---------------------------------------------------------------------------
// Test: default container grants carry the value in a modification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_default_container_grant(pool: PgPool) {
    let members = seed_members(&pool, 2).await;

    let report = CustomPointsRepo::create(
        &pool,
        &request(vec![detail(members.clone(), 30)]),
        PointTarget::Member,
    )
    .await
    .unwrap();
    assert_eq!(report.log_ids.len(), 1);
    let log_id = report.log_ids[0];

    // Fabricated event defaults to closed with no location.
    let (status, location_type): (String, String) =
        sqlx::query_as("SELECT status, location_type FROM events WHERE id = $1")
            .bind(report.event_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "closed");
    assert_eq!(location_type, "none");

    // The Bonus container was lazily created with zero base points.
    let (name, points): (String, i64) = sqlx::query_as(
        "SELECT a.name, a.points FROM actions a JOIN logs l ON l.action_id = a.id WHERE l.id = $1",
    )
    .bind(log_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(name, "Bonus");
    assert_eq!(points, 0);

    let (kind, value): (String, i64) =
        sqlx::query_as("SELECT kind, value FROM modifications WHERE log_id = $1")
            .bind(log_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(kind, "bonus");
    assert_eq!(value, 30);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_logs WHERE log_id = $1")
        .bind(log_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

// ---------------------------------------------------------------------------
// Test: repeated default grants reuse one container row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reserved_container_reused(pool: PgPool) {
    let members = seed_members(&pool, 1).await;

    CustomPointsRepo::create(
        &pool,
        &request(vec![detail(members.clone(), -5), detail(members.clone(), -8)]),
        PointTarget::Member,
    )
    .await
    .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actions WHERE name = 'Discount'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Test: concurrent lazy creation resolves to one container row
// ---------------------------------------------------------------------------

// Each create runs its own transaction, so the loser's insert must not
// abort it; the loser has to come back with the winner's row and finish
// its grant normally.
#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_container_creation(pool: PgPool) {
    let members = seed_members(&pool, 2).await;

    let mut left = request(vec![detail(vec![members[0]], 5)]);
    left.event_name = Some("Race Left".into());
    let mut right = request(vec![detail(vec![members[1]], 6)]);
    right.event_name = Some("Race Right".into());

    let (left, right) = tokio::join!(
        CustomPointsRepo::create(&pool, &left, PointTarget::Member),
        CustomPointsRepo::create(&pool, &right, PointTarget::Member),
    );
    left.unwrap();
    right.unwrap();

    let containers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actions WHERE name = 'Bonus'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(containers, 1);

    // Both grants landed and share the single container.
    let usage = ActionRepo::usage_counts(&pool).await.unwrap();
    let bonus_usage = usage.iter().find(|u| u.log_count > 0).unwrap();
    assert_eq!(bonus_usage.log_count, 2);
}

// ---------------------------------------------------------------------------
// Test: named actions embed the points and skip the modification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_named_action_grant(pool: PgPool) {
    let members = seed_members(&pool, 1).await;

    let mut line = detail(members.clone(), 15);
    line.action_name = Some("Best booth".into());
    let report = CustomPointsRepo::create(&pool, &request(vec![line]), PointTarget::Member)
        .await
        .unwrap();
    let log_id = report.log_ids[0];

    let (name, category, points): (String, String, i64) = sqlx::query_as(
        "SELECT a.name, a.category, a.points FROM actions a \
         JOIN logs l ON l.action_id = a.id WHERE l.id = $1",
    )
    .bind(log_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(name, "Best booth");
    assert_eq!(category, "bonus");
    assert_eq!(points, 15);

    let mods: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modifications WHERE log_id = $1")
        .bind(log_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mods, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_action_id_is_not_found(pool: PgPool) {
    let members = seed_members(&pool, 1).await;

    let mut line = detail(members, 10);
    line.action_id = Some(9999);
    let err = CustomPointsRepo::create(&pool, &request(vec![line]), PointTarget::Member)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CoreError::NotFound {
            entity: "action",
            id: 9999
        }
    );
}

// ---------------------------------------------------------------------------
// Test: update replaces the target set wholesale
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_replaces_target_set(pool: PgPool) {
    let members = seed_members(&pool, 3).await;

    let report = CustomPointsRepo::create(
        &pool,
        &request(vec![detail(vec![members[0], members[1]], 20)]),
        PointTarget::Member,
    )
    .await
    .unwrap();
    let log_id = report.log_ids[0];

    let row = CustomPointsRepo::update_point_detail(
        &pool,
        log_id,
        &detail(vec![members[1], members[2]], 20),
        PointTarget::Member,
    )
    .await
    .unwrap();
    assert_eq!(row.points, 20);

    let mut targets: Vec<i64> =
        sqlx::query_scalar("SELECT member_id FROM member_logs WHERE log_id = $1")
            .bind(log_id)
            .fetch_all(&pool)
            .await
            .unwrap();
    targets.sort();
    assert_eq!(targets, vec![members[1], members[2]]);
}

// ---------------------------------------------------------------------------
// Test: update replaces the modification, never appends
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_replaces_modification(pool: PgPool) {
    let members = seed_members(&pool, 1).await;

    let report = CustomPointsRepo::create(
        &pool,
        &request(vec![detail(members.clone(), 30)]),
        PointTarget::Member,
    )
    .await
    .unwrap();
    let log_id = report.log_ids[0];

    let row = CustomPointsRepo::update_point_detail(
        &pool,
        log_id,
        &detail(members.clone(), -10),
        PointTarget::Member,
    )
    .await
    .unwrap();
    assert_eq!(row.points, -10);

    let mods: Vec<(String, i64)> =
        sqlx::query_as("SELECT kind, value FROM modifications WHERE log_id = $1")
            .bind(log_id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(mods, vec![("discount".to_string(), 10)]);

    // Switching to a named action drops the modification entirely.
    let mut line = detail(members, 25);
    line.action_name = Some("Special award".into());
    CustomPointsRepo::update_point_detail(&pool, log_id, &line, PointTarget::Member)
        .await
        .unwrap();
    let mods: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modifications WHERE log_id = $1")
        .bind(log_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mods, 0);
}

// ---------------------------------------------------------------------------
// Test: delete removes the log and its rows, and is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_point_detail_idempotent(pool: PgPool) {
    let members = seed_members(&pool, 2).await;

    let report = CustomPointsRepo::create(
        &pool,
        &request(vec![detail(members, 12)]),
        PointTarget::Member,
    )
    .await
    .unwrap();
    let log_id = report.log_ids[0];

    CustomPointsRepo::delete_point_detail(&pool, log_id).await.unwrap();

    let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs WHERE id = $1")
        .bind(log_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(logs, 0);
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_logs WHERE log_id = $1")
        .bind(log_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);

    // Deleting again is a no-op.
    CustomPointsRepo::delete_point_detail(&pool, log_id).await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: listing resolves points identically to the write path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_for_event_round_trips(pool: PgPool) {
    let members = seed_members(&pool, 2).await;

    let mut named = detail(vec![members[1]], 15);
    named.action_name = Some("Best booth".into());
    let report = CustomPointsRepo::create(
        &pool,
        &request(vec![detail(vec![members[0]], -7), named]),
        PointTarget::Member,
    )
    .await
    .unwrap();

    let listing = CustomPointsRepo::list_for_event(&pool, report.event_id, PointTarget::Member)
        .await
        .unwrap();
    assert_eq!(listing.event_name, "Extra Credit");
    assert_eq!(listing.point_details.len(), 2);

    let default_line = &listing.point_details[0];
    assert_eq!(default_line.points, -7);
    assert_eq!(default_line.action_id, None);
    assert_eq!(default_line.action_name, None);
    assert_eq!(default_line.target_ids, vec![members[0]]);

    let named_line = &listing.point_details[1];
    assert_eq!(named_line.points, 15);
    assert_eq!(named_line.action_name.as_deref(), Some("Best booth"));
}

// ---------------------------------------------------------------------------
// Test: grants attach to an existing event when an id is supplied
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_attach_to_existing_event(pool: PgPool) {
    let members = seed_members(&pool, 1).await;

    let first = CustomPointsRepo::create(
        &pool,
        &request(vec![detail(members.clone(), 5)]),
        PointTarget::Member,
    )
    .await
    .unwrap();

    let second = CustomPointsRepo::create(
        &pool,
        &CustomPointsRequest {
            event_id: Some(first.event_id),
            event_name: None,
            start_datetime: None,
            end_datetime: None,
            details: vec![detail(members, 3)],
        },
        PointTarget::Member,
    )
    .await
    .unwrap();
    assert_eq!(second.event_id, first.event_id);

    let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(events, 1);

    // Both grants resolved to the same Bonus container action.
    let usage = ActionRepo::usage_counts(&pool).await.unwrap();
    let bonus_usage = usage.iter().find(|u| u.log_count > 0).unwrap();
    assert_eq!(bonus_usage.log_count, 2);
}
