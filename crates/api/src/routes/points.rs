//! Route definitions for totals and custom point grants.
//!
//! ```text
//! GET    /members                        member_totals
//! GET    /departments                    department_totals
//! POST   /members/custom                 create_member_grants
//! POST   /departments/custom             create_department_grants
//! PUT    /members/custom/{log_id}        update_member_grant
//! PUT    /departments/custom/{log_id}    update_department_grant
//! DELETE /custom/{log_id}                delete_grant
//! GET    /members/events/{event_id}      list_member_grants
//! GET    /departments/events/{event_id}  list_department_grants
//! ```

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::points;
use crate::state::AppState;

/// Points routes -- mounted at `/points`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(points::member_totals))
        .route("/departments", get(points::department_totals))
        .route("/members/custom", post(points::create_member_grants))
        .route("/departments/custom", post(points::create_department_grants))
        .route("/members/custom/{log_id}", put(points::update_member_grant))
        .route(
            "/departments/custom/{log_id}",
            put(points::update_department_grant),
        )
        .route("/custom/{log_id}", delete(points::delete_grant))
        .route("/members/events/{event_id}", get(points::list_member_grants))
        .route(
            "/departments/events/{event_id}",
            get(points::list_department_grants),
        )
}
