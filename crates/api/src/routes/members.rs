//! Route definitions for members.
//!
//! ```text
//! GET  /              list_members
//! POST /              create_member
//! GET  /{id}          get_member
//! PUT  /{id}          update_member
//! GET  /{id}/points   member_points
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Member routes -- mounted at `/members`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(members::list_members).post(members::create_member))
        .route("/{id}", get(members::get_member).put(members::update_member))
        .route("/{id}/points", get(members::member_points))
}
