//! Route definitions for the actions catalog.
//!
//! ```text
//! GET  /              list_actions
//! POST /              create_action
//! GET  /categorized   categorized_actions
//! GET  /usage         action_usage
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Action routes -- mounted at `/actions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actions::list_actions).post(actions::create_action))
        .route("/categorized", get(actions::categorized_actions))
        .route("/usage", get(actions::action_usage))
}
