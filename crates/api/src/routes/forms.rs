//! Route definitions for form submissions.
//!
//! Provides two routers:
//! - `forms_router()` mounted at `/forms`
//! - `submissions_router()` mounted at `/submissions`
//!
//! ```text
//! FORMS:
//! GET  /{id}/submissions   list_submissions
//! POST /{id}/submissions   create_submission
//!
//! SUBMISSIONS:
//! PATCH /{id}/accept       accept_submission
//! ```
//!
//! Form creation and retrieval live under `/events/{id}/form`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Form routes -- mounted at `/forms`.
pub fn forms_router() -> Router<AppState> {
    Router::new().route(
        "/{id}/submissions",
        get(forms::list_submissions).post(forms::create_submission),
    )
}

/// Submission routes -- mounted at `/submissions`.
pub fn submissions_router() -> Router<AppState> {
    Router::new().route("/{id}/accept", patch(forms::accept_submission))
}
