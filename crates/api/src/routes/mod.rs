//! Route definitions, one module per resource.
//!
//! `api_routes()` assembles everything mounted under `/api/v1`:
//!
//! ```text
//! /actions       catalog listing and creation
//! /departments   department CRUD and totals
//! /members       member CRUD and point history
//! /events        events, workflows, forms, attendance, certificates
//! /forms         submissions
//! /submissions   submission acceptance
//! /points        totals and custom grants
//! ```
//!
//! Health stays at the root, outside the versioned prefix.

pub mod actions;
pub mod departments;
pub mod events;
pub mod forms;
pub mod health;
pub mod members;
pub mod points;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/actions", actions::router())
        .nest("/departments", departments::router())
        .nest("/members", members::router())
        .nest("/events", events::router())
        .nest("/forms", forms::forms_router())
        .nest("/submissions", forms::submissions_router())
        .nest("/points", points::router())
}
