//! Route definitions for departments.
//!
//! ```text
//! GET    /       list_departments
//! POST   /       create_department
//! GET    /{id}   get_department
//! DELETE /{id}   delete_department
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::departments;
use crate::state::AppState;

/// Department routes -- mounted at `/departments`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/{id}",
            get(departments::get_department).delete(departments::delete_department),
        )
}
