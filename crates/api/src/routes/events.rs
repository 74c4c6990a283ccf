//! Route definitions for events and everything scoped to an event.
//!
//! ```text
//! GET    /                     list_events
//! POST   /                     create_event
//! GET    /open                 list_open_events
//! POST   /composite            create_composite_event
//! POST   /department           create_department_event
//! POST   /member               create_member_event
//! GET    /{id}                 get_event
//! PUT    /{id}                 update_event
//! DELETE /{id}                 delete_event
//! PATCH  /{id}/status          set_event_status
//! POST   /{id}/form            create_event_form
//! GET    /{id}/form            get_event_form
//! DELETE /{id}/form            delete_event_form
//! GET    /{id}/checkin-token   issue_checkin_token
//! POST   /{id}/checkin         checkin
//! GET    /{id}/attendance      event_attendance
//! GET    /{id}/attendance/count attendance_count
//! GET    /{id}/attendance/me   my_attendance
//! POST   /{id}/certificates    request_certificates
//! ```

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{attendance, certificates, events, forms};
use crate::state::AppState;

/// Event routes -- mounted at `/events`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/open", get(events::list_open_events))
        .route("/composite", post(events::create_composite_event))
        .route("/department", post(events::create_department_event))
        .route("/member", post(events::create_member_event))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{id}/status", patch(events::set_event_status))
        .route(
            "/{id}/form",
            get(forms::get_event_form)
                .post(forms::create_event_form)
                .delete(forms::delete_event_form),
        )
        .route("/{id}/checkin-token", get(attendance::issue_checkin_token))
        .route("/{id}/checkin", post(attendance::checkin))
        .route("/{id}/attendance", get(attendance::event_attendance))
        .route("/{id}/attendance/count", get(attendance::attendance_count))
        .route("/{id}/attendance/me", get(attendance::my_attendance))
        .route("/{id}/certificates", post(certificates::request_certificates))
}
