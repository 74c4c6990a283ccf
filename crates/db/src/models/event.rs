//! Event entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    /// `"online"`, `"on_site"`, or `"none"`.
    pub location_type: String,
    pub location: String,
    pub start_datetime: Timestamp,
    pub end_datetime: Timestamp,
    /// `"draft"`, `"open"`, `"active"`, or `"closed"`.
    pub status: String,
    pub is_official: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `events`.
///
/// Name uniqueness is pre-checked by the writers so a duplicate surfaces as
/// a structured conflict, with the `uq_events_name` constraint backstopping
/// the race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub location_type: String,
    #[serde(default)]
    pub location: String,
    pub start_datetime: Timestamp,
    pub end_datetime: Timestamp,
    pub status: String,
    #[serde(default)]
    pub is_official: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Update DTO for `events` (full replacement, not a patch).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEvent {
    pub name: String,
    pub location_type: String,
    #[serde(default)]
    pub location: String,
    pub start_datetime: Timestamp,
    pub end_datetime: Timestamp,
    pub status: String,
    #[serde(default)]
    pub is_official: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// An open (registrable) event joined with its form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OpenEvent {
    pub id: DbId,
    pub name: String,
    pub location_type: String,
    pub location: String,
    pub start_datetime: Timestamp,
    pub end_datetime: Timestamp,
    pub status: String,
    pub is_official: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub form_id: DbId,
    pub form_type: String,
    pub responders_url: Option<String>,
}
