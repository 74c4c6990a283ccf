//! Request/response DTOs for the ad-hoc ("custom") points workflows.

use serde::{Deserialize, Serialize};
use tally_core::types::{DbId, Timestamp};

/// Which association table a custom grant targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointTarget {
    Department,
    Member,
}

/// One point-grant line: a set of target ids sharing one log.
///
/// Action resolution order: `action_id` if given (404 when missing), else a
/// new catalog action named `action_name` with `points` embedded, else the
/// reserved Bonus/Discount container picked by the sign of `points`. Only
/// the last case attaches a modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointDetail {
    pub target_ids: Vec<DbId>,
    pub points: i64,
    pub action_id: Option<DbId>,
    pub action_name: Option<String>,
}

/// Request for creating custom grants, optionally fabricating the event.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomPointsRequest {
    /// Attach to this event when given; otherwise a closed, location-less
    /// event is created from the fields below.
    pub event_id: Option<DbId>,
    pub event_name: Option<String>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub details: Vec<PointDetail>,
}

/// One resolved grant line in the read model. `action_id`/`action_name` are
/// `None` for default-container grants, mirroring the create payload shape
/// so rows round-trip through the edit UI.
#[derive(Debug, Clone, Serialize)]
pub struct PointDetailRow {
    pub log_id: DbId,
    pub target_ids: Vec<DbId>,
    /// Signed effective points, resolved by the same rule the write path
    /// uses (action base plus signed modification).
    pub points: i64,
    pub action_id: Option<DbId>,
    pub action_name: Option<String>,
}

/// Custom grants attached to one event.
#[derive(Debug, Clone, Serialize)]
pub struct CustomEventPoints {
    pub event_id: DbId,
    pub event_name: String,
    pub start_datetime: Timestamp,
    pub end_datetime: Timestamp,
    pub point_details: Vec<PointDetailRow>,
}

/// Creation report: the event the grants landed on and the logs created.
#[derive(Debug, Clone, Serialize)]
pub struct CustomPointsReport {
    pub event_id: DbId,
    pub log_ids: Vec<DbId>,
}
