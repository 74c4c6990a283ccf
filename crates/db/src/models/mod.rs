//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Request/report DTOs for the workflow orchestrators where applicable

pub mod action;
pub mod attendance;
pub mod composite;
pub mod custom;
pub mod department;
pub mod event;
pub mod form;
pub mod ledger;
pub mod member;
pub mod points;
pub mod submission;
