//! Shared domain types for the points ledger.
//!
//! This crate has zero internal deps so it can be used by both the
//! repository layer and the API crate.

pub mod error;
pub mod points;
pub mod schedule;
pub mod types;
