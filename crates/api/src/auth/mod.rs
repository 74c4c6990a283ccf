//! Authentication and token verification.
//!
//! Two token families live here:
//! - `identity`: bearer tokens issued by the external auth service,
//!   identifying a member and their admin standing.
//! - `checkin`: short-lived event check-in tokens embedded in QR codes.

pub mod checkin;
pub mod identity;
