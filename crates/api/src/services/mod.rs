//! Clients for external services.

pub mod certificates;
