use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::certificates::CertificateService;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tally_db::DbPool,
    /// Server configuration (whitelists, secrets, upstream URLs).
    pub config: Arc<ServerConfig>,
    /// External certificate-rendering service client. Behind a trait object
    /// so tests can substitute a recording stub.
    pub certificates: Arc<dyn CertificateService>,
}
