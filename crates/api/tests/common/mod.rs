#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;

use tally_api::auth::checkin::CheckinConfig;
use tally_api::auth::identity::{IdentityClaims, IdentityConfig};
use tally_api::config::ServerConfig;
use tally_api::router::build_app_router;
use tally_api::services::certificates::{CertificateBatch, CertificateService};
use tally_api::state::AppState;
use tally_core::error::CoreError;

pub const IDENTITY_SECRET: &str = "test-identity-secret";
pub const CHECKIN_SECRET: &str = "test-checkin-secret";

/// Build a test `ServerConfig` with safe defaults and fixed secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        attendable_action_ids: Vec::new(),
        composite_action_pairs: Vec::new(),
        certificate_api_url: "http://localhost:8100".to_string(),
        identity: IdentityConfig {
            secret: IDENTITY_SECRET.to_string(),
        },
        checkin: CheckinConfig {
            secret: CHECKIN_SECRET.to_string(),
            token_expiry_mins: 30,
        },
    }
}

/// Certificate service stub that records every batch instead of calling out.
#[derive(Default)]
pub struct StubCertificateService {
    pub batches: Mutex<Vec<CertificateBatch>>,
}

#[async_trait::async_trait]
impl CertificateService for StubCertificateService {
    async fn request_certificates(&self, batch: CertificateBatch) -> Result<String, CoreError> {
        self.batches
            .lock()
            .map_err(|_| CoreError::Internal("stub lock poisoned".into()))?
            .push(batch);
        Ok("job-test-1".to_string())
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the construction in `main.rs` so integration tests exercise the
/// same middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(StubCertificateService::default()))
}

/// Same as [`build_test_app`] but with a custom config and certificate stub.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    certificates: Arc<dyn CertificateService>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        certificates,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Token helpers
// ---------------------------------------------------------------------------

fn sign_identity(uni_id: &str, is_admin: bool) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = IdentityClaims {
        sub: uni_id.to_string(),
        is_admin,
        is_super_admin: false,
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(IDENTITY_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Bearer token for an admin caller.
pub fn admin_token() -> String {
    sign_identity("100000001", true)
}

/// Bearer token for a plain member with the given university id.
pub fn member_token(uni_id: &str) -> String {
    sign_identity(uni_id, false)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::PATCH, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status and return the parsed body for further checks.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
