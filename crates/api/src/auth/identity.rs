use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tally_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Verification settings for identity bearer tokens.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// HMAC secret shared with the auth service.
    pub secret: String,
}

impl IdentityConfig {
    /// Load from the `IDENTITY_SECRET` environment variable.
    ///
    /// Panics if the variable is missing or empty. Identity tokens cannot be
    /// verified without it, so refusing to start is the only safe option.
    pub fn from_env() -> Self {
        let secret = std::env::var("IDENTITY_SECRET")
            .expect("IDENTITY_SECRET environment variable must be set");
        if secret.is_empty() {
            panic!("IDENTITY_SECRET must not be empty");
        }
        Self { secret }
    }
}

/// Claims carried by identity bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// University id of the member.
    pub sub: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_super_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthMember {
    /// University id from the token subject.
    pub uni_id: String,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

/// Decode and verify an identity token.
pub fn verify_identity_token(token: &str, config: &IdentityConfig) -> Result<IdentityClaims, CoreError> {
    let data = decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            CoreError::Unauthorized("Token has expired".to_string())
        }
        _ => CoreError::Unauthorized("Invalid authentication token".to_string()),
    })?;
    Ok(data.claims)
}

impl FromRequestParts<AppState> for AuthMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                CoreError::Unauthorized("Missing Authorization header".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            CoreError::Unauthorized("Authorization header must use the Bearer scheme".to_string())
        })?;

        let claims = verify_identity_token(token, &state.config.identity)?;

        Ok(AuthMember {
            uni_id: claims.sub,
            is_admin: claims.is_admin,
            is_super_admin: claims.is_super_admin,
        })
    }
}

/// Extractor that additionally requires the caller to be an admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthMember);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = AuthMember::from_request_parts(parts, state).await?;
        if !member.is_admin && !member.is_super_admin {
            return Err(CoreError::Forbidden("Admin access required".to_string()).into());
        }
        Ok(RequireAdmin(member))
    }
}
