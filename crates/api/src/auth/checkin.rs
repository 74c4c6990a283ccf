use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tally_core::error::CoreError;
use tally_core::types::DbId;

/// Signing settings for event check-in tokens.
#[derive(Debug, Clone)]
pub struct CheckinConfig {
    /// HMAC secret for check-in token signing.
    pub secret: String,
    /// Token lifetime in minutes (default: `30`).
    pub token_expiry_mins: i64,
}

impl CheckinConfig {
    /// Load from `CHECKIN_SECRET` (required) and `CHECKIN_TOKEN_EXPIRY_MINS`
    /// (default `30`).
    ///
    /// Panics if `CHECKIN_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("CHECKIN_SECRET")
            .expect("CHECKIN_SECRET environment variable must be set");
        if secret.is_empty() {
            panic!("CHECKIN_SECRET must not be empty");
        }

        let token_expiry_mins: i64 = std::env::var("CHECKIN_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("CHECKIN_TOKEN_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            token_expiry_mins,
        }
    }
}

/// Claims carried by a check-in token. The token binds to one event only.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckinClaims {
    pub event_id: DbId,
    pub exp: i64,
}

/// Sign a check-in token for the given event.
pub fn generate_checkin_token(event_id: DbId, config: &CheckinConfig) -> Result<String, CoreError> {
    let exp = (Utc::now() + Duration::minutes(config.token_expiry_mins)).timestamp();
    let claims = CheckinClaims { event_id, exp };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|err| CoreError::Internal(format!("failed to sign check-in token: {err}")))
}

/// Verify a check-in token against the event it was presented for.
///
/// Each failure mode yields a distinct message so clients can tell an
/// expired QR code apart from one for the wrong event.
pub fn verify_checkin_token(
    token: &str,
    event_id: DbId,
    config: &CheckinConfig,
) -> Result<(), CoreError> {
    let mut validation = Validation::default();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<CheckinClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|err| {
        use jsonwebtoken::errors::ErrorKind;
        let message = match err.kind() {
            ErrorKind::ExpiredSignature => "Check-in token has expired",
            ErrorKind::InvalidSignature => "Check-in token signature is invalid",
            ErrorKind::InvalidAlgorithm => "Check-in token uses an unsupported algorithm",
            ErrorKind::InvalidToken => "Check-in token is malformed",
            ErrorKind::Json(_) => "Check-in token is missing required claims",
            _ => "Check-in token could not be verified",
        };
        CoreError::Validation(message.to_string())
    })?;

    if data.claims.event_id != event_id {
        return Err(CoreError::Validation(
            "Check-in token was issued for a different event".to_string(),
        ));
    }

    Ok(())
}
