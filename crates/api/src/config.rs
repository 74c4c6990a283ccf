use tally_core::types::DbId;

use crate::auth::checkin::CheckinConfig;
use crate::auth::identity::IdentityConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the signing secrets have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Action ids whose logs admit attendance check-ins, parsed from the
    /// comma-separated `ATTENDABLE_ACTION_IDS` env var.
    pub attendable_action_ids: Vec<DbId>,
    /// Composite `department:member` action id pairs for the categorized
    /// catalog listing, parsed from `COMPOSITE_ACTION_PAIRS`
    /// (e.g. `51:76,52:77`).
    pub composite_action_pairs: Vec<(DbId, DbId)>,
    /// Base URL of the external certificate-rendering service.
    pub certificate_api_url: String,
    /// Identity token verification (external auth service tokens).
    pub identity: IdentityConfig,
    /// Check-in token signing/verification.
    pub checkin: CheckinConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `ATTENDABLE_ACTION_IDS`  | *(empty)*               |
    /// | `COMPOSITE_ACTION_PAIRS` | *(empty)*               |
    /// | `CERTIFICATE_API_URL`    | `http://localhost:8100` |
    ///
    /// Secrets (`IDENTITY_SECRET`, `CHECKIN_SECRET`) are required; see
    /// [`IdentityConfig::from_env`] and [`CheckinConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let attendable_action_ids = parse_id_list(
            &std::env::var("ATTENDABLE_ACTION_IDS").unwrap_or_default(),
        );

        let composite_action_pairs = parse_id_pairs(
            &std::env::var("COMPOSITE_ACTION_PAIRS").unwrap_or_default(),
        );

        let certificate_api_url = std::env::var("CERTIFICATE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8100".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            attendable_action_ids,
            composite_action_pairs,
            certificate_api_url,
            identity: IdentityConfig::from_env(),
            checkin: CheckinConfig::from_env(),
        }
    }
}

/// Parse a comma-separated id list (`"76,77,78"`).
fn parse_id_list(raw: &str) -> Vec<DbId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .unwrap_or_else(|_| panic!("invalid action id '{s}'"))
        })
        .collect()
}

/// Parse colon-separated id pairs (`"51:76,52:77"`).
fn parse_id_pairs(raw: &str) -> Vec<(DbId, DbId)> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (left, right) = pair
                .split_once(':')
                .unwrap_or_else(|| panic!("invalid action pair '{pair}', expected 'dept:member'"));
            (
                left.trim()
                    .parse()
                    .unwrap_or_else(|_| panic!("invalid action id '{left}'")),
                right
                    .trim()
                    .parse()
                    .unwrap_or_else(|_| panic!("invalid action id '{right}'")),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list(""), Vec::<DbId>::new());
        assert_eq!(parse_id_list("76, 77,78"), vec![76, 77, 78]);
    }

    #[test]
    fn test_parse_id_pairs() {
        assert_eq!(parse_id_pairs(""), Vec::<(DbId, DbId)>::new());
        assert_eq!(parse_id_pairs("51:76, 52:77"), vec![(51, 76), (52, 77)]);
    }
}
