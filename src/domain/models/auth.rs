//! Domain models for Responsys authentication.
//!
//! The very first request against Responsys authenticates to an account.
//! The response carries a token and the endpoint host that every following
//! request must use. Tokens are stateless and expire two hours after issue.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifetime of a Responsys auth token
pub const TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

/// Body returned by `POST /rest/api/{version}/auth/token`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Token to send in the `Authorization` header
    pub auth_token: String,

    /// Base URL for all subsequent API calls
    pub end_point: String,

    /// Issue time as reported by Responsys (epoch milliseconds)
    #[serde(default)]
    pub issued_at: Option<i64>,

    /// Any other fields of the response, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoginResponse {
    /// Issue time reported by the server, if present and representable
    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        self.issued_at.and_then(DateTime::from_timestamp_millis)
    }
}

/// An authenticated session: the last login response plus its parsed endpoint
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Last login (or refresh) response
    pub login: LoginResponse,

    /// Parsed `end_point`
    pub endpoint: reqwest::Url,

    /// Local time the token was obtained
    pub acquired_at: DateTime<Utc>,
}

impl AuthSession {
    /// Build a session from a login response.
    ///
    /// Fails if the token is empty or the endpoint is not an absolute URL.
    pub fn from_login(login: LoginResponse, acquired_at: DateTime<Utc>) -> Result<Self, String> {
        if login.auth_token.trim().is_empty() {
            return Err("login response carried an empty authToken".to_string());
        }

        let endpoint = reqwest::Url::parse(login.end_point.trim())
            .map_err(|e| format!("invalid endPoint '{}': {}", login.end_point, e))?;

        if endpoint.cannot_be_a_base() || endpoint.host_str().is_none() {
            return Err(format!("endPoint '{}' is not an absolute URL", login.end_point));
        }

        Ok(Self {
            login,
            endpoint,
            acquired_at,
        })
    }

    /// Token to send in the `Authorization` header
    pub fn auth_token(&self) -> &str {
        &self.login.auth_token
    }

    /// When the token stops being accepted
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.acquired_at + Duration::seconds(TOKEN_LIFETIME_SECS)
    }

    /// Whether the token expires within `margin` of `now`
    pub fn needs_refresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin >= self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn login(token: &str, endpoint: &str) -> LoginResponse {
        LoginResponse {
            auth_token: token.to_string(),
            end_point: endpoint.to_string(),
            issued_at: Some(1_572_800_000_000),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_deserialize_login_response() {
        let json = r#"{
            "authToken": "tok-123",
            "endPoint": "https://api5-012.responsys.net",
            "issuedAt": 1572800000000,
            "accountName": "acme"
        }"#;

        let parsed: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.auth_token, "tok-123");
        assert_eq!(parsed.end_point, "https://api5-012.responsys.net");
        assert_eq!(parsed.extra.get("accountName").unwrap(), "acme");
        assert_eq!(
            parsed.issued_at_utc().unwrap(),
            Utc.timestamp_millis_opt(1_572_800_000_000).unwrap()
        );
    }

    #[test]
    fn test_session_rejects_empty_token() {
        let result = AuthSession::from_login(login("  ", "https://api.example.com"), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_session_rejects_relative_endpoint() {
        let result = AuthSession::from_login(login("tok", "/rest/api"), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_needs_refresh_near_expiry() {
        let acquired = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let session =
            AuthSession::from_login(login("tok", "https://api.example.com"), acquired).unwrap();

        assert_eq!(session.expires_at(), acquired + Duration::hours(2));

        let early = acquired + Duration::minutes(30);
        assert!(!session.needs_refresh(early, Duration::minutes(10)));

        let late = acquired + Duration::minutes(111);
        assert!(session.needs_refresh(late, Duration::minutes(10)));
    }
}
