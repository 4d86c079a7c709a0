//! Bearer credential decoding
//!
//! The client never verifies signatures; it only reads the claims it needs
//! (expiry and identity fields) from the JWT payload segment.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::SessionError;

/// Decode base64url (URL-safe base64, padding optional)
fn base64_decode_url(input: &str) -> std::result::Result<Vec<u8>, String> {
    use base64::{Engine as _, engine::general_purpose};

    general_purpose::URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|e| e.to_string())
}

/// Claims read from a credential's payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Subject (username)
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry as a Unix timestamp in seconds
    #[serde(default)]
    pub exp: Option<i64>,

    /// Numeric user ID, when the issuer includes it
    #[serde(default)]
    pub id: Option<i64>,

    /// Email address, when the issuer includes it
    #[serde(default)]
    pub email: Option<String>,

    /// Granted roles, when the issuer includes them
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Decode the claims of a `header.payload.signature` token
    pub fn decode(token: &str) -> Result<Self, SessionError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(SessionError::MalformedCredential(format!(
                "expected 3 segments, found {}",
                parts.len()
            )));
        }

        let payload = base64_decode_url(parts[1]).map_err(|e| {
            SessionError::MalformedCredential(format!("payload is not base64url: {e}"))
        })?;

        serde_json::from_slice(&payload).map_err(|e| {
            SessionError::MalformedCredential(format!("payload is not valid JSON: {e}"))
        })
    }

    /// Expiry as a timestamp, if the claim is present and representable
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, SessionError> {
        match self.exp {
            None => Ok(None),
            Some(exp) => DateTime::from_timestamp(exp, 0).map(Some).ok_or_else(|| {
                SessionError::MalformedCredential(format!("exp {exp} is out of range"))
            }),
        }
    }
}

/// Bearer token with its decoded expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// The raw token, as sent in the `Authorization` header
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// A credential is expired once its expiry is at or before `now`.
    /// Tokens without an `exp` claim never expire client-side.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Build an unsigned token carrying the given JSON claims.
#[cfg(test)]
pub fn encode_test_token(claims: &serde_json::Value) -> String {
    use base64::{Engine as _, engine::general_purpose};

    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_claims() {
        let token = encode_test_token(&json!({
            "sub": "alice",
            "exp": 4_102_444_800i64,
            "id": 7,
            "email": "alice@example.com",
            "roles": ["ROLE_LIBRARIAN"]
        }));

        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert_eq!(claims.id, Some(7));
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.roles, vec!["ROLE_LIBRARIAN".to_string()]);
        assert_eq!(
            claims.expires_at().unwrap(),
            DateTime::from_timestamp(4_102_444_800, 0)
        );
    }

    #[test]
    fn test_decode_minimal_claims() {
        let token = encode_test_token(&json!({ "sub": "bob", "iat": 1, "exp": 2 }));

        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("bob"));
        assert!(claims.roles.is_empty());
        assert!(claims.id.is_none());
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        let err = Claims::decode("not-a-jwt").unwrap_err();
        assert!(matches!(err, SessionError::MalformedCredential(_)));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = Claims::decode("aaa.!!!.ccc").unwrap_err();
        assert!(err.to_string().contains("base64url"));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        use base64::{Engine as _, engine::general_purpose};
        let payload = general_purpose::URL_SAFE_NO_PAD.encode("plain text");
        let err = Claims::decode(&format!("h.{payload}.s")).unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_decode_accepts_padded_payload() {
        use base64::{Engine as _, engine::general_purpose};
        let payload = general_purpose::URL_SAFE.encode(r#"{"sub":"padded"}"#);
        let claims = Claims::decode(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("padded"));
    }

    #[test]
    fn test_credential_expiry() {
        let now = Utc::now();

        let past = Credential::new("t", Some(now - chrono::Duration::hours(1)));
        assert!(past.is_expired_at(now));

        let exact = Credential::new("t", Some(now));
        assert!(exact.is_expired_at(now));

        let future = Credential::new("t", Some(now + chrono::Duration::hours(1)));
        assert!(!future.is_expired_at(now));

        let opaque = Credential::new("t", None);
        assert!(!opaque.is_expired_at(now));
    }
}
