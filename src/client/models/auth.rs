//! Authentication models

use serde::{Deserialize, Serialize};

use crate::session::Identity;

/// Sign-in request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Sign-in response: the bearer token plus the user's identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    /// The JWT token string
    pub token: String,

    /// Token type, `Bearer` when present
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// User ID
    pub id: i64,

    pub username: String,

    #[serde(default)]
    pub email: String,

    /// Granted roles (`ROLE_USER`, `ROLE_LIBRARIAN`)
    #[serde(default)]
    pub roles: Vec<String>,
}

impl JwtResponse {
    /// Split into the token and the identity the session store keeps
    pub fn into_parts(self) -> (String, Identity) {
        let identity = Identity {
            id: self.id,
            username: self.username,
            email: self.email,
            roles: self.roles.into_iter().collect(),
        };
        (self.token, identity)
    }
}

/// Registration request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,

    /// Librarian registration code; omitted for regular members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_code: Option<String>,
}

/// Generic `{ "message": ... }` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_response_into_parts() {
        let response: JwtResponse = serde_json::from_str(
            r#"{"token":"abc","type":"Bearer","id":5,"username":"carol","email":"c@example.com","roles":["ROLE_USER","ROLE_USER"]}"#,
        )
        .unwrap();

        assert_eq!(response.token_type.as_deref(), Some("Bearer"));

        let (token, identity) = response.into_parts();
        assert_eq!(token, "abc");
        assert_eq!(identity.id, 5);
        assert_eq!(identity.username, "carol");
        assert_eq!(identity.roles.len(), 1);
    }

    #[test]
    fn test_signup_request_omits_missing_code() {
        let request = SignupRequest {
            username: "dave".to_string(),
            email: "dave@example.com".to_string(),
            password: "secret1".to_string(),
            registration_code: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("registrationCode"));

        let request = SignupRequest {
            registration_code: Some("LIB-2024".to_string()),
            ..request
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""registrationCode":"LIB-2024""#));
    }
}
