//! Sign-in and sign-up forms

use crate::client::models::{SigninRequest, SignupRequest};
use crate::error::ValidationError;

/// Shortest password the backend accepts at registration
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct SigninForm {
    pub username: String,
    pub password: String,
}

impl SigninForm {
    pub fn validate(&self) -> Result<SigninRequest, ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::Required("username"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::Required("password"));
        }

        Ok(SigninRequest {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Registration form; a registration code grants the librarian role.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub registration_code: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::Required("username"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::Required("email"));
        }
        if !looks_like_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        let registration_code = self
            .registration_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        Ok(SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            registration_code,
        })
    }
}

/// `local@domain.tld` shape check; the server does the real validation.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
