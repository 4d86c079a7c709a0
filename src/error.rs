//! Error types for the Lexora CLI

use thiserror::Error;

use crate::session::Capability;

/// Result type alias for Lexora operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Access denied: {0} requires the librarian role.")]
    AccessDenied(Capability),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A failed operation, already phrased for the user
    #[error("{0}")]
    Failed(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl Error {
    /// Message to show the user after a failed operation.
    ///
    /// Uses the server's own message when the backend sent one, the error's
    /// own text for local failures, and `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api(api) => api
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            Error::Validation(_) | Error::AccessDenied(_) | Error::Session(_) => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Rephrase a remote failure with [`user_message`](Self::user_message).
    ///
    /// Missing-credential 401s keep their sign-in hint; local errors pass
    /// through untouched.
    pub fn for_user(self, fallback: &str) -> Error {
        match self {
            Error::Api(ApiError::Unauthorized(None)) => self,
            Error::Api(_) | Error::Json(_) => Error::Failed(self.user_message(fallback)),
            other => other,
        }
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.as_deref().unwrap_or("Authentication required. Run `lexora login` to sign in."))]
    Unauthorized(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("Access denied. You don't have permission to access this resource."))]
    Forbidden(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("Resource not found."))]
    NotFound(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("The request was rejected by the server."))]
    BadRequest(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("The request conflicts with existing data."))]
    Conflict(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("The server encountered an error."))]
    ServerError(Option<String>),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The message carried by the server's error payload, if there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServerError(msg) => msg.as_deref(),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Session and credential errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Credential could not be decoded: {0}")]
    MalformedCredential(String),

    #[error("Credential has expired. Run `lexora login` to sign in again.")]
    Expired,

    #[error("Not signed in. Run `lexora login` first.")]
    NotSignedIn,

    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Local form validation errors. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title, Author, and ISBN cannot be empty or just whitespace.")]
    MissingBookField(&'static str),

    #[error("Please enter a valid ISBN (e.g., 10 or 13 digits, hyphens allowed).")]
    InvalidIsbn,

    #[error("Published Date is required.")]
    MissingPublishedDate,

    #[error("Published Date must be a valid date in YYYY-MM-DD format.")]
    InvalidPublishedDate,

    #[error("{0} is required.")]
    Required(&'static str),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingBookField(field) | ValidationError::Required(field) => field,
            ValidationError::InvalidIsbn => "isbn",
            ValidationError::MissingPublishedDate | ValidationError::InvalidPublishedDate => {
                "publishedDate"
            }
            ValidationError::InvalidEmail => "email",
            ValidationError::PasswordTooShort => "password",
        }
    }
}
