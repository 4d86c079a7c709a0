//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::{JwtResponse, MessageResponse, SigninRequest, SignupRequest};
use crate::error::Result;

/// Authentication operations for the Lexora API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange username and password for a bearer token and the user's identity
    async fn sign_in(&self, request: &SigninRequest) -> Result<JwtResponse>;

    /// Register a new account
    async fn sign_up(&self, request: &SignupRequest) -> Result<MessageResponse>;
}
