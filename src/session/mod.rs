//! Client-side session: credential persistence, identity and expiry
//!
//! [`SessionStore`] owns the single [`Session`] of the process. It is the only
//! place the session changes (`restore`, `login`, `logout`), and durable
//! storage is always written before the in-memory state so that storage
//! stays the source of truth on the next start.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::client::CredentialSource;
use crate::error::{Result, SessionError};

pub mod gate;
pub mod storage;
pub mod token;

pub use gate::Capability;
pub use storage::{FileStorage, IDENTITY_KEY, SessionStorage, TOKEN_KEY};
pub use token::{Claims, Credential};

static NO_ROLES: BTreeSet<String> = BTreeSet::new();

/// Signed-in user's profile and roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Identity {
    /// Synthesize an identity from credential claims.
    ///
    /// The subject claim is the username and must be present; the other
    /// fields fall back to empty values.
    pub fn from_claims(claims: Claims) -> std::result::Result<Self, SessionError> {
        let username = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| SessionError::MalformedCredential("missing sub claim".to_string()))?;

        Ok(Self {
            id: claims.id.unwrap_or(0),
            username,
            email: claims.email.unwrap_or_default(),
            roles: claims.roles.into_iter().collect(),
        })
    }
}

/// Current authentication state.
///
/// Fields are private: a session is either empty or carries both a credential
/// and an identity, and only [`SessionStore`] builds the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credential: Option<Credential>,
    identity: Option<Identity>,
}

impl Session {
    fn authenticated(credential: Credential, identity: Identity) -> Self {
        Self {
            credential: Some(credential),
            identity: Some(identity),
        }
    }

    /// Credential present and not yet expired
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some() && self.credential.as_ref().is_some_and(|c| !c.is_expired())
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// The identity, only while the session is authenticated
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref().filter(|_| self.is_authenticated())
    }

    /// Role set of the authenticated user; empty otherwise
    pub fn roles(&self) -> &BTreeSet<String> {
        self.identity().map(|i| &i.roles).unwrap_or(&NO_ROLES)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.credential.as_ref().and_then(Credential::expires_at)
    }
}

/// Owner of the process-wide session
pub struct SessionStore<S: SessionStorage> {
    storage: S,
    state: RwLock<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create a store with an empty in-memory session. Call [`restore`](Self::restore)
    /// to rehydrate from storage.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: RwLock::new(Session::default()),
        }
    }

    /// Create a store and immediately restore the persisted session
    pub fn open(storage: S) -> Self {
        let store = Self::new(storage);
        store.restore();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.read_state().clone()
    }

    /// Rehydrate the session from storage.
    ///
    /// Missing data yields the empty session. Expired, malformed or partial
    /// data is dropped from storage and also yields the empty session; none
    /// of these are reported as errors.
    pub fn restore(&self) -> Session {
        let session = match self.load_persisted() {
            Ok(Some(session)) => session,
            Ok(None) => Session::default(),
            Err(reason) => {
                debug!("Discarding persisted session: {}", reason);
                self.clear_storage_best_effort();
                Session::default()
            }
        };

        *self.write_state() = session.clone();
        session
    }

    /// Establish a session from a sign-in credential.
    ///
    /// With `identity` (the sign-in response payload) the identity is stored
    /// verbatim. Without it the identity is decoded from the credential's
    /// claims; if that fails the store is logged out and the error returned.
    pub fn login(&self, token: &str, identity: Option<Identity>) -> Result<Session> {
        // Never leave a new token paired with the previous user's identity
        self.storage.remove(IDENTITY_KEY)?;
        self.storage.set(TOKEN_KEY, token)?;

        match self.establish(token, identity) {
            Ok(session) => Ok(session),
            Err(err) => {
                warn!("Login could not establish a session: {}", err);
                self.logout()?;
                Err(err)
            }
        }
    }

    /// Clear persisted and in-memory session. Safe to call repeatedly.
    pub fn logout(&self) -> Result<()> {
        let token_removed = self.storage.remove(TOKEN_KEY);
        let identity_removed = self.storage.remove(IDENTITY_KEY);

        *self.write_state() = Session::default();
        token_removed.and(identity_removed)
    }

    /// Token to attach to the next request.
    ///
    /// A credential found expired at this point is destroyed.
    pub fn bearer_token(&self) -> Option<String> {
        {
            let state = self.read_state();
            match state.credential() {
                None => return None,
                Some(credential) if !credential.is_expired() => {
                    return Some(credential.token().to_string());
                }
                Some(_) => {}
            }
        }

        debug!("Credential expired; clearing session");
        if let Err(err) = self.logout() {
            warn!("Failed to clear expired session: {}", err);
        }
        None
    }

    fn establish(&self, token: &str, identity: Option<Identity>) -> Result<Session> {
        let (credential, identity) = match identity {
            Some(identity) => {
                // The server vouched for the identity; expiry is read if the token carries one
                let expires_at = Claims::decode(token)
                    .ok()
                    .and_then(|claims| claims.expires_at().ok().flatten());
                (Credential::new(token, expires_at), identity)
            }
            None => {
                let claims = Claims::decode(token)?;
                let expires_at = claims.expires_at()?;
                (
                    Credential::new(token, expires_at),
                    Identity::from_claims(claims)?,
                )
            }
        };

        if credential.is_expired() {
            return Err(SessionError::Expired.into());
        }

        self.storage
            .set(IDENTITY_KEY, &serde_json::to_string(&identity)?)?;

        let session = Session::authenticated(credential, identity);
        *self.write_state() = session.clone();
        Ok(session)
    }

    fn load_persisted(&self) -> Result<Option<Session>> {
        let token = self.storage.get(TOKEN_KEY)?;
        let stored_identity = self.storage.get(IDENTITY_KEY)?;

        let (token, stored_identity) = match (token, stored_identity) {
            (None, None) => return Ok(None),
            (Some(token), Some(identity)) => (token, identity),
            _ => {
                return Err(
                    SessionError::Storage("persisted session is incomplete".to_string()).into(),
                );
            }
        };

        let expires_at = Claims::decode(&token)?.expires_at()?.ok_or_else(|| {
            SessionError::MalformedCredential("missing exp claim".to_string())
        })?;

        let credential = Credential::new(token, Some(expires_at));
        if credential.is_expired() {
            return Err(SessionError::Expired.into());
        }

        let identity: Identity = serde_json::from_str(&stored_identity).map_err(|e| {
            SessionError::MalformedCredential(format!("stored identity is invalid: {e}"))
        })?;

        Ok(Some(Session::authenticated(credential, identity)))
    }

    fn clear_storage_best_effort(&self) {
        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!("Failed to remove {} from session storage: {}", key, err);
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: SessionStorage> CredentialSource for SessionStore<S> {
    fn bearer_token(&self) -> Option<String> {
        SessionStore::bearer_token(self)
    }
}
