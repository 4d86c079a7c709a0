//! Authorization gate: role set → capability checks

use std::collections::BTreeSet;
use std::fmt;

use super::Session;
use crate::error::{Error, Result};

/// Role granted to library staff
pub const ROLE_LIBRARIAN: &str = "ROLE_LIBRARIAN";

/// Role granted to regular members
#[cfg(test)]
pub const ROLE_USER: &str = "ROLE_USER";

/// Actions the UI enables or hides depending on the signed-in user's roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Browse the catalogue
    ViewBooks,
    /// Add, edit and delete books
    ManageBooks,
}

impl Capability {
    /// Roles that grant this capability. An empty slice means any signed-in
    /// or anonymous user may use it.
    fn required_roles(self) -> &'static [&'static str] {
        match self {
            Capability::ViewBooks => &[],
            Capability::ManageBooks => &[ROLE_LIBRARIAN],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ViewBooks => write!(f, "viewing books"),
            Capability::ManageBooks => write!(f, "managing books"),
        }
    }
}

/// Whether a role set grants a capability
pub fn allows(roles: &BTreeSet<String>, capability: Capability) -> bool {
    let required = capability.required_roles();
    required.is_empty() || required.iter().any(|role| roles.contains(*role))
}

/// Whether the session's current roles grant a capability.
///
/// Expired sessions have no roles, so this is evaluated fresh on each call.
pub fn session_allows(session: &Session, capability: Capability) -> bool {
    allows(session.roles(), capability)
}

/// Like [`session_allows`], but as an error the caller can propagate
pub fn require(session: &Session, capability: Capability) -> Result<()> {
    if session_allows(session, capability) {
        Ok(())
    } else {
        Err(Error::AccessDenied(capability))
    }
}
