//! Authentication and authorization module
//!
//! Provides signed-token authentication with scope and role based access
//! control.

mod guard;
mod password;
mod token;

pub use guard::{bearer_token, require_admin, require_auth, AccessGuard, RoleGuard, SCOPE_ADMIN};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenCodec};

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::error::AppError;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can request questionnaires
    User,
    /// Can additionally append questions to the store
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Resolved identity of the caller for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

/// Verify a username/password pair against the credential store
///
/// Both an unknown username and a password mismatch report the same
/// failure, so callers cannot probe which usernames exist.
pub fn authenticate(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<Principal, AppError> {
    let credential = store
        .lookup(username)
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &credential.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Principal {
        username: credential.username,
        role: credential.role,
    })
}
