//! Credential storage
//!
//! Read-only username lookup backing authentication and guard checks. The
//! store is built once at startup and never mutated afterwards, so
//! concurrent lookups need no locking.

use std::collections::HashMap;

use crate::auth::Role;

/// Stored credential record
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Read-only credential lookup
///
/// Injected as a trait object so guards and the authenticator can be
/// exercised against in-memory doubles. Implementations must keep
/// usernames unique and must not mutate during a request.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<Credential>;
}

/// In-memory credential table, fixed for the lifetime of the process
pub struct StaticCredentialStore {
    users: HashMap<String, Credential>,
}

impl StaticCredentialStore {
    /// Build a store from a credential table
    ///
    /// Usernames are unique keys; a duplicate replaces the earlier entry.
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let users = credentials
            .into_iter()
            .map(|c| (c.username.clone(), c))
            .collect();
        Self { users }
    }

    /// The built-in account table
    pub fn seeded() -> Self {
        Self::new([
            Credential {
                username: "alice".to_string(),
                password_hash: "$2b$12$rpnsAp6oTeI34cZFkqHMu.cyjO8YWbSxcPwxzi2tln7Z4ks2CNVLK"
                    .to_string(),
                role: Role::User,
            },
            Credential {
                username: "bob".to_string(),
                password_hash: "$2b$12$alOu/MsHr1HQpCe19KU16eRl88tddB8mVawbNATEMtjohW9qrOGu."
                    .to_string(),
                role: Role::User,
            },
            Credential {
                username: "clementine".to_string(),
                password_hash: "$2b$12$MQXRLnaFJz/0.ZlmDxk0N.SgJXuQy0rroPq.WFWsXG8Lsd78It9XK"
                    .to_string(),
                role: Role::User,
            },
            Credential {
                username: "admin".to_string(),
                password_hash: "$2b$12$eB9q2GPsiTmrOVyUJlhCC.69IdpEBibFpEDg7XrZmj9c96jPtuCpu"
                    .to_string(),
                role: Role::Admin,
            },
        ])
    }

}

impl CredentialStore for StaticCredentialStore {
    fn lookup(&self, username: &str) -> Option<Credential> {
        self.users.get(username).cloned()
    }
}
