//! Application state management
//!
//! Contains shared state accessible across all handlers.

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::credentials::CredentialStore;
use crate::questions::QuestionStore;

/// Application state shared across all handlers
///
/// Stores are injected behind trait objects, constructed once at process
/// start and read-only at request time (the question store serializes its
/// own appends internally).
pub struct AppState {
    /// Credential table for login and guard lookups
    pub credentials: Arc<dyn CredentialStore>,

    /// Question table backing the quiz endpoints
    pub questions: Arc<dyn QuestionStore>,

    /// Token codec for signing and verifying access tokens
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        questions: Arc<dyn QuestionStore>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            credentials,
            questions,
            tokens,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
