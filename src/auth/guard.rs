//! Access and role guards
//!
//! Per-request authorization: decode the presented token, re-derive the
//! user from the credential store and enforce scope membership. Guards are
//! parameterized by their required scope set and composed per route.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{Principal, TokenCodec};
use crate::credentials::CredentialStore;
use crate::error::AppError;
use crate::state::SharedState;

/// Scope granting access to the admin surface
pub const SCOPE_ADMIN: &str = "admin";

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::TokenDecode("missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::TokenDecode("invalid authorization format".to_string()))
}

/// Scope-gated access check
///
/// An empty required scope set means authentication only: any valid token
/// with a resolvable subject is accepted.
pub struct AccessGuard {
    required_scopes: Vec<String>,
}

impl AccessGuard {
    pub fn new<I, S>(required_scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_scopes: required_scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Authentication-only guard, no scope requirement
    pub fn authenticated() -> Self {
        Self {
            required_scopes: Vec::new(),
        }
    }

    /// Run the guard against a presented token
    ///
    /// Decode failure, a missing subject and a subject that no longer
    /// exists all terminate the request before any scope is considered.
    pub fn authorize(
        &self,
        tokens: &TokenCodec,
        credentials: &dyn CredentialStore,
        token: &str,
    ) -> Result<Principal, AppError> {
        let claims = tokens.decode(token)?;

        if claims.sub.is_empty() {
            return Err(AppError::TokenDecode("missing subject claim".to_string()));
        }

        // A deleted user cannot keep using an old valid token
        let credential = credentials
            .lookup(&claims.sub)
            .ok_or(AppError::SubjectNotFound)?;

        for scope in &self.required_scopes {
            if !claims.has_scope(scope) {
                return Err(AppError::ScopeDenied);
            }
        }

        Ok(Principal {
            username: credential.username,
            role: credential.role,
        })
    }
}

/// Role-gated access check on top of [`AccessGuard`]
///
/// The stored role is re-checked independently of the token's scope claim,
/// so a token whose scopes and stored role have diverged is still stopped.
pub struct RoleGuard {
    access: AccessGuard,
}

impl RoleGuard {
    /// Guard for the admin surface: scope "admin" plus stored role admin
    pub fn admin() -> Self {
        Self {
            access: AccessGuard::new([SCOPE_ADMIN]),
        }
    }

    pub fn authorize(
        &self,
        tokens: &TokenCodec,
        credentials: &dyn CredentialStore,
        token: &str,
    ) -> Result<Principal, AppError> {
        let principal = self.access.authorize(tokens, credentials, token)?;

        if !principal.role.is_admin() {
            return Err(AppError::RoleDenied);
        }

        Ok(principal)
    }
}

/// Middleware requiring a valid token (no scope requirement)
pub async fn require_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let principal =
        AccessGuard::authenticated().authorize(&state.tokens, state.credentials.as_ref(), token)?;

    // Make the resolved principal available to handlers
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Middleware requiring the admin scope and the admin role
pub async fn require_admin(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let principal = RoleGuard::admin().authorize(&state.tokens, state.credentials.as_ref(), token)?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, Role};
    use crate::config::AuthConfig;
    use crate::credentials::{Credential, StaticCredentialStore};
    use chrono::Utc;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig {
            secret_key: "guard-test-secret".to_string(),
            algorithm: "HS256".to_string(),
            token_ttl_minutes: 30,
        })
        .unwrap()
    }

    fn test_store() -> StaticCredentialStore {
        StaticCredentialStore::new([
            Credential {
                username: "alice".to_string(),
                password_hash: bcrypt::hash("wonderland", 4).unwrap(),
                role: Role::User,
            },
            Credential {
                username: "admin".to_string(),
                password_hash: bcrypt::hash("4dm1n", 4).unwrap(),
                role: Role::Admin,
            },
        ])
    }

    #[test]
    fn test_empty_scope_set_accepts_any_valid_token() {
        let codec = test_codec();
        let store = test_store();
        let token = codec.issue("alice", vec!["user".to_string()]).unwrap();

        let principal = AccessGuard::authenticated()
            .authorize(&codec, &store, &token)
            .unwrap();
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.role, Role::User);
    }

    #[test]
    fn test_missing_scope_is_denied() {
        let codec = test_codec();
        let store = test_store();
        let token = codec.issue("alice", vec!["user".to_string()]).unwrap();

        let err = AccessGuard::new([SCOPE_ADMIN])
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::ScopeDenied));
    }

    #[test]
    fn test_all_required_scopes_must_be_present() {
        let codec = test_codec();
        let store = test_store();
        let token = codec.issue("alice", vec!["read".to_string()]).unwrap();

        let err = AccessGuard::new(["read", "write"])
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::ScopeDenied));

        let token = codec
            .issue("alice", vec!["write".to_string(), "read".to_string()])
            .unwrap();
        assert!(AccessGuard::new(["read", "write"])
            .authorize(&codec, &store, &token)
            .is_ok());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let codec = test_codec();
        let store = test_store();

        let err = AccessGuard::authenticated()
            .authorize(&codec, &store, "garbage")
            .unwrap_err();
        assert!(matches!(err, AppError::TokenDecode(_)));
    }

    #[test]
    fn test_empty_subject_is_rejected() {
        let codec = test_codec();
        let store = test_store();
        let token = codec.issue("", vec![]).unwrap();

        let err = AccessGuard::authenticated()
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::TokenDecode(_)));
    }

    #[test]
    fn test_unknown_subject_is_rejected() {
        let codec = test_codec();
        let store = test_store();
        // Valid signature, but the subject was never (or is no longer) in
        // the credential store
        let token = codec.issue("ghost", vec![SCOPE_ADMIN.to_string()]).unwrap();

        let err = AccessGuard::authenticated()
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::SubjectNotFound));
    }

    #[test]
    fn test_role_guard_defense_in_depth() {
        let codec = test_codec();
        let store = test_store();

        // alice holds role "user" but requested (and was granted) the
        // admin scope at login
        let token = codec
            .issue("alice", vec![SCOPE_ADMIN.to_string()])
            .unwrap();

        // Scope check alone passes
        let principal = AccessGuard::new([SCOPE_ADMIN])
            .authorize(&codec, &store, &token)
            .unwrap();
        assert_eq!(principal.role, Role::User);

        // The stored-role re-check stops her
        let err = RoleGuard::admin()
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::RoleDenied));
    }

    #[test]
    fn test_role_guard_accepts_real_admin() {
        let codec = test_codec();
        let store = test_store();
        let token = codec
            .issue("admin", vec![SCOPE_ADMIN.to_string()])
            .unwrap();

        let principal = RoleGuard::admin()
            .authorize(&codec, &store, &token)
            .unwrap();
        assert_eq!(principal.username, "admin");
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn test_role_guard_requires_scope_even_for_admin() {
        let codec = test_codec();
        let store = test_store();
        // Real admin, but the token was issued without the admin scope
        let token = codec.issue("admin", vec![]).unwrap();

        let err = RoleGuard::admin()
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::ScopeDenied));
    }

    #[test]
    fn test_expired_token_is_rejected_by_guard() {
        let codec = test_codec();
        let store = test_store();
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            scopes: vec![],
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(),
        };
        let token = codec.encode(&claims).unwrap();

        let err = AccessGuard::authenticated()
            .authorize(&codec, &store, &token)
            .unwrap_err();
        assert!(matches!(err, AppError::TokenDecode(_)));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers).unwrap_err(),
            AppError::TokenDecode(_)
        ));

        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(matches!(
            bearer_token(&headers).unwrap_err(),
            AppError::TokenDecode(_)
        ));

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
