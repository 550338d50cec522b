//! Signed token encoding and decoding
//!
//! Wraps HMAC-signed claims in an opaque bearer token string.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{AuthConfig, ConfigError};
use crate::error::AppError;

/// Claims payload carried inside a signed token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Scopes granted at login
    pub scopes: Vec<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Scope membership, order-irrelevant
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Token codec built once at startup from the signing configuration
///
/// The key and algorithm are process-wide and never rotate at runtime.
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl TokenCodec {
    /// Build the codec, rejecting unsupported algorithms
    ///
    /// This is the fatal-at-startup path: a bad algorithm name must abort
    /// the process, not surface per-request.
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        let algorithm: Algorithm = config.algorithm.parse().map_err(|_| {
            ConfigError::InvalidValue(format!("unknown signing algorithm {:?}", config.algorithm))
        })?;

        // Symmetric signing only; the secret key cannot drive RSA/ECDSA
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::InvalidValue(format!(
                "signing algorithm {:?} is not HMAC-based",
                config.algorithm
            )));
        }

        Ok(Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation: Validation::new(algorithm),
            token_ttl: Duration::minutes(config.token_ttl_minutes),
        })
    }

    /// Issue a signed token for a subject with the granted scopes
    pub fn issue(&self, subject: &str, scopes: Vec<String>) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            scopes,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        self.encode(&claims)
    }

    /// Sign a claims payload into a token string
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Decode and validate a token string
    ///
    /// Covers malformed structure, signature mismatch and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::TokenDecode("token expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::TokenDecode("invalid signature".to_string())
                }
                _ => AppError::TokenDecode(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
