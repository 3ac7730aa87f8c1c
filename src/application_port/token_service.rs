use crate::application_port::AuthError;
use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Signer-level failure detail. Unit tests and debug logs see these; the
/// `TokenService` boundary collapses all of them except `Internal` into
/// `AuthError::Unauthorized`.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("signer error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

/// Always issued together, never partially.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Signs and verifies compact token payloads. Two independent secrets back
/// the two token kinds: an access token can never verify as a refresh token
/// and vice versa. Pure over its input and the wall clock.
#[async_trait::async_trait]
pub trait TokenSigner: Send + Sync {
    async fn sign_access(&self, user: UserId) -> Result<(AccessToken, DateTime<Utc>), TokenError>;
    async fn sign_refresh(&self, user: UserId)
    -> Result<(RefreshToken, DateTime<Utc>), TokenError>;
    async fn verify_access(&self, token: &AccessToken) -> Result<UserId, TokenError>;
    async fn verify_refresh(&self, token: &RefreshToken) -> Result<UserId, TokenError>;
}

/// Token lifecycle against the durable store: issuance, stateless access
/// verification, rotation-checked refresh verification, revocation.
#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Signs a fresh pair and overwrites any previously stored refresh token
    /// for this identity (single session per user).
    async fn issue(&self, user: UserId) -> Result<TokenPair, AuthError>;

    /// Signature + expiry check only; no store involved.
    async fn verify_access(&self, token: &AccessToken) -> Result<UserId, AuthError>;

    /// Signature check, then a cross-check that the presented token is the
    /// one currently stored for its identity. A token that verifies
    /// cryptographically but is not current has been rotated away or revoked
    /// and is rejected.
    async fn verify_refresh(&self, token: &RefreshToken) -> Result<UserId, AuthError>;

    /// `verify_refresh` then `issue`. The old token becomes unusable at the
    /// same instant the new one becomes valid; the store overwrite is the
    /// single point of switch-over.
    async fn rotate(&self, token: &RefreshToken) -> Result<TokenPair, AuthError>;

    /// Deletes the stored refresh token. Idempotent.
    async fn revoke(&self, user: UserId) -> Result<(), AuthError>;
}
