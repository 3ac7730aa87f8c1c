use crate::application_port::{RefreshToken, TokenPair};
use crate::domain_model::UserId;

/// Caller-facing failure taxonomy. Verification failures are deliberately
/// collapsed into `Unauthorized` so callers cannot tell a bad signature from
/// an expired or rotated-away token; the distinguishing detail only reaches
/// the logs. `Store` and `Internal` are infrastructure failures and always
/// propagate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("there is no user under this email")]
    UserNotFound,
    #[error("user already exists")]
    UserExists,
    #[error("unauthorized")]
    Unauthorized,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub tokens: TokenPair,
}

/// One-way password hash capability. Both operations are safe against timing
/// side-channels; the argon2 implementation lives in `application_impl`.
#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

/// The four user-facing flows plus the header parse used by protected routes.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// `UserNotFound` when the email is unknown, `Unauthorized` on a bad
    /// password, otherwise a fresh token pair.
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;

    /// `UserExists` when the email is already on file; no record is created
    /// and no tokens are issued in that case.
    async fn registration(&self, request: RegistrationInput) -> Result<LoginResult, AuthError>;

    /// Best-effort session termination. An invalid, expired or already-rotated
    /// token still means "not logged in", which is the desired end state, so
    /// expected verification failures are swallowed. Infrastructure failures
    /// still propagate.
    async fn logout(&self, refresh_token: &RefreshToken) -> Result<(), AuthError>;

    /// Rotates the presented refresh token and returns the full new pair.
    /// The old refresh token is unusable from the moment this returns.
    async fn refresh_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<TokenPair, AuthError>;

    /// Expects `Bearer <access token>`; anything else is `Unauthorized`.
    async fn parse_authorization_header(&self, header: &str) -> Result<UserId, AuthError>;
}
