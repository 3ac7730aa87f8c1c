use crate::application_port::{AuthError, RefreshToken};
use crate::domain_model::UserId;

/// Durable home of the single authoritative refresh token per identity.
/// This is the durability boundary for logout and rotation: a signed token
/// that is no longer in the store is no longer a session.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Unconditionally overwrites any prior value for this identity. The
    /// TTL lets backends expire rows on their own alongside token expiry.
    async fn put(
        &self,
        user_id: UserId,
        token: &RefreshToken,
        ttl_secs: u64,
    ) -> Result<(), AuthError>;

    async fn get(&self, user_id: UserId) -> Result<Option<RefreshToken>, AuthError>;

    /// Idempotent; deleting an absent identity is not an error.
    async fn delete(&self, user_id: UserId) -> Result<(), AuthError>;
}
