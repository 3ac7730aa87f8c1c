use crate::application_port::{
    AccessToken, AuthError, RefreshToken, TokenError, TokenPair, TokenService, TokenSigner,
};
use crate::domain_model::UserId;
use crate::domain_port::TokenStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Token lifecycle over a signer and a store, with one logical session per
/// identity. Issue/rotate/revoke for the same identity are serialized by a
/// per-identity lock held only around store access; different identities
/// never contend. Directory lookups happen in the layer above, outside any
/// lock held here.
pub struct SessionTokenService {
    signer: Arc<dyn TokenSigner>,
    store: Arc<dyn TokenStore>,
    session_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl SessionTokenService {
    pub fn new(signer: Arc<dyn TokenSigner>, store: Arc<dyn TokenStore>) -> Self {
        SessionTokenService {
            signer,
            store,
            session_locks: DashMap::new(),
        }
    }

    fn session_lock(&self, user: UserId) -> Arc<Mutex<()>> {
        self.session_locks
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn ttl_secs(until: DateTime<Utc>) -> u64 {
        let secs = (until - Utc::now()).num_seconds();
        if secs <= 0 { 1 } else { secs as u64 }
    }

    /// Signer failures on the verify path collapse to `Unauthorized` so the
    /// caller cannot tell expired from mis-signed from malformed. The detail
    /// still reaches the logs.
    fn unauthorized(err: TokenError) -> AuthError {
        match err {
            TokenError::Internal(e) => AuthError::Internal(e),
            detail => {
                debug!(%detail, "token verification failed");
                AuthError::Unauthorized
            }
        }
    }

    async fn sign_pair(&self, user: UserId) -> Result<TokenPair, AuthError> {
        let (access_token, access_exp) = self
            .signer
            .sign_access(user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let (refresh_token, refresh_exp) = self
            .signer
            .sign_refresh(user)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_token_expires_at: access_exp,
            refresh_token_expires_at: refresh_exp,
        })
    }

    /// The presented token must be the one currently on file. A valid
    /// signature on a token that is absent from or different in the store
    /// means it was rotated away or the session was logged out.
    async fn check_current(&self, user: UserId, token: &RefreshToken) -> Result<(), AuthError> {
        match self.store.get(user).await? {
            Some(current) if current == *token => Ok(()),
            Some(_) => {
                debug!(%user, "refresh token superseded by rotation");
                Err(AuthError::Unauthorized)
            }
            None => {
                debug!(%user, "no active session for refresh token");
                Err(AuthError::Unauthorized)
            }
        }
    }
}

#[async_trait::async_trait]
impl TokenService for SessionTokenService {
    async fn issue(&self, user: UserId) -> Result<TokenPair, AuthError> {
        let pair = self.sign_pair(user).await?;

        let lock = self.session_lock(user);
        let _guard = lock.lock().await;
        self.store
            .put(
                user,
                &pair.refresh_token,
                Self::ttl_secs(pair.refresh_token_expires_at),
            )
            .await?;

        Ok(pair)
    }

    async fn verify_access(&self, token: &AccessToken) -> Result<UserId, AuthError> {
        self.signer
            .verify_access(token)
            .await
            .map_err(Self::unauthorized)
    }

    async fn verify_refresh(&self, token: &RefreshToken) -> Result<UserId, AuthError> {
        let user = self
            .signer
            .verify_refresh(token)
            .await
            .map_err(Self::unauthorized)?;
        self.check_current(user, token).await?;
        Ok(user)
    }

    async fn rotate(&self, token: &RefreshToken) -> Result<TokenPair, AuthError> {
        let user = self
            .signer
            .verify_refresh(token)
            .await
            .map_err(Self::unauthorized)?;

        // Cross-check and overwrite under the same lock: the old token stops
        // working at the instant the new one is stored, with no window where
        // both are current and no torn state between concurrent rotations.
        let lock = self.session_lock(user);
        let _guard = lock.lock().await;
        self.check_current(user, token).await?;

        let pair = self.sign_pair(user).await?;
        self.store
            .put(
                user,
                &pair.refresh_token,
                Self::ttl_secs(pair.refresh_token_expires_at),
            )
            .await?;

        Ok(pair)
    }

    async fn revoke(&self, user: UserId) -> Result<(), AuthError> {
        let lock = self.session_lock(user);
        {
            let _guard = lock.lock().await;
            self.store.delete(user).await?;
        }
        drop(lock);

        // Reclaim the lock slot so the map stays bounded by live sessions.
        // The strong-count check keeps it in place while any in-flight call
        // for this identity still holds a clone.
        self.session_locks
            .remove_if(&user, |_, l| Arc::strong_count(l) == 1);
        Ok(())
    }
}
