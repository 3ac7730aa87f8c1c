use crate::application_port::{AuthError, RefreshToken};
use crate::domain_model::UserId;
use crate::domain_port::TokenStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct StoredToken {
    token: RefreshToken,
    expires_at: DateTime<Utc>,
}

/// Process-local token store for tests, demos and single-node deployments.
/// DashMap gives atomic per-key overwrite, which is all rotation needs.
pub struct MemoryTokenStore {
    entries: DashMap<UserId, StoredToken>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore {
            entries: DashMap::new(),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn put(
        &self,
        user_id: UserId,
        token: &RefreshToken,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let expires_at = Utc::now() + chrono::Duration::seconds(ttl_secs as i64);
        self.entries.insert(
            user_id,
            StoredToken {
                token: token.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<RefreshToken>, AuthError> {
        // Copy out before touching the map again; holding a shard guard
        // across a remove would deadlock.
        let found = self
            .entries
            .get(&user_id)
            .map(|e| (e.token.clone(), e.expires_at));

        match found {
            Some((expired, expires_at)) if expires_at <= Utc::now() => {
                // Evict only the entry we observed. A put may have replaced
                // it since the read above, and that fresh session must
                // survive this cleanup.
                self.entries.remove_if(&user_id, |_, e| e.token == expired);
                Ok(None)
            }
            Some((token, _)) => Ok(Some(token)),
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: UserId) -> Result<(), AuthError> {
        self.entries.remove(&user_id);
        Ok(())
    }
}
