use crate::application_port::{AuthError, RefreshToken};
use crate::domain_model::UserId;
use crate::domain_port::TokenStore;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Redis-backed token store, one key per identity. SET is an atomic
/// overwrite, so rotation needs no scripting; the EX ttl lets Redis reap
/// entries alongside token expiry.
pub struct RedisTokenStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisTokenStore {
    pub fn new(conn: redis::aio::ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisTokenStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, user_id: UserId) -> String {
        format!("{}:{}", self.prefix, user_id)
    }
}

#[async_trait::async_trait]
impl TokenStore for RedisTokenStore {
    async fn put(
        &self,
        user_id: UserId,
        token: &RefreshToken,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(&key, token.0.as_str(), ttl_secs)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<RefreshToken>, AuthError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(val.map(RefreshToken))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), AuthError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }
}
