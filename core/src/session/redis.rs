use super::SessionStore;
use crate::config::RedisConfig;
use crate::error::SessionStoreError;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

#[derive(Clone)]
pub struct RedisSessionStore {
    manager: ConnectionManager,
    prefix: String,
}

impl RedisSessionStore {
    pub async fn connect(cfg: &RedisConfig) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(cfg.url.clone())?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self {
            manager,
            prefix: cfg.key_prefix.trim().to_string(),
        })
    }

    fn key(&self, user_id: &str) -> String {
        refresh_key(&self.prefix, user_id)
    }
}

fn refresh_key(prefix: &str, user_id: &str) -> String {
    if prefix.is_empty() {
        format!("refresh:{user_id}")
    } else {
        format!("{prefix}:refresh:{user_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(self.key(user_id)).await?;
        Ok(value)
    }

    async fn set(
        &self,
        user_id: &str,
        refresh_digest: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.manager.clone();
        let secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(self.key(user_id), refresh_digest, secs).await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, SessionStoreError> {
        let mut conn = self.manager.clone();
        let removed: i64 = conn.del(self.key(user_id)).await?;
        Ok(removed > 0)
    }
}
