//! Server-side record of the refresh token each user is allowed to present.
//!
//! Values are SHA-256 digests of refresh tokens, never the tokens themselves.

use crate::error::SessionStoreError;
use async_trait::async_trait;
use std::time::Duration;

mod memory;
mod redis;

pub use self::memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<String>, SessionStoreError>;

    /// Overwrites whatever was stored for `user_id`.
    async fn set(
        &self,
        user_id: &str,
        refresh_digest: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// Returns whether an entry was removed. Deleting a missing key is not an error.
    async fn delete(&self, user_id: &str) -> Result<bool, SessionStoreError>;
}
