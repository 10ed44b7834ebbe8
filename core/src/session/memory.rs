use super::SessionStore;
use crate::error::SessionStoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry {
    digest: String,
    expires_at: Instant,
}

/// Process-local store, used by tests and single-node development setups.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.live_digest(user_id).is_some()
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_digest(&self, user_id: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        match entries.get(user_id) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.digest.clone()),
            Some(_) => {
                entries.remove(user_id);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.live_digest(user_id))
    }

    async fn set(
        &self,
        user_id: &str,
        refresh_digest: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        self.entries.lock().insert(
            user_id.to_string(),
            Entry {
                digest: refresh_digest.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, SessionStoreError> {
        Ok(self.entries.lock().remove(user_id).is_some())
    }
}
