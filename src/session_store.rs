use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::async_result::AsyncResult;

/// Durable key-value state shared across reconnects for one
/// `{system_id}@{host}:{port}` session: the unacked counter list and
/// partial multipart assemblies. Implementations need per-operation
/// atomicity only; the engine is the single writer for its prefix.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn list_push_left(&self, key: &str, value: &[u8])
        -> AsyncResult<()>;
    async fn list_pop_left(&self, key: &str) -> AsyncResult<Option<Vec<u8>>>;
    async fn list_len(&self, key: &str) -> AsyncResult<usize>;
    async fn get(&self, key: &str) -> AsyncResult<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: &[u8]) -> AsyncResult<()>;
    /// Like `set`, but the key disappears after `ttl`. Backs the
    /// multipart buffers so abandoned assemblies cannot pile up.
    async fn set_expiring(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> AsyncResult<()>;
    async fn delete(&self, key: &str) -> AsyncResult<()>;
}

/// Key layout under one session prefix. The format is stable: other
/// implementations sharing the store must produce identical keys.
#[derive(Clone, Debug)]
pub struct SessionKeys {
    prefix: String,
}

impl SessionKeys {
    pub fn new(system_id: &str, host: &str, port: u16) -> SessionKeys {
        SessionKeys {
            prefix: format!("{}@{}:{}", system_id, host, port),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn unacked(&self) -> String {
        format!("{}#unacked", self.prefix)
    }

    pub fn multipart(&self, multipart_key: &str) -> String {
        format!("{}#multi_{}", self.prefix, multipart_key)
    }
}

enum Entry {
    Value {
        bytes: Vec<u8>,
        expires_at: Option<Instant>,
    },
    List(VecDeque<Vec<u8>>),
}

/// In-memory SessionStore, used by the tests and the demo binary.
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl InMemorySessionStore {
    pub fn new() -> InMemorySessionStore {
        InMemorySessionStore::default()
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, key: &str) {
        if let Some(Entry::Value {
            expires_at: Some(expires_at),
            ..
        }) = entries.get(key)
        {
            if *expires_at <= Instant::now() {
                entries.remove(key);
            }
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn list_push_left(
        &self,
        key: &str,
        value: &[u8],
    ) -> AsyncResult<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(VecDeque::new()))
        {
            Entry::List(list) => {
                list.push_front(value.to_vec());
                Ok(())
            }
            Entry::Value { .. } => {
                Err(format!("key '{}' holds a plain value", key).into())
            }
        }
    }

    async fn list_pop_left(&self, key: &str) -> AsyncResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(key) {
            Some(Entry::List(list)) => Ok(list.pop_front()),
            Some(Entry::Value { .. }) => {
                Err(format!("key '{}' holds a plain value", key).into())
            }
            None => Ok(None),
        }
    }

    async fn list_len(&self, key: &str) -> AsyncResult<usize> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(Entry::List(list)) => Ok(list.len()),
            Some(Entry::Value { .. }) => {
                Err(format!("key '{}' holds a plain value", key).into())
            }
            None => Ok(0),
        }
    }

    async fn get(&self, key: &str) -> AsyncResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired(&mut entries, key);
        match entries.get(key) {
            Some(Entry::Value { bytes, .. }) => Ok(Some(bytes.clone())),
            Some(Entry::List(_)) => {
                Err(format!("key '{}' holds a list", key).into())
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> AsyncResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry::Value {
                bytes: value.to_vec(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_expiring(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> AsyncResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry::Value {
                bytes: value.to_vec(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AsyncResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_push_and_pop_from_the_left() {
        let store = InMemorySessionStore::new();
        store.list_push_left("k", b"a").await.unwrap();
        store.list_push_left("k", b"b").await.unwrap();
        assert_eq!(store.list_len("k").await.unwrap(), 2);
        assert_eq!(store.list_pop_left("k").await.unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.list_pop_left("k").await.unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.list_pop_left("k").await.unwrap(), None);
        assert_eq!(store.list_len("k").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn values_get_set_and_delete() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", b"v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expiring_values_vanish_after_their_ttl() {
        let store = InMemorySessionStore::new();
        store
            .set_expiring("k", b"v", Duration::from_millis(0))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        store
            .set_expiring("k", b"v", Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn session_keys_follow_the_stable_layout() {
        let keys = SessionKeys::new("esmeid", "smsc.example.com", 2775);
        assert_eq!(keys.prefix(), "esmeid@smsc.example.com:2775");
        assert_eq!(keys.unacked(), "esmeid@smsc.example.com:2775#unacked");
        assert_eq!(
            keys.multipart("42_2_447_448"),
            "esmeid@smsc.example.com:2775#multi_42_2_447_448"
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemorySessionStore::new();
        let clone = store.clone();
        store.set("k", b"v").await.unwrap();
        assert_eq!(clone.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
