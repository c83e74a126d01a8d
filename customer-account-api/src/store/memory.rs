/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! In-process store. State is lost on restart.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AccessToken, AccessTokenStore, PendingAuthorization, StoreError, VerifierStore};

#[derive(Default)]
pub struct MemoryStore {
    pending: Mutex<HashMap<String, PendingAuthorization>>,
    tokens: Mutex<HashMap<String, AccessToken>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending authorizations currently held.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Number of access tokens currently held.
    pub async fn token_count(&self) -> usize {
        self.tokens.lock().await.len()
    }

    /// Insert a pending authorization with an explicit creation time.
    pub async fn insert_pending(&self, pending: PendingAuthorization) {
        self.pending
            .lock()
            .await
            .insert(pending.state.clone(), pending);
    }
}

#[async_trait]
impl VerifierStore for MemoryStore {
    async fn store(
        &self,
        state: &str,
        verifier: &str,
    ) -> Result<PendingAuthorization, StoreError> {
        let mut pending = self.pending.lock().await;
        match pending.entry(state.to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateState),
            Entry::Vacant(slot) => {
                let record = PendingAuthorization {
                    state: state.to_string(),
                    verifier: verifier.to_string(),
                    created_at: Utc::now(),
                };
                Ok(slot.insert(record).clone())
            }
        }
    }

    async fn consume(&self, state: &str) -> Result<Option<PendingAuthorization>, StoreError> {
        Ok(self.pending.lock().await.remove(state))
    }

    async fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut pending = self.pending.lock().await;
        let before = pending.len();
        pending.retain(|_, p| p.created_at >= cutoff);
        Ok((before - pending.len()) as u64)
    }
}

#[async_trait]
impl AccessTokenStore for MemoryStore {
    async fn create(
        &self,
        shop: &str,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AccessToken, StoreError> {
        let now = Utc::now();
        let record = AccessToken {
            id: Uuid::new_v4().to_string(),
            shop: shop.to_string(),
            access_token: access_token.to_string(),
            expires_at,
            created_at: now,
            updated_at: now,
        };
        self.tokens
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.tokens.lock().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn consume_returns_verifier_once() {
        let store = MemoryStore::new();
        store.store("state-1", "verifier-1").await.unwrap();

        let first = store.consume("state-1").await.unwrap();
        assert_eq!(first.map(|p| p.verifier).as_deref(), Some("verifier-1"));

        let second = store.consume("state-1").await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn duplicate_state_is_rejected() {
        let store = MemoryStore::new();
        store.store("dup", "a").await.unwrap();
        let err = store.store("dup", "b").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateState));

        // The original verifier is untouched.
        let kept = store.consume("dup").await.unwrap().unwrap();
        assert_eq!(kept.verifier, "a");
    }

    #[tokio::test]
    async fn concurrent_consumers_see_exactly_one_record() {
        let store = Arc::new(MemoryStore::new());
        store.store("race", "v").await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.consume("race").await.unwrap() })
            })
            .collect();

        let mut hits = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn purge_removes_only_records_older_than_cutoff() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for (state, age) in [("old-1", 900), ("old-2", 601), ("fresh", 10)] {
            store
                .insert_pending(PendingAuthorization {
                    state: state.to_string(),
                    verifier: "v".to_string(),
                    created_at: now - chrono::Duration::seconds(age),
                })
                .await;
        }

        let removed = store
            .purge_stale(now - chrono::Duration::seconds(600))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.pending_count().await, 1);
        assert!(store.consume("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn tokens_round_trip_by_id() {
        let store = MemoryStore::new();
        let created = store
            .create("shop.example.com", "tok1", None)
            .await
            .unwrap();

        let found = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(store.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_ids_are_unique() {
        let store = MemoryStore::new();
        let a = store.create("s", "t", None).await.unwrap();
        let b = store.create("s", "t", None).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.token_count().await, 2);
    }
}
