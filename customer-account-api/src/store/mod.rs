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

//! Persistence for pending authorizations (state → verifier) and issued
//! access tokens.
//!
//! Two backends implement the same traits: [`PgStore`] for deployments and
//! [`MemoryStore`] for local development and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A pending authorization already exists for this `state`.
    #[error("state already exists")]
    DuplicateState,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A code verifier waiting for its callback.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PendingAuthorization {
    pub state: String,
    pub verifier: String,
    pub created_at: DateTime<Utc>,
}

impl PendingAuthorization {
    /// True once the record is older than `ttl_secs`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, ttl_secs: i64) -> bool {
        stale_cutoff(now, ttl_secs).is_some_and(|cutoff| self.created_at < cutoff)
    }
}

/// Creation time before which a pending authorization is stale, or `None`
/// when `ttl_secs` cannot be represented.
pub fn stale_cutoff(now: DateTime<Utc>, ttl_secs: i64) -> Option<DateTime<Utc>> {
    chrono::Duration::try_seconds(ttl_secs).and_then(|ttl| now.checked_sub_signed(ttl))
}

/// An access token issued by the provider's token endpoint.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccessToken {
    pub id: String,
    pub shop: String,
    /// Bearer secret sent verbatim as the `Authorization` header.
    pub access_token: String,
    /// `None` means the provider gave no lifetime.
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("id", &self.id)
            .field("shop", &self.shop)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[async_trait]
pub trait VerifierStore: Send + Sync {
    /// Persist a new pending authorization. Fails with
    /// [`StoreError::DuplicateState`] if `state` is already present.
    async fn store(&self, state: &str, verifier: &str)
        -> Result<PendingAuthorization, StoreError>;

    /// Atomically fetch and delete the record for `state`.
    ///
    /// Of several concurrent calls with the same `state`, exactly one
    /// returns `Some`.
    async fn consume(&self, state: &str) -> Result<Option<PendingAuthorization>, StoreError>;

    /// Delete pending authorizations created before `cutoff`. Returns how
    /// many were removed.
    async fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait AccessTokenStore: Send + Sync {
    async fn create(
        &self,
        shop: &str,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AccessToken, StoreError>;

    /// Plain read; does not check or alter expiry.
    async fn find_by_id(&self, id: &str) -> Result<Option<AccessToken>, StoreError>;
}
