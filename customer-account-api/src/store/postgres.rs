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

//! PostgreSQL store: `code_verifiers` and `access_tokens` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccessToken, AccessTokenStore, PendingAuthorization, StoreError, VerifierStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and apply the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VerifierStore for PgStore {
    async fn store(
        &self,
        state: &str,
        verifier: &str,
    ) -> Result<PendingAuthorization, StoreError> {
        sqlx::query_as::<_, PendingAuthorization>(
            r#"
            INSERT INTO code_verifiers (state, verifier, created_at)
            VALUES ($1, $2, NOW())
            RETURNING state, verifier, created_at
            "#,
        )
        .bind(state)
        .bind(verifier)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateState,
            other => StoreError::Database(other),
        })
    }

    /// Single `DELETE ... RETURNING`: the row lock makes a second concurrent
    /// delete of the same `state` return no row.
    async fn consume(&self, state: &str) -> Result<Option<PendingAuthorization>, StoreError> {
        let row = sqlx::query_as::<_, PendingAuthorization>(
            "DELETE FROM code_verifiers WHERE state = $1 RETURNING state, verifier, created_at",
        )
        .bind(state)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM code_verifiers WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccessTokenStore for PgStore {
    async fn create(
        &self,
        shop: &str,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AccessToken, StoreError> {
        let row = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (id, shop, access_token, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, shop, access_token, expires_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(shop)
        .bind(access_token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AccessToken>, StoreError> {
        let row = sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, shop, access_token, expires_at, created_at, updated_at
            FROM access_tokens
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
