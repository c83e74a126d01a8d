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

//! Access token lookup with expiry enforcement.
//!
//! The store hands back whatever it holds; this is the single place that
//! decides whether a stored token may be used.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::store::{AccessToken, AccessTokenStore};

/// Load the token with `id` and reject it if it has expired at `now`.
pub async fn resolve_access_token(
    store: &dyn AccessTokenStore,
    id: &str,
    now: DateTime<Utc>,
) -> Result<AccessToken, AppError> {
    let token = store.find_by_id(id).await?.ok_or(AppError::TokenNotFound)?;

    if token.is_expired_at(now) {
        tracing::info!("Access token {} expired at {:?}", token.id, token.expires_at);
        return Err(AppError::TokenExpired);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;

    #[tokio::test]
    async fn valid_token_is_returned() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let created = store
            .create("shop", "tok", Some(now + Duration::seconds(60)))
            .await
            .unwrap();

        let token = resolve_access_token(&store, &created.id, now).await.unwrap();
        assert_eq!(token.access_token, "tok");
    }

    #[tokio::test]
    async fn past_expiry_is_rejected_even_though_stored() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let created = store
            .create("shop", "tok", Some(now - Duration::seconds(1)))
            .await
            .unwrap();

        let err = resolve_access_token(&store, &created.id, now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
        // Reading does not purge.
        assert!(store.find_by_id(&created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dangling_id_is_token_not_found() {
        let store = MemoryStore::new();
        let err = resolve_access_token(&store, "gone", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TokenNotFound));
    }

    #[tokio::test]
    async fn token_without_expiry_stays_valid() {
        let store = MemoryStore::new();
        let created = store.create("shop", "tok", None).await.unwrap();
        let much_later = Utc::now() + Duration::days(3650);
        assert!(resolve_access_token(&store, &created.id, much_later)
            .await
            .is_ok());
    }
}
