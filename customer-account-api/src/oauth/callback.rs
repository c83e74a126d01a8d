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

//! Callback handling: parse → resolve verifier → discover → exchange → persist.
//!
//! Each step short-circuits on failure. The pending authorization is deleted
//! in the resolve step, before the exchange, so a failed exchange can never
//! be retried with the same `state`; the user restarts from the initiator.

use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::AccessToken;

use super::callback_url;
use super::exchange::exchange_code;

/// Query string of the provider redirect.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackQuery {
    /// `code` and `state`, treating empty values as absent.
    fn code_and_state(&self) -> Option<(&str, &str)> {
        let code = self.code.as_deref().filter(|c| !c.is_empty())?;
        let state = self.state.as_deref().filter(|s| !s.is_empty())?;
        Some((code, state))
    }
}

/// Complete an authorization for a callback that arrived on `host`.
/// Returns the persisted access token; binding it to the session is left to
/// the caller.
pub async fn complete_authorization(
    state: &AppState,
    host: &str,
    query: &CallbackQuery,
) -> Result<AccessToken, AppError> {
    if let Some(error) = query.error.as_deref() {
        let detail = query.error_description.as_deref().unwrap_or(error);
        return Err(AppError::ProviderDenied(detail.to_string()));
    }

    let (code, csrf_state) = query.code_and_state().ok_or(AppError::MissingParameter)?;

    let pending = state
        .verifiers
        .consume(csrf_state)
        .await?
        .ok_or(AppError::InvalidState)?;

    let now = Utc::now();
    if pending.is_stale_at(now, state.pending_auth_ttl_secs) {
        tracing::warn!(
            "Rejecting callback for pending authorization created at {}",
            pending.created_at
        );
        return Err(AppError::InvalidState);
    }

    let discovery = state.discovery.session();
    let openid = discovery.openid_configuration().await?;

    let token = exchange_code(
        &state.http,
        &openid.token_endpoint,
        &state.shop.client_id,
        &callback_url(host),
        code,
        &pending.verifier,
    )
    .await?;

    let expires_at = token.expires_at(Utc::now())?;
    if expires_at.is_none() {
        tracing::warn!("Token response has no expires_in; storing token without expiry");
    }

    let record = state
        .tokens
        .create(&state.shop.domain, &token.access_token, expires_at)
        .await?;

    tracing::info!("Stored access token {} for {}", record.id, record.shop);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_missing() {
        let query = CallbackQuery {
            code: Some(String::new()),
            state: Some("s".into()),
            ..Default::default()
        };
        assert!(query.code_and_state().is_none());

        let query = CallbackQuery {
            code: Some("c".into()),
            state: Some("s".into()),
            ..Default::default()
        };
        assert_eq!(query.code_and_state(), Some(("c", "s")));
    }
}
