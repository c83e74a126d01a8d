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

//! Authorization code → access token exchange.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::AppError;

/// Response from the provider's token endpoint.
#[derive(Deserialize, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds, relative to issuance.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Absolute expiry, or `None` when the provider gave no lifetime.
    ///
    /// A negative lifetime, or one that does not fit a timestamp, is a
    /// token exchange failure.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, AppError> {
        let Some(secs) = self.expires_in else {
            return Ok(None);
        };
        if secs < 0 {
            return Err(AppError::TokenExchange(format!(
                "invalid expires_in: {secs}"
            )));
        }
        Duration::try_seconds(secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .map(Some)
            .ok_or_else(|| AppError::TokenExchange(format!("invalid expires_in: {secs}")))
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// POST the `authorization_code` grant to `token_endpoint`.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    code: &str,
    code_verifier: &str,
) -> Result<TokenResponse, AppError> {
    let params = [
        ("grant_type", "authorization_code"),
        ("client_id", client_id),
        ("redirect_uri", redirect_uri),
        ("code", code),
        ("code_verifier", code_verifier),
    ];

    let response = http
        .post(token_endpoint)
        .form(&params)
        .send()
        .await
        .map_err(|e| AppError::TokenExchange(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Token request failed. Status: {status}, Body: {body}");
        return Err(AppError::TokenExchange(format!("HTTP {status}: {body}")));
    }

    let body_text = response
        .text()
        .await
        .map_err(|e| AppError::TokenExchange(format!("failed to read token response: {e}")))?;

    serde_json::from_str::<TokenResponse>(&body_text)
        .map_err(|e| AppError::TokenExchange(format!("invalid token response: {e}")))
}
