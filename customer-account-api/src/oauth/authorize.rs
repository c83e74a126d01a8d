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

//! Authorization initiation: PKCE material, verifier storage, provider URL.

use chrono::Utc;
use url::Url;

use crate::error::AppError;
use crate::pkce::PkceMaterial;
use crate::state::AppState;
use crate::store::stale_cutoff;

use super::{callback_url, SCOPES};

/// Build the provider authorization URL with PKCE (`S256`).
///
/// Parameters are URL-encoded.
pub fn build_auth_url(
    authorization_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    code_challenge: &str,
) -> Result<String, AppError> {
    let mut url = Url::parse(authorization_endpoint).map_err(|e| {
        AppError::Discovery(format!(
            "authorization_endpoint {authorization_endpoint:?} is not a valid URL: {e}"
        ))
    })?;

    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", SCOPES)
        .append_pair("state", state)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256");

    Ok(url.to_string())
}

/// Start an authorization for a request that arrived on `host`.
///
/// Discovery runs before anything is stored, so a discovery failure leaves
/// no pending authorization behind. Stale pending authorizations left by
/// abandoned attempts are purged first. Returns the URL to redirect to.
pub async fn begin_authorization(state: &AppState, host: &str) -> Result<String, AppError> {
    let discovery = state.discovery.session();
    let openid = discovery.openid_configuration().await?;

    purge_stale_authorizations(state).await;

    let pkce = PkceMaterial::generate()
        .ok_or_else(|| AppError::internal("generated code verifier out of range"))?;
    state.verifiers.store(&pkce.state, &pkce.verifier).await?;

    let redirect_uri = callback_url(host);
    let auth_url = build_auth_url(
        &openid.authorization_endpoint,
        &state.shop.client_id,
        &redirect_uri,
        &pkce.state,
        &pkce.challenge,
    )?;

    tracing::info!("Starting customer account authorization, callback {redirect_uri}");
    Ok(auth_url)
}

/// Best effort: a failed purge is logged and does not block sign-in.
async fn purge_stale_authorizations(state: &AppState) {
    let Some(cutoff) = stale_cutoff(Utc::now(), state.pending_auth_ttl_secs) else {
        return;
    };
    match state.verifiers.purge_stale(cutoff).await {
        Ok(0) => {}
        Ok(removed) => tracing::debug!("Purged {removed} stale pending authorizations"),
        Err(e) => tracing::warn!("Failed to purge stale pending authorizations: {e}"),
    }
}
