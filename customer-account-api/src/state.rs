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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::oauth::DiscoveryClient;
use crate::session::SessionManager;
use crate::store::{AccessTokenStore, VerifierStore};

/// Storefront identity used by the OAuth flow.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Storefront domain, recorded on every stored access token.
    pub domain: String,
    pub client_id: String,
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub shop: ShopConfig,
    /// state → verifier records.
    pub verifiers: Arc<dyn VerifierStore>,
    pub tokens: Arc<dyn AccessTokenStore>,
    /// Client for token exchange and GraphQL calls.
    pub http: reqwest::Client,
    pub discovery: DiscoveryClient,
    pub session: SessionManager,
    /// Maximum age of a pending authorization.
    pub pending_auth_ttl_secs: i64,
}

impl AppState {
    pub fn new(
        config: &Config,
        verifiers: Arc<dyn VerifierStore>,
        tokens: Arc<dyn AccessTokenStore>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            shop: ShopConfig {
                domain: config.shop_domain.clone(),
                client_id: config.client_id.clone(),
            },
            verifiers,
            tokens,
            discovery: DiscoveryClient::new(http.clone(), &config.discovery_base_url),
            http,
            session: SessionManager::new(
                &config.session_secret,
                config.environment.is_production(),
                config.cookie_domain.clone(),
            ),
            pending_auth_ttl_secs: config.pending_auth_ttl_secs,
        })
    }
}
