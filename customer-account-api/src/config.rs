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

//! Application configuration loaded from environment variables.

use std::env;
use std::ops::RangeInclusive;

/// Accepted `PENDING_AUTH_TTL_SECS` values: one second to one day.
pub const PENDING_AUTH_TTL_RANGE: RangeInclusive<i64> = 1..=86_400;

/// Deployment environment. Controls the `Secure` attribute on the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Configuration for the customer account API service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:3000").
    pub listen_addr: String,
    /// Storefront domain hosting the discovery documents.
    pub shop_domain: String,
    /// Public OAuth client id registered for the customer account API.
    pub client_id: String,
    /// Secret used to sign session cookies (HMAC-SHA256).
    pub session_secret: String,
    pub environment: Environment,
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Origin serving `/.well-known/*` documents. Defaults to `https://{shop_domain}`.
    pub discovery_base_url: String,
    /// Timeout applied to every outbound call to the identity provider.
    pub http_timeout_secs: u64,
    /// Maximum age of a pending authorization before its `state` is rejected.
    pub pending_auth_ttl_secs: i64,
    /// Cookie domain (optional, e.g. ".example.com").
    pub cookie_domain: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `SHOP_DOMAIN`
    /// - `CUSTOMER_ACCOUNT_API_CLIENT_ID`
    /// - `SESSION_SECRET`
    ///
    /// # Optional
    /// - `APP_ENV` (default: `"development"`)
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:3000"`)
    /// - `DATABASE_URL`
    /// - `DISCOVERY_BASE_URL` (default: `"https://{SHOP_DOMAIN}"`)
    /// - `HTTP_TIMEOUT_SECS` (default: `"10"`)
    /// - `PENDING_AUTH_TTL_SECS` (default: `"600"`)
    /// - `COOKIE_DOMAIN`
    pub fn from_env() -> Result<Self, String> {
        let shop_domain = required("SHOP_DOMAIN")?;
        let client_id = required("CUSTOMER_ACCOUNT_API_CLIENT_ID")?;
        let session_secret = required("SESSION_SECRET")?;

        let environment = Environment::parse(&env::var("APP_ENV").unwrap_or_default());
        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let database_url = optional("DATABASE_URL");
        let discovery_base_url = optional("DISCOVERY_BASE_URL")
            .unwrap_or_else(|| format!("https://{shop_domain}"))
            .trim_end_matches('/')
            .to_string();
        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| "HTTP_TIMEOUT_SECS must be a valid integer")?;
        let pending_auth_ttl_secs = env::var("PENDING_AUTH_TTL_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse::<i64>()
            .map_err(|_| "PENDING_AUTH_TTL_SECS must be a valid integer")?;
        if !PENDING_AUTH_TTL_RANGE.contains(&pending_auth_ttl_secs) {
            return Err(format!(
                "PENDING_AUTH_TTL_SECS must be between {} and {}",
                PENDING_AUTH_TTL_RANGE.start(),
                PENDING_AUTH_TTL_RANGE.end()
            ));
        }
        let cookie_domain = optional("COOKIE_DOMAIN");

        Ok(Self {
            listen_addr,
            shop_domain,
            client_id,
            session_secret,
            environment,
            database_url,
            discovery_base_url,
            http_timeout_secs,
            pending_auth_ttl_secs,
            cookie_domain,
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    optional(name).ok_or_else(|| format!("{name} environment variable is required"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
