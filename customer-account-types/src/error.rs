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

//! API error types.
//!
//! Every failed response is returned as `APIResponse<APIError>` with `success: false`.

use serde::{Deserialize, Serialize};

/// Structured error returned in the `result` field of a failed [`super::APIResponse`].
///
/// The `code` field is a machine-readable identifier (e.g. `"INVALID_STATE"`).
/// The `message` field is a human-readable description suitable for display.
/// The `engineering_error` field carries debug-level detail (upstream status
/// lines, DB errors) that is useful during development but should be stripped
/// or redacted in production.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct APIError {
    /// Machine-readable error code (e.g. `"MISSING_PARAMETER"`, `"TOKEN_EXPIRED"`).
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional engineering-level detail for debugging.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub engineering_error: Option<String>,
}

impl APIError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            engineering_error: None,
        }
    }

    /// Attach engineering detail to an existing error.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.engineering_error = Some(detail.into());
        self
    }

    pub fn missing_authentication() -> Self {
        Self::new("MISSING_AUTHENTICATION", "Not authenticated. Please sign in.")
    }

    pub fn token_not_found() -> Self {
        Self::new("TOKEN_NOT_FOUND", "Access token not found. Please sign in again.")
    }

    pub fn token_expired() -> Self {
        Self::new("TOKEN_EXPIRED", "Access token has expired. Please sign in again.")
    }

    pub fn missing_parameter() -> Self {
        Self::new("MISSING_PARAMETER", "Missing code or state parameter")
    }

    pub fn invalid_parameter() -> Self {
        Self::new("INVALID_PARAMETER", "Malformed callback parameters")
    }

    pub fn invalid_state() -> Self {
        Self::new("INVALID_STATE", "Invalid or expired state parameter")
    }

    pub fn duplicate_state() -> Self {
        Self::new("DUPLICATE_STATE", "Authorization state already in use")
    }

    pub fn provider_denied(error: &str) -> Self {
        Self::new(
            "PROVIDER_DENIED",
            format!("Authorization was not granted: {error}"),
        )
    }

    pub fn discovery_error(detail: &str) -> Self {
        Self::new(
            "DISCOVERY_ERROR",
            format!("Failed to fetch identity provider configuration: {detail}"),
        )
    }

    pub fn token_exchange_error(detail: &str) -> Self {
        Self::new(
            "TOKEN_EXCHANGE_ERROR",
            format!("Failed to exchange authorization code: {detail}"),
        )
    }

    pub fn api_transport_error(detail: &str) -> Self {
        Self::new(
            "API_TRANSPORT_ERROR",
            format!("Customer account API request failed: {detail}"),
        )
    }

    pub fn api_graphql_error(messages: &[String]) -> Self {
        Self::new(
            "API_GRAPHQL_ERROR",
            format!("Customer account API returned errors: {}", messages.join("; ")),
        )
    }

    pub fn internal_error(detail: &str) -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error").with_detail(detail)
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for APIError {}
