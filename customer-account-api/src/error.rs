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

//! Application error type.
//!
//! Failures never leave a handler as a 4xx/5xx. Each one is logged and then
//! rendered with [`AppError::render`] as a local error page (or the
//! `APIResponse<APIError>` envelope for JSON clients) carrying a link that
//! restarts the flow.

use axum::response::{IntoResponse, Response};
use customer_account_types::APIError;
use thiserror::Error;

use crate::render::{self, ResponseFormat};
use crate::store::StoreError;

/// Failure of the downstream customer account GraphQL query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiQueryError {
    /// The request never produced a usable response (network, HTTP status, bad body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered but reported GraphQL errors.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),
}

#[derive(Debug, Error)]
pub enum AppError {
    /// No session cookie, or the cookie failed verification or has expired.
    #[error("missing authentication")]
    MissingAuthentication,

    /// The session references an access token that does not exist.
    #[error("access token not found")]
    TokenNotFound,

    #[error("access token expired")]
    TokenExpired,

    /// The callback was missing `code` or `state`.
    #[error("Missing code or state parameter")]
    MissingParameter,

    /// The callback query string could not be parsed at all.
    #[error("malformed callback query: {0}")]
    InvalidParameter(String),

    /// Unknown, replayed, or stale `state`.
    #[error("invalid state parameter")]
    InvalidState,

    #[error("authorization state already exists")]
    DuplicateState,

    /// The provider redirected back with `error=...` instead of a code.
    #[error("provider denied authorization: {0}")]
    ProviderDenied(String),

    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("customer account API query failed: {0}")]
    ApiQuery(#[from] ApiQueryError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Convert to the wire error. Engineering detail is only attached for
    /// failures whose detail does not come from user input.
    pub fn api_error(&self) -> APIError {
        match self {
            Self::MissingAuthentication => APIError::missing_authentication(),
            Self::TokenNotFound => APIError::token_not_found(),
            Self::TokenExpired => APIError::token_expired(),
            Self::MissingParameter => APIError::missing_parameter(),
            Self::InvalidParameter(_) => APIError::invalid_parameter(),
            Self::InvalidState => APIError::invalid_state(),
            Self::DuplicateState => APIError::duplicate_state(),
            Self::ProviderDenied(error) => APIError::provider_denied(error),
            Self::Discovery(detail) => APIError::discovery_error(detail),
            Self::TokenExchange(detail) => APIError::token_exchange_error(detail),
            Self::ApiQuery(ApiQueryError::Transport(detail)) => {
                APIError::api_transport_error(detail)
            }
            Self::ApiQuery(ApiQueryError::GraphQl(messages)) => {
                APIError::api_graphql_error(messages)
            }
            Self::Storage(detail) | Self::Internal(detail) => APIError::internal_error(detail),
        }
    }

    /// Log the failure and render it for local display.
    pub fn render(self, format: ResponseFormat) -> Response {
        let api_error = self.api_error();
        tracing::error!("{} ({})", self, api_error.code);
        render::error_page(format, &api_error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.render(ResponseFormat::Html)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateState => Self::DuplicateState,
            StoreError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}
