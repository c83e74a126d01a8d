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

//! Customer account route handlers: auth, callback, order list, logout.
//!
//! After a successful callback the handler issues a **signed session JWT**
//! inside an `HttpOnly; SameSite=Lax` cookie named `customer_session`. The
//! JWT only carries the id of the stored access token; the bearer secret
//! never leaves the server.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::customer;
use crate::error::AppError;
use crate::oauth::{self, CallbackQuery};
use crate::render::{self, ResponseFormat};
use crate::state::AppState;
use crate::token::resolve_access_token;

pub const ORDER_LIST_PATH: &str = "/customer-account-api/order-list";

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// `302 Found` to `location`, optionally setting a cookie.
fn found(location: &str, set_cookie: Option<&str>) -> Result<Response, AppError> {
    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(location)
            .map_err(|e| AppError::internal(format!("invalid redirect location: {e}")))?,
    );
    if let Some(cookie) = set_cookie {
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_str(cookie)
                .map_err(|e| AppError::internal(format!("invalid session cookie: {e}")))?,
        );
    }
    Ok(response)
}

/// Host the request was addressed to; the callback URL is derived from it.
///
/// HTTP/2 requests carry it in the `:authority` pseudo-header, which ends up
/// in the request URI rather than in `Host`.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Result<&'a str, AppError> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .ok_or_else(|| AppError::internal("request has no Host header or authority"))
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /customer-account-api/auth
///
/// Discovers the provider, stores a fresh state → verifier pair and
/// redirects to the authorization endpoint.
pub async fn auth(
    State(state): State<AppState>,
    format: ResponseFormat,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let result = async {
        let host = request_host(&headers, &uri)?;
        let auth_url = oauth::begin_authorization(&state, host).await?;
        found(&auth_url, None)
    }
    .await;

    result.unwrap_or_else(|e| e.render(format))
}

/// GET /customer-account-api/callback?code=...&state=...
///
/// Exchanges the code for an access token, stores it, binds its id to the
/// session cookie and redirects to the order list.
pub async fn callback(
    State(state): State<AppState>,
    format: ResponseFormat,
    headers: HeaderMap,
    uri: Uri,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Response {
    let result = async {
        let Query(query) = query.map_err(|e| AppError::InvalidParameter(e.body_text()))?;
        let host = request_host(&headers, &uri)?;
        let token = oauth::complete_authorization(&state, host, &query).await?;
        let session_cookie = state.session.issue(&token.id)?;
        found(ORDER_LIST_PATH, Some(&session_cookie))
    }
    .await;

    result.unwrap_or_else(|e| e.render(format))
}

/// GET /customer-account-api/order-list
///
/// Resolves session → access token → GraphQL endpoint and renders the
/// customer's orders.
pub async fn order_list(
    State(state): State<AppState>,
    format: ResponseFormat,
    headers: HeaderMap,
) -> Response {
    let result = async {
        let token_id = state.session.read(&headers)?;
        let token = resolve_access_token(state.tokens.as_ref(), &token_id, Utc::now()).await?;

        let discovery = state.discovery.session();
        let api = discovery.customer_account_api().await?;
        let orders = customer::fetch_orders(&state.http, &api.graphql_api, &token.access_token)
            .await?;
        Ok::<_, AppError>(render::order_list_page(format, orders))
    }
    .await;

    result.unwrap_or_else(|e| e.render(format))
}

/// GET /customer-account-api/logout -- clears the session cookie.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut response = render::signed_out_page().into_response();
    match HeaderValue::from_str(&state.session.destroy()) {
        Ok(clear) => {
            response.headers_mut().append(header::SET_COOKIE, clear);
        }
        Err(e) => tracing::error!("Failed to build clearing cookie: {e}"),
    }
    response
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
