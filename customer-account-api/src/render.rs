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

//! HTML / JSON rendering for the three customer account pages.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{Html, IntoResponse, Response},
    Json,
};
use customer_account_types::{responses::OrderListResponse, APIError, APIResponse};

pub const AUTH_PATH: &str = "/customer-account-api/auth";

/// Representation requested by the client, taken from the `Accept` header.
///
/// Browsers get HTML; anything that explicitly asks for `application/json`
/// (and not `text/html`) gets the `APIResponse` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(a) if a.contains("application/json") && !a.contains("text/html") => Self::Json,
            _ => Self::Html,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ResponseFormat {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok());
        Ok(Self::from_accept(accept))
    }
}

/// Error page with a "try again" link back to the initiator. Always HTTP 200.
pub fn error_page(format: ResponseFormat, error: &APIError) -> Response {
    match format {
        ResponseFormat::Json => Json(APIResponse::error(error.clone())).into_response(),
        ResponseFormat::Html => {
            let body = format!(
                "<h1>Something went wrong</h1>\n\
                 <p class=\"error\" data-code=\"{code}\">{message}</p>\n\
                 <p><a href=\"{AUTH_PATH}\">Try again</a></p>",
                code = escape(&error.code),
                message = escape(&error.message),
            );
            Html(page("Customer account", &body)).into_response()
        }
    }
}

/// Authenticated order list.
pub fn order_list_page(format: ResponseFormat, orders: OrderListResponse) -> Response {
    match format {
        ResponseFormat::Json => Json(APIResponse::ok(orders)).into_response(),
        ResponseFormat::Html => {
            let mut body = format!(
                "<h1>Orders for {}</h1>\n",
                escape(&orders.customer.display_name())
            );
            if orders.orders.is_empty() {
                body.push_str("<p>No orders yet.</p>\n");
            } else {
                body.push_str("<ul class=\"orders\">\n");
                for order in &orders.orders {
                    body.push_str(&format!(
                        "  <li data-id=\"{}\">{} &middot; {} {}{}</li>\n",
                        escape(&order.id),
                        escape(&order.name),
                        escape(&order.total_amount),
                        escape(&order.currency_code),
                        order
                            .processed_at
                            .as_deref()
                            .map(|at| format!(" &middot; {}", escape(at)))
                            .unwrap_or_default(),
                    ));
                }
                body.push_str("</ul>\n");
            }
            body.push_str("<p><a href=\"/customer-account-api/logout\">Sign out</a></p>");
            Html(page("Your orders", &body)).into_response()
        }
    }
}

/// Landing page after logout.
pub fn signed_out_page() -> Html<String> {
    Html(page(
        "Signed out",
        &format!("<h1>Signed out</h1>\n<p><a href=\"{AUTH_PATH}\">Sign in</a></p>"),
    ))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

/// Minimal HTML text/attribute escaping for untrusted strings.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
