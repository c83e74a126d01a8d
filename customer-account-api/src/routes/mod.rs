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

//! Axum router configuration for the customer account API service.

pub mod customer_account;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customer-account-api/auth", get(customer_account::auth))
        .route(
            "/customer-account-api/callback",
            get(customer_account::callback),
        )
        .route(
            "/customer-account-api/order-list",
            get(customer_account::order_list),
        )
        .route("/customer-account-api/logout", get(customer_account::logout))
        .route("/health", get(customer_account::health))
}
