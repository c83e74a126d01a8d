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

//! Customer account API server entry point.
//!
//! A standalone Axum service that signs customers in through the storefront's
//! identity provider and shows their orders.

use std::sync::Arc;

use customer_account_api::config::Config;
use customer_account_api::routes;
use customer_account_api::state::AppState;
use customer_account_api::store::{AccessTokenStore, MemoryStore, PgStore, VerifierStore};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");

    let (verifiers, tokens) = match &config.database_url {
        Some(url) => {
            let store = Arc::new(
                PgStore::connect(url)
                    .await
                    .expect("failed to connect to PostgreSQL"),
            );
            tracing::info!("Connected to PostgreSQL");
            shared(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            shared(Arc::new(MemoryStore::new()))
        }
    };

    let state =
        AppState::new(&config, verifiers, tokens).expect("failed to build HTTP client");
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!(
        "Customer account API for {} listening on {}",
        config.shop_domain,
        config.listen_addr
    );

    axum::serve(listener, app).await.expect("server error");
}

/// Use one backend for both pending authorizations and access tokens.
fn shared<S>(store: Arc<S>) -> (Arc<dyn VerifierStore>, Arc<dyn AccessTokenStore>)
where
    S: VerifierStore + AccessTokenStore + 'static,
{
    let verifiers: Arc<dyn VerifierStore> = store.clone();
    let tokens: Arc<dyn AccessTokenStore> = store;
    (verifiers, tokens)
}
