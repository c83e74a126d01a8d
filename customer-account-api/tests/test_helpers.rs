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

//! Shared test helpers for customer-account-api integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header, StatusCode};
use axum::response::Response;
use axum::Router;
use customer_account_api::config::{Config, Environment};
use customer_account_api::routes;
use customer_account_api::state::AppState;
use customer_account_api::store::MemoryStore;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_HOST: &str = "shop.test";
pub const TEST_CLIENT_ID: &str = "shp_test-client";
pub const TEST_SESSION_SECRET: &str = "test-secret-for-integration-tests";
pub const CALLBACK_URL: &str = "https://shop.test/customer-account-api/callback";

/// Router plus handles on everything behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    /// Fake identity provider serving discovery, token and GraphQL endpoints.
    pub provider: MockServer,
}

pub fn test_config(discovery_base_url: &str) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        shop_domain: TEST_HOST.to_string(),
        client_id: TEST_CLIENT_ID.to_string(),
        session_secret: TEST_SESSION_SECRET.to_string(),
        environment: Environment::Development,
        database_url: None,
        discovery_base_url: discovery_base_url.to_string(),
        http_timeout_secs: 5,
        pending_auth_ttl_secs: 600,
        cookie_domain: None,
    }
}

/// App whose provider answers both discovery documents.
pub async fn spawn_app() -> TestApp {
    let provider = MockServer::start().await;
    mount_discovery(&provider).await;
    build_app(provider).await
}

/// App whose provider has nothing mounted yet.
pub async fn build_app(provider: MockServer) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(&test_config(&provider.uri()), store.clone(), store.clone())
        .expect("build app state");
    let router = routes::router().with_state(state.clone());
    TestApp {
        router,
        state,
        store,
        provider,
    }
}

pub async fn mount_discovery(provider: &MockServer) {
    let uri = provider.uri();
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "issuer": uri,
            "authorization_endpoint": format!("{uri}/authorize"),
            "token_endpoint": format!("{uri}/oauth/token"),
        })))
        .mount(provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/.well-known/customer-account-api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "graphql_api": format!("{uri}/graphql"),
        })))
        .mount(provider)
        .await;
}

/// GET request addressed to [`TEST_HOST`].
pub fn get(uri: &str) -> http::request::Builder {
    http::Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::HOST, TEST_HOST)
}

/// Same as [`get`] but asking for the JSON envelope.
pub fn get_json(uri: &str) -> http::request::Builder {
    get(uri).header(header::ACCEPT, "application/json")
}

impl TestApp {
    pub async fn send(&self, req: http::request::Builder) -> Response {
        self.router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Run `/auth` and return the `state` placed in the provider redirect.
    pub async fn begin_auth(&self) -> HashMap<String, String> {
        let resp = self.send(get("/customer-account-api/auth")).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        query_params(location(&resp))
    }
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

/// `name=value` part of the response's `Set-Cookie`.
pub fn session_cookie(resp: &Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn query_params(url: &str) -> HashMap<String, String> {
    url::Url::parse(url)
        .expect("absolute URL")
        .query_pairs()
        .into_owned()
        .collect()
}

/// Consume a response body as text.
pub async fn response_text(resp: Response) -> String {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Consume a response body and deserialize JSON into `T`.
pub async fn response_json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("deserialize response body")
}
