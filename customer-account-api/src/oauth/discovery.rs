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

//! Provider discovery: `.well-known/openid-configuration` and
//! `.well-known/customer-account-api`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::error::AppError;

/// Endpoints from the provider's `.well-known/openid-configuration`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenIdConfiguration {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub end_session_endpoint: Option<String>,
}

/// Endpoints from `.well-known/customer-account-api`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerAccountApiConfiguration {
    pub graphql_api: String,
}

/// Fetches discovery documents from one origin.
#[derive(Clone)]
pub struct DiscoveryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DiscoveryClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn openid_configuration(&self) -> Result<OpenIdConfiguration, AppError> {
        self.fetch("openid-configuration").await
    }

    pub async fn customer_account_api(&self) -> Result<CustomerAccountApiConfiguration, AppError> {
        self.fetch("customer-account-api").await
    }

    /// Start a per-request view that fetches each document at most once.
    pub fn session(&self) -> DiscoverySession<'_> {
        DiscoverySession {
            client: self,
            openid: OnceCell::new(),
            customer_account_api: OnceCell::new(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, document: &str) -> Result<T, AppError> {
        let url = format!("{}/.well-known/{document}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Discovery(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Discovery of {document} failed (HTTP {status}): {body}");
            return Err(AppError::Discovery(format!("HTTP {status}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| AppError::Discovery(format!("invalid {document} document: {e}")))
    }
}

/// Discovery documents memoised for the lifetime of one request.
pub struct DiscoverySession<'a> {
    client: &'a DiscoveryClient,
    openid: OnceCell<OpenIdConfiguration>,
    customer_account_api: OnceCell<CustomerAccountApiConfiguration>,
}

impl DiscoverySession<'_> {
    pub async fn openid_configuration(&self) -> Result<&OpenIdConfiguration, AppError> {
        self.openid
            .get_or_try_init(|| self.client.openid_configuration())
            .await
    }

    pub async fn customer_account_api(
        &self,
    ) -> Result<&CustomerAccountApiConfiguration, AppError> {
        self.customer_account_api
            .get_or_try_init(|| self.client.customer_account_api())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DiscoveryClient {
        DiscoveryClient::new(reqwest::Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn parses_openid_configuration() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issuer": "https://shopify.com/123",
                "authorization_endpoint": "https://shopify.com/123/auth/oauth/authorize",
                "token_endpoint": "https://shopify.com/123/auth/oauth/token"
            })))
            .mount(&server)
            .await;

        let config = client(&server).openid_configuration().await.unwrap();
        assert_eq!(
            config.authorization_endpoint,
            "https://shopify.com/123/auth/oauth/authorize"
        );
        assert_eq!(config.token_endpoint, "https://shopify.com/123/auth/oauth/token");
        assert!(config.end_session_endpoint.is_none());
    }

    #[tokio::test]
    async fn server_error_embeds_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).openid_configuration().await.unwrap_err();
        match err {
            AppError::Discovery(msg) => assert!(msg.contains("500 Internal Server Error"), "{msg}"),
            other => panic!("expected discovery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_required_field_is_discovery_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "authorization_endpoint": "https://shopify.com/123/auth/oauth/authorize"
            })))
            .mount(&server)
            .await;

        let err = client(&server).openid_configuration().await.unwrap_err();
        assert!(matches!(err, AppError::Discovery(_)));
    }

    #[tokio::test]
    async fn session_fetches_each_document_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/customer-account-api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "graphql_api": "https://shopify.com/123/account/customer/api/2025-01/graphql"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let discovery = client(&server);
        let session = discovery.session();
        let first = session.customer_account_api().await.unwrap().clone();
        let second = session.customer_account_api().await.unwrap().clone();
        assert_eq!(first, second);
        // `expect(1)` is verified when the server drops.
    }
}
