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

//! Customer account GraphQL API: the authenticated customer and their orders.

use customer_account_types::responses::{CustomerSummary, OrderListResponse, OrderSummary};
use serde::Deserialize;

use crate::error::ApiQueryError;

const ORDERS_QUERY: &str = r#"
query CustomerOrders {
  customer {
    firstName
    lastName
    emailAddress { emailAddress }
    orders(first: 20, sortKey: PROCESSED_AT, reverse: true) {
      nodes {
        id
        name
        processedAt
        totalPrice { amount currencyCode }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<OrdersData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OrdersData {
    customer: Option<CustomerNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerNode {
    first_name: Option<String>,
    last_name: Option<String>,
    email_address: Option<EmailAddress>,
    orders: OrderConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderConnection {
    nodes: Vec<OrderNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderNode {
    id: String,
    name: String,
    processed_at: Option<String>,
    total_price: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Money {
    amount: String,
    currency_code: String,
}

impl From<CustomerNode> for OrderListResponse {
    fn from(node: CustomerNode) -> Self {
        Self {
            customer: CustomerSummary {
                first_name: node.first_name,
                last_name: node.last_name,
                email: node.email_address.and_then(|e| e.email_address),
            },
            orders: node
                .orders
                .nodes
                .into_iter()
                .map(|o| OrderSummary {
                    id: o.id,
                    name: o.name,
                    processed_at: o.processed_at,
                    total_amount: o.total_price.amount,
                    currency_code: o.total_price.currency_code,
                })
                .collect(),
        }
    }
}

/// Fetch the customer and their recent orders.
///
/// `access_token` goes into `Authorization` as-is; the customer account API
/// does not take a `Bearer` prefix.
pub async fn fetch_orders(
    http: &reqwest::Client,
    graphql_api: &str,
    access_token: &str,
) -> Result<OrderListResponse, ApiQueryError> {
    let response = http
        .post(graphql_api)
        .header(reqwest::header::AUTHORIZATION, access_token)
        .json(&serde_json::json!({ "query": ORDERS_QUERY }))
        .send()
        .await
        .map_err(|e| ApiQueryError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Customer account API request failed. Status: {status}, Body: {body}");
        return Err(ApiQueryError::Transport(format!("HTTP {status}")));
    }

    let body: GraphQlResponse = response
        .json()
        .await
        .map_err(|e| ApiQueryError::Transport(format!("invalid response body: {e}")))?;

    if !body.errors.is_empty() {
        return Err(ApiQueryError::GraphQl(
            body.errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    body.data
        .and_then(|d| d.customer)
        .map(OrderListResponse::from)
        .ok_or_else(|| ApiQueryError::GraphQl(vec!["response has no customer".to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn fetch(server: &MockServer) -> Result<OrderListResponse, ApiQueryError> {
        fetch_orders(
            &reqwest::Client::new(),
            &format!("{}/graphql", server.uri()),
            "shcat_tok1",
        )
        .await
    }

    #[tokio::test]
    async fn maps_customer_and_orders() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "shcat_tok1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "customer": {
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "emailAddress": { "emailAddress": "jane@example.com" },
                    "orders": { "nodes": [{
                        "id": "gid://shopify/Order/1",
                        "name": "#1001",
                        "processedAt": "2025-01-02T03:04:05Z",
                        "totalPrice": { "amount": "19.99", "currencyCode": "CAD" }
                    }]}
                }}
            })))
            .mount(&server)
            .await;

        let result = fetch(&server).await.unwrap();
        assert_eq!(result.customer.email.as_deref(), Some("jane@example.com"));
        assert_eq!(result.orders.len(), 1);
        assert_eq!(result.orders[0].name, "#1001");
        assert_eq!(result.orders[0].total_amount, "19.99");
        assert_eq!(result.orders[0].currency_code, "CAD");
    }

    #[tokio::test]
    async fn graphql_errors_are_application_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": null,
                "errors": [{ "message": "Access denied" }]
            })))
            .mount(&server)
            .await;

        assert_eq!(
            fetch(&server).await.unwrap_err(),
            ApiQueryError::GraphQl(vec!["Access denied".to_string()])
        );
    }

    #[tokio::test]
    async fn http_failure_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        match fetch(&server).await.unwrap_err() {
            ApiQueryError::Transport(msg) => assert!(msg.contains("401"), "{msg}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
