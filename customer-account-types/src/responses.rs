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

//! Response types for the customer account API service.
//!
//! JSON responses use an [`APIResponse<T>`] envelope:
//! - On success: `{ "success": true,  "result": <T> }`
//! - On failure: `{ "success": false, "result": <APIError> }`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Generic envelope
// ---------------------------------------------------------------------------

/// Top-level API response envelope.
///
/// # Success example
///
/// ```json
/// { "success": true, "result": { "customer": { ... }, "orders": [ ... ] } }
/// ```
///
/// # Error example
///
/// ```json
/// { "success": false, "result": { "code": "MISSING_PARAMETER", "message": "Missing code or state parameter" } }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIResponse<A: Serialize> {
    pub success: bool,
    pub result: A,
}

impl<A: Serialize> APIResponse<A> {
    /// Wrap a successful result.
    pub fn ok(result: A) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

impl APIResponse<crate::error::APIError> {
    /// Wrap an error result.
    pub fn error(err: crate::error::APIError) -> Self {
        Self {
            success: false,
            result: err,
        }
    }
}

// ---------------------------------------------------------------------------
// Order list payloads
// ---------------------------------------------------------------------------

/// Response payload for `GET /customer-account-api/order-list`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderListResponse {
    pub customer: CustomerSummary,
    pub orders: Vec<OrderSummary>,
}

/// The authenticated customer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomerSummary {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

impl CustomerSummary {
    /// Display name, falling back to the email address.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) if !f.is_empty() => format!("{f} {l}"),
            (Some(f), _) if !f.is_empty() => f.clone(),
            _ => self.email.clone().unwrap_or_default(),
        }
    }
}

/// Single order entry inside [`OrderListResponse`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: String,
    /// Human-facing order number, e.g. `#1001`.
    pub name: String,
    /// ISO-8601 timestamp when the order was processed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub processed_at: Option<String>,
    /// Decimal amount as sent by the API (e.g. `"19.99"`).
    pub total_amount: String,
    pub currency_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::APIError;

    #[test]
    fn error_envelope_has_success_false() {
        let json = serde_json::to_value(APIResponse::error(APIError::missing_parameter())).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["result"]["message"], "Missing code or state parameter");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let customer = CustomerSummary {
            first_name: None,
            last_name: None,
            email: Some("jane@example.com".to_string()),
        };
        assert_eq!(customer.display_name(), "jane@example.com");

        let customer = CustomerSummary {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: None,
        };
        assert_eq!(customer.display_name(), "Jane Doe");
    }
}
