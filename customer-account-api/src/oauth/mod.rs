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

//! OAuth 2.0 authorization code flow with PKCE against the customer account
//! API identity provider: discovery, initiation, callback and code exchange.

pub mod authorize;
pub mod callback;
pub mod discovery;
pub mod exchange;

pub use authorize::{begin_authorization, build_auth_url};
pub use callback::{complete_authorization, CallbackQuery};
pub use discovery::{
    CustomerAccountApiConfiguration, DiscoveryClient, DiscoverySession, OpenIdConfiguration,
};
pub use exchange::{exchange_code, TokenResponse};

/// Fixed scope set requested on every authorization.
pub const SCOPES: &str = "openid email customer-account-api:full";

pub const CALLBACK_PATH: &str = "/customer-account-api/callback";

/// Public callback URL for a request that arrived on `host`. Initiation and
/// exchange must produce the same value.
pub fn callback_url(host: &str) -> String {
    format!("https://{host}{CALLBACK_PATH}")
}
