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

//! Customer account API library.
//!
//! This crate provides the Axum router, application state, configuration and
//! the OAuth 2.0 authorization code + PKCE flow for the customer account API.
//! The binary entry point (`main.rs`) is a thin wrapper that calls into this
//! library.

pub mod config;
pub mod customer;
pub mod error;
pub mod oauth;
pub mod pkce;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod token;
