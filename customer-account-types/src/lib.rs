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

//! Shared API types for the customer account API service.
//!
//! This crate defines the wire contract between the service and its
//! consumers (browser scripts, integration tests). It is intentionally
//! framework-agnostic: no axum, no database types.

pub mod error;
pub mod responses;

pub use error::APIError;
pub use responses::APIResponse;
