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

//! Session cookie holding the id of the caller's access token.
//!
//! The cookie value is an HS256 JWT signed with the session secret, so the
//! browser can carry it but not forge or alter it. Its lifetime is fixed at
//! [`SESSION_TTL_SECS`] and is independent of the access token's own expiry.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "customer_session";
pub const SESSION_TTL_SECS: i64 = 3600;

/// Claims carried in the session JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Access token id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl SessionClaims {
    pub const ISSUER: &'static str = "customer-account-api";
}

/// Signs, reads and clears the session cookie.
#[derive(Clone)]
pub struct SessionManager {
    secret: String,
    secure: bool,
    domain: Option<String>,
}

impl SessionManager {
    pub fn new(secret: &str, secure: bool, domain: Option<String>) -> Self {
        Self {
            secret: secret.to_string(),
            secure,
            domain,
        }
    }

    /// Sign a session JWT for `token_id` valid from `now` for one hour.
    pub fn sign(&self, token_id: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            sub: token_id.to_string(),
            iat,
            exp: iat + SESSION_TTL_SECS,
            iss: SessionClaims::ISSUER.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("Failed to sign session JWT: {e}");
            AppError::internal("failed to create session")
        })
    }

    /// Bind `token_id` to a new session; returns the `Set-Cookie` header value.
    pub fn issue(&self, token_id: &str) -> Result<String, AppError> {
        let jwt = self.sign(token_id, Utc::now())?;
        Ok(self.cookie(&jwt, SESSION_TTL_SECS))
    }

    /// `Set-Cookie` header value that clears the session.
    pub fn destroy(&self) -> String {
        self.cookie("", 0)
    }

    /// Access token id stored in the request's session.
    ///
    /// A missing, tampered or expired cookie is [`AppError::MissingAuthentication`].
    pub fn read(&self, headers: &HeaderMap) -> Result<String, AppError> {
        let jwt = session_cookie_value(headers).ok_or(AppError::MissingAuthentication)?;
        self.verify(jwt).map(|claims| claims.sub)
    }

    pub fn verify(&self, jwt: &str) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[SessionClaims::ISSUER]);

        decode::<SessionClaims>(
            jwt,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected session cookie: {e}");
            AppError::MissingAuthentication
        })
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        if let Some(d) = &self.domain {
            cookie.push_str(&format!("; Domain={d}"));
        }
        cookie
    }
}

/// Find the session cookie among all `Cookie` headers.
fn session_cookie_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .map(str::trim)
        .find(|v| !v.is_empty())
}
