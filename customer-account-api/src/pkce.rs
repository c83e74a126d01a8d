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

//! PKCE verifier/challenge and anti-CSRF `state` generation.
//!
//! All values are URL-safe base64 without padding, so they never contain
//! `&`, `=`, `+` or `/` and can be placed in a query string verbatim.

use oauth2::{CsrfToken, PkceCodeChallenge, PkceCodeVerifier};

/// Everything the initiator needs to start one authorization.
#[derive(Debug, Clone)]
pub struct PkceMaterial {
    pub verifier: String,
    pub challenge: String,
    pub state: String,
}

impl PkceMaterial {
    /// Fresh verifier, its `S256` challenge and an independent `state`.
    ///
    /// `None` only if the generated verifier falls outside [`VERIFIER_LEN`].
    pub fn generate() -> Option<Self> {
        let verifier = generate_verifier();
        let challenge = generate_challenge(&verifier)?;
        Some(Self {
            verifier,
            challenge,
            state: generate_state(),
        })
    }
}

/// Random code verifier backed by 32 bytes of OS entropy (43 characters).
pub fn generate_verifier() -> String {
    let (_, verifier) = PkceCodeChallenge::new_random_sha256();
    verifier.secret().clone()
}

/// Length bounds RFC 7636 places on a code verifier.
pub const VERIFIER_LEN: std::ops::RangeInclusive<usize> = 43..=128;

/// `base64url(SHA-256(verifier))`, the `S256` challenge method.
///
/// Returns `None` for a verifier outside [`VERIFIER_LEN`].
pub fn generate_challenge(verifier: &str) -> Option<String> {
    if !VERIFIER_LEN.contains(&verifier.len()) {
        return None;
    }
    let verifier = PkceCodeVerifier::new(verifier.to_string());
    Some(
        PkceCodeChallenge::from_code_verifier_sha256(&verifier)
            .as_str()
            .to_string(),
    )
}

/// Random `state` token backed by 16 bytes of OS entropy.
pub fn generate_state() -> String {
    CsrfToken::new_random().secret().clone()
}
