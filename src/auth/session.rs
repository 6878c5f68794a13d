// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuing and verification.
//!
//! Sessions are HS256 JWTs signed with `SESSION_SECRET`. The token carries
//! the full [`Identity`] so no server-side session store is needed; a
//! session ends when the token expires.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{
    claims::{Identity, Session, SessionClaims},
    AuthError,
};

/// Signing and verification keys plus the lifetime of issued sessions.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a session token for `identity`, valid from now.
    ///
    /// Returns the token and its expiry (Unix seconds).
    pub fn issue(&self, identity: &Identity) -> Result<(String, i64), AuthError> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issue a session token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: i64) -> Result<(String, i64), AuthError> {
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::InternalError("session TTL out of range".to_string()))?;
        let exp = now.saturating_add(ttl);

        let claims = SessionClaims {
            sub: identity.id.clone(),
            name: identity.display_name.clone(),
            hash: identity.hash.clone(),
            role: identity.role,
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("failed to sign session: {e}")))?;

        Ok((token, exp))
    }

    /// Verify signature and expiry of a session token.
    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        let token_data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            },
        )?;

        Ok(Session::from_claims(token_data.claims))
    }
}
