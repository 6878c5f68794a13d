// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for sessions.
//!
//! Use the `Auth` extractor in handlers to require a session, or
//! `ClubOnly` to require a club session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is the caller's Identity
//! }
//! ```
//!
//! Handlers that run the transfer core take `CurrentSession` instead and
//! hand the session to the authorization gate themselves.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{gate::authorize, AuthError, Identity, Role, Session};
use crate::state::AppState;

/// The caller's verified session, if any.
///
/// A request without an `Authorization` header yields `None`. A header that
/// is present but unusable is rejected, so clients learn why their token
/// was refused.
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A layer may already have verified the session
        if let Some(session) = parts.extensions.get::<Session>().cloned() {
            return Ok(CurrentSession(Some(session)));
        }

        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(CurrentSession(None));
        };

        let header = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;

        let session = state.session_keys.verify(token)?;
        Ok(CurrentSession(Some(session)))
    }
}

/// Extractor for any authenticated account.
pub struct Auth(pub Identity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        let identity = authorize(session.as_ref(), None)?;
        Ok(Auth(identity))
    }
}

/// Extractor that requires a club account.
pub struct ClubOnly(pub Identity);

impl FromRequestParts<AppState> for ClubOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        let identity = authorize(session.as_ref(), Some(Role::Club))?;
        Ok(ClubOnly(identity))
    }
}
