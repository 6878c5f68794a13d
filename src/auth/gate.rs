// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate.
//!
//! Every operation that touches the ledger calls [`authorize`] first, on
//! every call. The check is pure: it reads the session and the clock and
//! nothing else.

use chrono::Utc;

use super::{
    claims::{Identity, Session},
    AuthError, Role,
};

/// Admit the caller if a live session exists and, when `required` is given,
/// its role matches.
pub fn authorize(session: Option<&Session>, required: Option<Role>) -> Result<Identity, AuthError> {
    authorize_at(session, required, Utc::now().timestamp())
}

/// [`authorize`] against an explicit clock reading (Unix seconds).
pub fn authorize_at(
    session: Option<&Session>,
    required: Option<Role>,
    now: i64,
) -> Result<Identity, AuthError> {
    let session = session.ok_or(AuthError::Unauthenticated)?;

    if !session.is_live_at(now) {
        return Err(AuthError::Unauthenticated);
    }

    if let Some(required) = required {
        if session.identity.role != required {
            return Err(AuthError::Forbidden { required });
        }
    }

    Ok(session.identity.clone())
}
