// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session claims and the authenticated identity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{roles::Role, AuthError};
use crate::ledger::LedgerUser;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id (student number or club id)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Public wallet hash
    pub hash: String,
    pub role: Role,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Authenticated account making a request.
///
/// Built once from the ledger's user record at login and carried unchanged
/// in the session token until it expires. `hash` is the public transfer
/// address; it is never derived from `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    pub hash: String,
    pub role: Role,
}

impl Identity {
    /// Map the ledger's login record onto an identity.
    pub fn from_ledger_user(user: LedgerUser) -> Result<Self, AuthError> {
        let role = Role::from_str(&user.account_type).ok_or_else(|| {
            AuthError::InternalError(format!("unknown account type `{}`", user.account_type))
        })?;

        if user.hash.trim().is_empty() {
            return Err(AuthError::InternalError(
                "ledger returned an account without a wallet hash".to_string(),
            ));
        }

        Ok(Self {
            id: user.id,
            display_name: user.name,
            hash: user.hash,
            role,
        })
    }

    pub fn is_club(&self) -> bool {
        self.role == Role::Club
    }
}

/// A verified session: identity plus its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    /// Expiration (Unix seconds)
    pub expires_at: i64,
}

impl Session {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            identity: Identity {
                id: claims.sub,
                display_name: claims.name,
                hash: claims.hash,
                role: claims.role,
            },
            expires_at: claims.exp,
        }
    }

    /// Whether the session is still valid at `now` (Unix seconds).
    pub fn is_live_at(&self, now: i64) -> bool {
        now < self.expires_at
    }
}
