// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures of the REST API that are not owned by a
//! single domain module. Transfer types live in [`crate::transfer`], the
//! predefined activity catalog in [`crate::catalog`].
//!
//! ## Model Categories
//!
//! - **Sessions**: login credentials and the issued session token
//! - **Club activities**: drafts for the backend-managed activity CRUD

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{auth::Identity, catalog::Direction};

// =============================================================================
// Session Models
// =============================================================================

/// Credentials forwarded to the ledger's `POST /login`.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Student number or club id.
    pub id: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issued session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Token expiry as RFC 3339 timestamp.
    pub expires_at: String,
    pub user: Identity,
}

// =============================================================================
// Club Activity Models
// =============================================================================

/// Raw create/update body for a club-managed activity.
///
/// Every field is optional on the wire so that missing fields are reported
/// together instead of as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ActivityDraftRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub amount: Option<Value>,
    /// `club_to_student` or `student_to_club`.
    #[serde(default, rename = "type")]
    pub direction: Option<String>,
    #[serde(default)]
    pub club_id: Option<String>,
}

/// Validated activity as sent to the ledger backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub amount: u64,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub club_id: String,
}
