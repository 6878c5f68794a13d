// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transfer Core
//!
//! Composes the authorization gate, the validator, the direction resolver
//! and the relay into [`submit_transfer`].
//!
//! ## Flow
//!
//! 1. `authorize`: a live session is required, any role
//! 2. `validate`: amount, hashes, activity and classification
//! 3. `resolve_direction`: who pays whom, then `check_debit`: a student
//!    can only spend from their own wallet
//! 4. `relay`: one ledger call, outcome normalized
//!
//! Steps 1 to 3 fail with a [`TransferError`] and never reach the ledger.
//! Step 4 always produces a [`TransferResult`].
//!
//! Nothing is stored. Two identical submissions are two ledger calls.

pub mod direction;
pub mod relay;
pub mod validator;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{authorize, AuthError, Role, Session},
    catalog::{ActivityCatalog, Direction},
    error::{ApiError, FieldError},
    ledger::LedgerClient,
};

pub use direction::{
    check_debit, counterparty_hash, resolve_direction, DirectionError, Party, Route,
};
pub use relay::relay;
pub use validator::{validate, ValidatedTransfer, ValidationError};

/// Transfer as submitted by a client, before any checks.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawTransferInput {
    pub sender_hash: Option<String>,
    pub receiver_hash: Option<String>,
    /// Whole coins, as a JSON number or numeric string.
    #[schema(value_type = Object)]
    pub amount: Option<Value>,
    pub title: Option<String>,
    /// Predefined activity driving title and direction.
    pub activity_id: Option<String>,
    /// `club_to_student` or `student_to_club`, for activities the catalog
    /// does not know (club-managed ones).
    pub transaction_type: Option<String>,
    /// Role of the other party, when the client knows it. Defaults to the
    /// opposite of the caller's role.
    pub counterparty_role: Option<Role>,
}

/// Body of the ledger's `POST /transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub sender_hash: String,
    pub receiver_hash: String,
    pub amount: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<Direction>,
}

/// How the single ledger attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayOutcome {
    /// The ledger answered 2xx.
    #[default]
    Accepted,
    /// The ledger answered with this non-2xx status.
    Rejected(u16),
    TransportFailure { timed_out: bool },
}

/// Normalized outcome of a relayed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransferResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub outcome: RelayOutcome,
}

impl TransferResult {
    /// HTTP status this result should be served with.
    pub fn status_code(&self) -> StatusCode {
        match self.outcome {
            RelayOutcome::Accepted => StatusCode::OK,
            RelayOutcome::Rejected(status) => {
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayOutcome::TransportFailure { timed_out: true } => StatusCode::GATEWAY_TIMEOUT,
            RelayOutcome::TransportFailure { timed_out: false } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for TransferResult {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self)).into_response()
    }
}

/// Why a transfer was refused before reaching the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid transfer request")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Direction(#[from] DirectionError),
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Auth(e) => e.into(),
            TransferError::Validation(errors) => ApiError::bad_request("Invalid transfer request")
                .with_errors(errors.iter().map(FieldError::from).collect()),
            TransferError::Direction(
                e @ (DirectionError::NotAParty | DirectionError::CounterpartyDebit),
            ) => ApiError::forbidden(e.to_string()),
            TransferError::Direction(e @ DirectionError::RoleMismatch { .. }) => {
                ApiError::unprocessable(e.to_string())
            }
        }
    }
}

impl IntoResponse for TransferError {
    fn into_response(self) -> Response {
        match self {
            // Keep the auth body shape (with error_code)
            TransferError::Auth(e) => e.into_response(),
            other => ApiError::from(other).into_response(),
        }
    }
}

/// Authorize, validate, resolve and relay one transfer attempt.
pub async fn submit_transfer(
    session: Option<&Session>,
    raw: &RawTransferInput,
    catalog: &ActivityCatalog,
    ledger: &dyn LedgerClient,
) -> Result<TransferResult, TransferError> {
    let attempt = Uuid::new_v4();
    debug!(%attempt, state = "idle", "Transfer attempt started");

    debug!(%attempt, state = "authorizing");
    let identity = authorize(session, None).inspect_err(|e| {
        debug!(%attempt, state = "failed", error = %e);
    })?;

    debug!(%attempt, state = "validating", actor_role = %identity.role);
    let validated = validate(raw, catalog).map_err(|errors| {
        debug!(%attempt, state = "failed", violations = errors.len());
        TransferError::Validation(errors)
    })?;

    let counterparty = counterparty_hash(
        &identity.hash,
        &validated.sender_hash,
        &validated.receiver_hash,
    )
    .inspect_err(|e| {
        debug!(%attempt, state = "failed", error = %e);
    })?;
    let actor = Party {
        hash: &identity.hash,
        role: identity.role,
    };
    let counterparty = Party {
        hash: counterparty,
        role: raw
            .counterparty_role
            .unwrap_or_else(|| identity.role.complement()),
    };
    let route = resolve_direction(validated.direction, actor, counterparty)
        .and_then(|route| check_debit(&route, actor).map(|()| route))
        .inspect_err(|e| {
            debug!(%attempt, state = "failed", error = %e);
        })?;

    let request = TransferRequest {
        sender_hash: route.sender_hash,
        receiver_hash: route.receiver_hash,
        amount: validated.amount,
        title: validated.title,
        transaction_type: validated.direction,
    };

    debug!(
        %attempt,
        state = "relaying",
        amount = request.amount,
        activity_id = validated.activity_id.as_deref(),
    );
    let result = relay(ledger, &request).await;

    let state = if result.success { "succeeded" } else { "failed" };
    debug!(%attempt, state, "Transfer attempt finished");

    Ok(result)
}
