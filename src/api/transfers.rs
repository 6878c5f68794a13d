// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coin transfer endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::CurrentSession,
    state::AppState,
    transfer::{submit_transfer, RawTransferInput, TransferError, TransferResult},
};

/// Submit a coin transfer.
///
/// Used by both the club scanner (scanning a student's QR code) and the
/// student app. The ledger's answer is returned in a normalized shape; its
/// HTTP status is passed through on rejection.
#[utoipa::path(
    post,
    path = "/v1/transfers",
    tag = "Transfers",
    request_body = RawTransferInput,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Ledger accepted the transfer", body = TransferResult),
        (status = 400, description = "Invalid transfer request", body = crate::error::ErrorBody),
        (status = 401, description = "No live session"),
        (status = 403, description = "Caller is not a party to the transfer"),
        (status = 422, description = "Parties do not match the activity direction"),
        (status = 502, description = "Ledger unreachable", body = TransferResult),
        (status = 504, description = "Ledger timed out", body = TransferResult)
    )
)]
pub async fn create_transfer(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(raw): Json<RawTransferInput>,
) -> Result<TransferResult, TransferError> {
    submit_transfer(session.as_ref(), &raw, &state.catalog, state.ledger.as_ref()).await
}
