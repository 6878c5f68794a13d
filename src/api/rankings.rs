// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public leaderboards, passed through from the ledger.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{error::ApiError, ledger::RankingBoard, state::AppState};

async fn board(state: &AppState, board: RankingBoard) -> Result<Json<Value>, ApiError> {
    let ranking = state
        .ledger
        .ranking(board)
        .await
        .map_err(|e| ApiError::from_ledger(e, "Could not fetch."))?;
    Ok(Json(ranking))
}

/// Student ranking by balance.
#[utoipa::path(
    get,
    path = "/v1/rankings/users",
    tag = "Rankings",
    responses(
        (status = 200, description = "Student ranking", body = serde_json::Value),
        (status = 502, description = "Ledger unreachable")
    )
)]
pub async fn user_ranking(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    board(&state, RankingBoard::Users).await
}

/// Club ranking by balance.
#[utoipa::path(
    get,
    path = "/v1/rankings/clubs",
    tag = "Rankings",
    responses(
        (status = 200, description = "Club ranking", body = serde_json::Value),
        (status = 502, description = "Ledger unreachable")
    )
)]
pub async fn club_ranking(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    board(&state, RankingBoard::Clubs).await
}
