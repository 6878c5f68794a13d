// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session bootstrap.

use axum::{extract::State, Json};
use chrono::DateTime;
use tracing::{info, warn};

use crate::{
    auth::{AuthError, Identity},
    error::ApiError,
    ledger::LedgerError,
    models::{LoginRequest, LoginResponse},
    state::AppState,
};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid id or password";

/// Log in with ledger credentials and receive a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 400, description = "Missing id or password"),
        (status = 401, description = "Credentials rejected by the ledger"),
        (status = 502, description = "Ledger unreachable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.id.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("id and password are required"));
    }

    let user = state.ledger.login(&request).await.map_err(|e| match e {
        LedgerError::Rejected { status, message } if (400..500).contains(&status) => {
            warn!(status, id = %request.id, "Ledger refused login");
            AuthError::InvalidCredentials(
                message.unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string()),
            )
            .into()
        }
        other => ApiError::from_ledger(other, "Login failed"),
    })?;

    let identity = Identity::from_ledger_user(user)?;
    let (token, exp) = state.session_keys.issue(&identity)?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    info!(user_id = %identity.id, role = %identity.role, "Session issued");

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: identity,
    }))
}
