// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints.
//!
//! Balance and history are always those of the session's own account; the
//! ledger is asked with the id and hash carried in the session token.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::{
    auth::{Auth, Identity, Role},
    error::ApiError,
    ledger::{Balance, LedgerError, LedgerTransaction},
    state::AppState,
};

const FETCH_FAILED_MESSAGE: &str = "Could not fetch.";

/// Get the current session's identity.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller identity", body = Identity),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(identity): Auth) -> Json<Identity> {
    Json(identity)
}

/// Coin balance of the caller's account.
#[utoipa::path(
    get,
    path = "/v1/users/me/balance",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current balance", body = Balance),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Ledger unreachable")
    )
)]
pub async fn get_my_balance(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Balance>, ApiError> {
    let balance = state
        .ledger
        .balance(&identity.id)
        .await
        .map_err(|e| ApiError::from_ledger(e, FETCH_FAILED_MESSAGE))?;
    Ok(Json(balance))
}

/// Transaction history of the caller's wallet.
#[utoipa::path(
    get,
    path = "/v1/users/me/transactions",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Transaction history", body = Vec<LedgerTransaction>),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Ledger unreachable")
    )
)]
pub async fn get_my_transactions(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<LedgerTransaction>>, ApiError> {
    let transactions = state
        .ledger
        .transactions(&identity.hash)
        .await
        .map_err(|e| ApiError::from_ledger(e, FETCH_FAILED_MESSAGE))?;
    Ok(Json(transactions))
}

/// Register a student account.
#[utoipa::path(
    post,
    path = "/v1/sign-up/users",
    tag = "Sign-up",
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Account created", body = serde_json::Value),
        (status = 400, description = "Rejected by the ledger")
    )
)]
pub async fn sign_up_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    sign_up(&state, Role::Student, body).await
}

/// Register a club account.
#[utoipa::path(
    post,
    path = "/v1/sign-up/clubs",
    tag = "Sign-up",
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Account created", body = serde_json::Value),
        (status = 400, description = "Rejected by the ledger")
    )
)]
pub async fn sign_up_club(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    sign_up(&state, Role::Club, body).await
}

async fn sign_up(
    state: &AppState,
    role: Role,
    body: Value,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !body.is_object() {
        return Err(ApiError::bad_request("Sign-up body must be a JSON object"));
    }

    let created = state
        .ledger
        .sign_up(role, &body)
        .await
        .map_err(|e| match e {
            // Every ledger refusal surfaces as 400
            LedgerError::Rejected { message, .. } => {
                ApiError::bad_request(message.unwrap_or_else(|| "Sign-up failed".to_string()))
            }
            other => ApiError::from_ledger(other, "Sign-up failed"),
        })?;

    info!(%role, "Account registered");
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{club_identity, student_identity, test_state, test_state_with, FakeLedger};
    use serde_json::json;

    #[tokio::test]
    async fn me_returns_session_identity() {
        let Json(identity) = get_current_user(Auth(student_identity())).await;
        assert_eq!(identity, student_identity());
    }

    #[tokio::test]
    async fn balance_uses_caller_id() {
        let (state, ledger) = test_state();
        let Json(balance) = get_my_balance(Auth(student_identity()), State(state))
            .await
            .unwrap();

        assert_eq!(balance.balance, 1500.0);
        assert_eq!(ledger.calls(), vec!["balance:20231234".to_string()]);
    }

    #[tokio::test]
    async fn transactions_use_caller_hash() {
        let (state, ledger) = test_state();
        let Json(history) = get_my_transactions(Auth(club_identity()), State(state))
            .await
            .unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(ledger.calls(), vec!["transactions:club_sada".to_string()]);
    }

    #[tokio::test]
    async fn ledger_not_found_passes_through() {
        let (state, _ledger) = test_state_with(FakeLedger::failing(LedgerError::Rejected {
            status: 404,
            message: Some("user not found".to_string()),
        }));

        let err = get_my_balance(Auth(student_identity()), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "user not found");
    }

    #[tokio::test]
    async fn sign_up_routes_by_role() {
        let (state, ledger) = test_state();

        let (status, _) = sign_up_user(State(state.clone()), Json(json!({"id": "20239999"})))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        sign_up_club(State(state), Json(json!({"id": "newclub"})))
            .await
            .unwrap();

        assert_eq!(
            ledger.calls(),
            vec!["sign_up:student".to_string(), "sign_up:club".to_string()]
        );
    }

    #[tokio::test]
    async fn sign_up_rejection_is_bad_request() {
        let (state, _ledger) = test_state_with(FakeLedger::failing(LedgerError::Rejected {
            status: 409,
            message: Some("id already taken".to_string()),
        }));

        let err = sign_up_user(State(state), Json(json!({"id": "20231234"})))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "id already taken");
    }

    #[tokio::test]
    async fn sign_up_requires_an_object() {
        let (state, ledger) = test_state();
        let err = sign_up_user(State(state), Json(json!([1, 2])))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(ledger.calls().is_empty());
    }
}
