// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Backend Boundary
//!
//! The ledger backend is the system of record for balances, transaction
//! history, accounts and club activities. This service never caches or
//! derives any of that state; it only forwards requests.
//!
//! [`LedgerClient`] is the seam every handler goes through. Production uses
//! [`HttpLedgerClient`]; tests substitute in-process fakes.
//!
//! ## Backend Contract
//!
//! | Call | Endpoint |
//! |------|----------|
//! | login | `POST /login` |
//! | transfer | `POST /transfer` |
//! | balance | `GET /users/{id}/balance` |
//! | transactions | `GET /transactions/{hash}` |
//! | rankings | `GET /users/ranking`, `GET /clubs/ranking` |
//! | sign-up | `POST /users`, `POST /clubs` |
//! | activities | `GET /activities?club_id=`, `POST /activities`, `PUT/DELETE /activities/{id}` |

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    auth::Role,
    models::{ActivityDraft, LoginRequest},
    transfer::TransferRequest,
};

pub use http::HttpLedgerClient;

/// Failure of a single ledger call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The request never produced a response (connect, DNS, reset).
    #[error("ledger unreachable: {0}")]
    Transport(String),

    /// No response within the configured timeout. The call may still have
    /// been applied by the backend.
    #[error("ledger call timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-2xx status.
    #[error("ledger rejected the request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The backend answered 2xx but the body could not be decoded.
    #[error("ledger response was invalid: {0}")]
    InvalidResponse(String),
}

/// User record returned by `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub hash: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Body of a 2xx answer to `POST /transfer`. Both fields are optional on
/// the wire; the relay supplies defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransferAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Coin balance of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Balance {
    pub balance: f64,
}

/// One entry of an account's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LedgerTransaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub amount: f64,
    /// `club_to_student` or `student_to_club`.
    pub transaction_type: String,
    pub timestamp: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Which ranking board to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingBoard {
    Users,
    Clubs,
}

impl RankingBoard {
    fn collection(self) -> &'static str {
        match self {
            RankingBoard::Users => "users",
            RankingBoard::Clubs => "clubs",
        }
    }
}

/// Operations the ledger backend offers to this service.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Check credentials and return the account record.
    async fn login(&self, credentials: &LoginRequest) -> Result<LedgerUser, LedgerError>;

    /// Submit one transfer. Exactly one HTTP attempt is made.
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferAck, LedgerError>;

    async fn balance(&self, user_id: &str) -> Result<Balance, LedgerError>;

    async fn transactions(&self, hash: &str) -> Result<Vec<LedgerTransaction>, LedgerError>;

    async fn ranking(&self, board: RankingBoard) -> Result<Value, LedgerError>;

    /// Create a student (`Role::Student`) or club (`Role::Club`) account.
    async fn sign_up(&self, role: Role, body: &Value) -> Result<Value, LedgerError>;

    async fn list_activities(&self, club_id: Option<&str>) -> Result<Value, LedgerError>;

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Value, LedgerError>;

    async fn update_activity(&self, id: &str, draft: &ActivityDraft)
        -> Result<Value, LedgerError>;

    async fn delete_activity(&self, id: &str) -> Result<Value, LedgerError>;

    /// Reachability check for readiness probes. Any HTTP answer counts.
    async fn probe(&self) -> Result<(), LedgerError>;
}

/// Accept ids the backend sends either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_user_accepts_numeric_id() {
        let user: LedgerUser = serde_json::from_str(
            r#"{"id": 20231234, "name": "Kim", "hash": "stu_hash_abc", "type": "student"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "20231234");
        assert_eq!(user.account_type, "student");
    }

    #[test]
    fn transfer_ack_tolerates_missing_fields() {
        let ack: TransferAck = serde_json::from_str("{}").unwrap();
        assert_eq!(ack, TransferAck::default());
    }

    #[test]
    fn transaction_history_entry_decodes() {
        let tx: LedgerTransaction = serde_json::from_str(
            r#"{"id": 7, "amount": 500, "transaction_type": "club_to_student",
                "timestamp": "2025-05-01T10:00:00", "title": "Event participation reward"}"#,
        )
        .unwrap();
        assert_eq!(tx.id, "7");
        assert_eq!(tx.amount, 500.0);
    }

    #[test]
    fn string_or_number_rejects_other_shapes() {
        let result: Result<LedgerUser, _> = serde_json::from_str(
            r#"{"id": null, "name": "Kim", "hash": "h", "type": "student"}"#,
        );
        assert!(result.is_err());
    }
}
