// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit and router tests.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    auth::{Identity, Role, SessionKeys},
    catalog::ActivityCatalog,
    ledger::{
        Balance, LedgerClient, LedgerError, LedgerTransaction, LedgerUser, RankingBoard,
        TransferAck,
    },
    models::{ActivityDraft, LoginRequest},
    state::AppState,
    transfer::TransferRequest,
};

pub const TEST_SECRET: &[u8] = b"test-session-secret-at-least-32-bytes!!";

pub fn club_identity() -> Identity {
    Identity {
        id: "sada".to_string(),
        display_name: "SADA".to_string(),
        hash: "club_sada".to_string(),
        role: Role::Club,
    }
}

pub fn student_identity() -> Identity {
    Identity {
        id: "20231234".to_string(),
        display_name: "Kim".to_string(),
        hash: "stu_hash_abc".to_string(),
        role: Role::Student,
    }
}

/// In-process ledger that records every call.
pub struct FakeLedger {
    pub transfer_answer: Result<TransferAck, LedgerError>,
    pub login_answer: Result<LedgerUser, LedgerError>,
    /// Answer for the pass-through calls (rankings, sign-up, activities).
    pub value_answer: Result<Value, LedgerError>,
    /// When set, every call fails with this error instead.
    pub failure: Option<LedgerError>,
    calls: Mutex<Vec<String>>,
    transfers: Mutex<Vec<TransferRequest>>,
    drafts: Mutex<Vec<ActivityDraft>>,
}

impl Default for FakeLedger {
    fn default() -> Self {
        Self {
            transfer_answer: Ok(TransferAck {
                success: Some(true),
                message: Some("ok".to_string()),
            }),
            login_answer: Ok(LedgerUser {
                id: "sada".to_string(),
                name: "SADA".to_string(),
                hash: "club_sada".to_string(),
                account_type: "club".to_string(),
            }),
            value_answer: Ok(json!({ "success": true })),
            failure: None,
            calls: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
            drafts: Mutex::new(Vec::new()),
        }
    }
}

impl FakeLedger {
    pub fn answering(transfer_answer: Result<TransferAck, LedgerError>) -> Self {
        Self {
            transfer_answer,
            ..Default::default()
        }
    }

    pub fn with_login(login_answer: Result<LedgerUser, LedgerError>) -> Self {
        Self {
            login_answer,
            ..Default::default()
        }
    }

    pub fn with_value(value_answer: Result<Value, LedgerError>) -> Self {
        Self {
            value_answer,
            ..Default::default()
        }
    }

    pub fn failing(error: LedgerError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn transfer_calls(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }

    pub fn transfer_requests(&self) -> Vec<TransferRequest> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn drafts(&self) -> Vec<ActivityDraft> {
        self.drafts.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn login(&self, credentials: &LoginRequest) -> Result<LedgerUser, LedgerError> {
        self.record(format!("login:{}", credentials.id))?;
        self.login_answer.clone()
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferAck, LedgerError> {
        self.transfers.lock().unwrap().push(request.clone());
        self.record("transfer".to_string())?;
        self.transfer_answer.clone()
    }

    async fn balance(&self, user_id: &str) -> Result<Balance, LedgerError> {
        self.record(format!("balance:{user_id}"))?;
        Ok(Balance { balance: 1500.0 })
    }

    async fn transactions(&self, hash: &str) -> Result<Vec<LedgerTransaction>, LedgerError> {
        self.record(format!("transactions:{hash}"))?;
        Ok(vec![LedgerTransaction {
            id: "1".to_string(),
            amount: 500.0,
            transaction_type: "club_to_student".to_string(),
            timestamp: "2025-05-01T10:00:00".to_string(),
            title: Some("Event participation reward".to_string()),
        }])
    }

    async fn ranking(&self, board: RankingBoard) -> Result<Value, LedgerError> {
        self.record(format!("ranking:{board:?}"))?;
        self.value_answer.clone()
    }

    async fn sign_up(&self, role: Role, _body: &Value) -> Result<Value, LedgerError> {
        self.record(format!("sign_up:{role}"))?;
        self.value_answer.clone()
    }

    async fn list_activities(&self, club_id: Option<&str>) -> Result<Value, LedgerError> {
        self.record(format!("list_activities:{}", club_id.unwrap_or("*")))?;
        self.value_answer.clone()
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Value, LedgerError> {
        self.drafts.lock().unwrap().push(draft.clone());
        self.record("create_activity".to_string())?;
        self.value_answer.clone()
    }

    async fn update_activity(&self, id: &str, draft: &ActivityDraft) -> Result<Value, LedgerError> {
        self.drafts.lock().unwrap().push(draft.clone());
        self.record(format!("update_activity:{id}"))?;
        self.value_answer.clone()
    }

    async fn delete_activity(&self, id: &str) -> Result<Value, LedgerError> {
        self.record(format!("delete_activity:{id}"))?;
        self.value_answer.clone()
    }

    async fn probe(&self) -> Result<(), LedgerError> {
        self.record("probe".to_string())
    }
}

pub fn test_state() -> (AppState, Arc<FakeLedger>) {
    test_state_with(FakeLedger::default())
}

pub fn test_state_with(ledger: FakeLedger) -> (AppState, Arc<FakeLedger>) {
    let ledger = Arc::new(ledger);
    let state = AppState::new(
        ledger.clone(),
        ActivityCatalog::predefined(),
        SessionKeys::new(TEST_SECRET, Duration::from_secs(3600)),
    );
    (state, ledger)
}

/// `Authorization` header value for a fresh session of `identity`.
pub fn bearer(state: &AppState, identity: &Identity) -> String {
    let (token, _) = state.session_keys.issue(identity).unwrap();
    format!("Bearer {token}")
}
