// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Forwarding of resolved transfers to the ledger.
//!
//! [`relay`] makes exactly one ledger call and never fails: every outcome,
//! including transport errors, is folded into a [`TransferResult`].

use tracing::{info, warn};

use super::{RelayOutcome, TransferRequest, TransferResult};
use crate::{
    error::NETWORK_ERROR_MESSAGE,
    ledger::{LedgerClient, LedgerError},
};

pub const TRANSFER_FAILED_MESSAGE: &str = "Transfer failed";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
pub const TRANSFER_SUCCEEDED_MESSAGE: &str = "Transfer completed successfully";

/// Submit `request` to the ledger once and normalize the answer.
pub async fn relay(ledger: &dyn LedgerClient, request: &TransferRequest) -> TransferResult {
    match ledger.transfer(request).await {
        Ok(ack) => {
            let success = ack.success.unwrap_or(true);
            let message = ack
                .message
                .unwrap_or_else(|| TRANSFER_SUCCEEDED_MESSAGE.to_string());

            info!(
                amount = request.amount,
                transaction_type = request.transaction_type.map(|d| d.as_str()),
                success,
                "Ledger accepted transfer"
            );

            TransferResult {
                success,
                message,
                error: None,
                outcome: RelayOutcome::Accepted,
            }
        }
        Err(LedgerError::Rejected { status, message }) => {
            warn!(status, amount = request.amount, "Ledger rejected transfer");

            TransferResult {
                success: false,
                message: message
                    .clone()
                    .unwrap_or_else(|| TRANSFER_FAILED_MESSAGE.to_string()),
                error: Some(message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())),
                outcome: RelayOutcome::Rejected(status),
            }
        }
        Err(e) => {
            let timed_out = matches!(e, LedgerError::Timeout(_));
            warn!(error = %e, timed_out, "Ledger unreachable for transfer");

            TransferResult {
                success: false,
                message: NETWORK_ERROR_MESSAGE.to_string(),
                error: Some(e.to_string()),
                outcome: RelayOutcome::TransportFailure { timed_out },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::TransferAck, test_support::FakeLedger};

    fn request() -> TransferRequest {
        TransferRequest {
            sender_hash: "club_sada".to_string(),
            receiver_hash: "stu_hash_abc".to_string(),
            amount: 500,
            title: "Event participation reward".to_string(),
            transaction_type: None,
        }
    }

    #[tokio::test]
    async fn backend_answer_is_returned_unchanged() {
        let ledger = FakeLedger::answering(Ok(TransferAck {
            success: Some(true),
            message: Some("ok".to_string()),
        }));

        let result = relay(&ledger, &request()).await;
        assert!(result.success);
        assert_eq!(result.message, "ok");
        assert_eq!(result.error, None);
        assert_eq!(result.outcome, RelayOutcome::Accepted);
        assert_eq!(ledger.transfer_requests(), vec![request()]);
    }

    #[tokio::test]
    async fn empty_success_body_gets_defaults() {
        let ledger = FakeLedger::answering(Ok(TransferAck::default()));

        let result = relay(&ledger, &request()).await;
        assert!(result.success);
        assert_eq!(result.message, TRANSFER_SUCCEEDED_MESSAGE);
    }

    #[tokio::test]
    async fn explicit_failure_flag_is_kept() {
        let ledger = FakeLedger::answering(Ok(TransferAck {
            success: Some(false),
            message: Some("insufficient balance".to_string()),
        }));

        let result = relay(&ledger, &request()).await;
        assert!(!result.success);
        assert_eq!(result.message, "insufficient balance");
        assert_eq!(result.outcome, RelayOutcome::Accepted);
    }

    #[tokio::test]
    async fn rejection_carries_backend_message() {
        let ledger = FakeLedger::answering(Err(LedgerError::Rejected {
            status: 404,
            message: Some("user not found".to_string()),
        }));

        let result = relay(&ledger, &request()).await;
        assert!(!result.success);
        assert_eq!(result.message, "user not found");
        assert_eq!(result.error.as_deref(), Some("user not found"));
        assert_eq!(result.outcome, RelayOutcome::Rejected(404));
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallbacks() {
        let ledger = FakeLedger::answering(Err(LedgerError::Rejected {
            status: 500,
            message: None,
        }));

        let result = relay(&ledger, &request()).await;
        assert_eq!(result.message, TRANSFER_FAILED_MESSAGE);
        assert_eq!(result.error.as_deref(), Some(UNKNOWN_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn transport_failure_is_a_network_error() {
        let ledger = FakeLedger::answering(Err(LedgerError::Transport(
            "connection refused".to_string(),
        )));

        let result = relay(&ledger, &request()).await;
        assert!(!result.success);
        assert_eq!(result.message, NETWORK_ERROR_MESSAGE);
        assert!(result.error.unwrap().contains("connection refused"));
        assert_eq!(
            result.outcome,
            RelayOutcome::TransportFailure { timed_out: false }
        );
    }

    #[tokio::test]
    async fn timeout_is_flagged() {
        let ledger = FakeLedger::answering(Err(LedgerError::Timeout("10s".to_string())));

        let result = relay(&ledger, &request()).await;
        assert_eq!(result.message, NETWORK_ERROR_MESSAGE);
        assert_eq!(
            result.outcome,
            RelayOutcome::TransportFailure { timed_out: true }
        );
        assert_eq!(ledger.transfer_calls(), 1);
    }
}
