// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer request validation.
//!
//! [`validate`] turns a [`RawTransferInput`] into a [`ValidatedTransfer`] or
//! the complete list of what is wrong with it. Rules are not
//! short-circuited, so a client can show every field error at once.
//!
//! Amounts are whole coins (`u64`). JSON numbers and numeric strings are
//! accepted; fractions, non-finite values and values above 2^53 are not.
//! A predefined activity fixes the amount: it may be omitted, and any other
//! value is refused.

use serde_json::Value;

use super::RawTransferInput;
use crate::{
    catalog::{ActivityCatalog, Direction},
    error::FieldError,
};

/// Largest integer a JSON number can carry without loss.
pub const MAX_AMOUNT: u64 = 9_007_199_254_740_991;

/// Title used for free-form transfers that name none.
pub const DEFAULT_TITLE: &str = "Coin transfer";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("sender and receiver must be different wallets")]
    SelfTransfer,

    #[error("amount must be a whole number of coins")]
    InvalidAmount,

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// Recoverable: the caller may resubmit as a free-form transfer.
    #[error("activity `{0}` does not exist")]
    UnknownActivity(String),

    #[error("activity `{0}` is no longer offered")]
    InactiveActivity(String),

    #[error("amount {supplied} does not match the activity price {expected}")]
    AmountMismatch { expected: u64, supplied: u64 },

    #[error("transaction_type `{0}` must be 'club_to_student' or 'student_to_club'")]
    InvalidTransactionType(String),

    #[error("transaction_type {supplied} contradicts the activity direction {activity}")]
    DirectionConflict {
        activity: Direction,
        supplied: Direction,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::SelfTransfer => "self_transfer",
            ValidationError::InvalidAmount => "invalid_amount",
            ValidationError::NonPositiveAmount => "non_positive_amount",
            ValidationError::UnknownActivity(_) => "unknown_activity",
            ValidationError::InactiveActivity(_) => "inactive_activity",
            ValidationError::AmountMismatch { .. } => "amount_mismatch",
            ValidationError::InvalidTransactionType(_) => "invalid_transaction_type",
            ValidationError::DirectionConflict { .. } => "direction_conflict",
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField(field) => Some(*field),
            ValidationError::SelfTransfer => Some("receiver_hash"),
            ValidationError::InvalidAmount
            | ValidationError::NonPositiveAmount
            | ValidationError::AmountMismatch { .. } => Some("amount"),
            ValidationError::UnknownActivity(_) | ValidationError::InactiveActivity(_) => {
                Some("activity_id")
            }
            ValidationError::InvalidTransactionType(_)
            | ValidationError::DirectionConflict { .. } => Some("transaction_type"),
        }
    }
}

impl From<&ValidationError> for FieldError {
    fn from(error: &ValidationError) -> Self {
        FieldError {
            code: error.code().to_string(),
            field: error.field().map(str::to_string),
            message: error.to_string(),
        }
    }
}

/// A structurally and semantically valid transfer, before direction is
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub sender_hash: String,
    pub receiver_hash: String,
    pub amount: u64,
    pub title: String,
    /// Direction tag from the activity or the supplied classification.
    pub direction: Option<Direction>,
    pub activity_id: Option<String>,
}

/// Validate a raw transfer, collecting every violation.
pub fn validate(
    raw: &RawTransferInput,
    catalog: &ActivityCatalog,
) -> Result<ValidatedTransfer, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let sender_hash = normalize_hash(raw.sender_hash.as_deref());
    let receiver_hash = normalize_hash(raw.receiver_hash.as_deref());

    if sender_hash.is_none() {
        errors.push(ValidationError::MissingField("sender_hash"));
    }
    if receiver_hash.is_none() {
        errors.push(ValidationError::MissingField("receiver_hash"));
    }
    if let (Some(sender), Some(receiver)) = (&sender_hash, &receiver_hash) {
        if sender == receiver {
            errors.push(ValidationError::SelfTransfer);
        }
    }

    let activity_id = raw
        .activity_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let activity = match activity_id.map(|id| (id, catalog.get_activity(id))) {
        Some((_, Ok(activity))) if activity.active => Some(activity),
        Some((id, Ok(_))) => {
            errors.push(ValidationError::InactiveActivity(id.to_string()));
            None
        }
        Some((id, Err(_))) => {
            errors.push(ValidationError::UnknownActivity(id.to_string()));
            None
        }
        None => None,
    };

    let amount = match (activity, raw.amount.as_ref()) {
        (Some(activity), None) => Ok(activity.amount),
        (Some(activity), supplied) => parse_amount(supplied).and_then(|amount| {
            if amount == activity.amount {
                Ok(amount)
            } else {
                Err(ValidationError::AmountMismatch {
                    expected: activity.amount,
                    supplied: amount,
                })
            }
        }),
        (None, supplied) => parse_amount(supplied),
    };
    let amount = match amount {
        Ok(amount) => Some(amount),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let supplied_direction = match raw
        .transaction_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        Some(raw_type) => match Direction::parse(raw_type) {
            Some(direction) => Some(direction),
            None => {
                errors.push(ValidationError::InvalidTransactionType(raw_type.to_string()));
                None
            }
        },
        None => None,
    };

    let direction = match (activity.map(|a| a.direction), supplied_direction) {
        (Some(activity), Some(supplied)) if activity != supplied => {
            errors.push(ValidationError::DirectionConflict { activity, supplied });
            None
        }
        (Some(activity), _) => Some(activity),
        (None, supplied) => supplied,
    };

    match (sender_hash, receiver_hash, amount) {
        (Some(sender_hash), Some(receiver_hash), Some(amount)) if errors.is_empty() => {
            let title = raw
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .or_else(|| activity.map(|a| a.title.to_string()))
                .unwrap_or_else(|| DEFAULT_TITLE.to_string());

            Ok(ValidatedTransfer {
                sender_hash,
                receiver_hash,
                amount,
                title,
                direction,
                activity_id: activity.map(|a| a.id.to_string()),
            })
        }
        _ => Err(errors),
    }
}

/// Trim a wallet hash; blank counts as absent.
pub fn normalize_hash(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

/// Parse a coin amount from a JSON number or numeric string.
pub fn parse_amount(raw: Option<&Value>) -> Result<u64, ValidationError> {
    let value = match raw {
        Some(Value::Number(n)) => {
            if let Some(whole) = n.as_u64() {
                return check_whole(whole);
            }
            if n.as_i64().is_some() {
                // Only negative integers fail as_u64 but pass as_i64
                return Err(ValidationError::NonPositiveAmount);
            }
            n.as_f64().ok_or(ValidationError::InvalidAmount)?
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::InvalidAmount);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidAmount)?
        }
        _ => return Err(ValidationError::InvalidAmount),
    };

    if !value.is_finite() {
        return Err(ValidationError::InvalidAmount);
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if value.fract() != 0.0 || value > MAX_AMOUNT as f64 {
        return Err(ValidationError::InvalidAmount);
    }

    check_whole(value as u64)
}

fn check_whole(amount: u64) -> Result<u64, ValidationError> {
    match amount {
        0 => Err(ValidationError::NonPositiveAmount),
        a if a > MAX_AMOUNT => Err(ValidationError::InvalidAmount),
        a => Ok(a),
    }
}
