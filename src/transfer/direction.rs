// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sender/receiver resolution.
//!
//! This is the only place that decides who pays whom.
//!
//! - With a direction tag, roles decide: for `club_to_student` the club
//!   party sends and the student party receives, whichever of them is the
//!   authenticated actor. `student_to_club` is the inverse.
//! - Without a direction tag (free-form transfer) the actor sends to the
//!   counterparty.
//!
//! [`check_debit`] then decides whether the actor may submit the resolved
//! route: only a club may move coins out of a wallet other than its own.

use crate::{auth::Role, catalog::Direction};

/// One side of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party<'a> {
    pub hash: &'a str,
    pub role: Role,
}

/// Resolved sender and receiver hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub sender_hash: String,
    pub receiver_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectionError {
    #[error(
        "a {direction} transfer needs one club and one student, got {actor_role} and {counterparty_role}"
    )]
    RoleMismatch {
        direction: Direction,
        actor_role: Role,
        counterparty_role: Role,
    },

    #[error("the signed-in wallet must be the sender or the receiver of the transfer")]
    NotAParty,

    #[error("only a club may charge another wallet")]
    CounterpartyDebit,
}

/// Compute sender and receiver for a transfer between `actor` (the
/// authenticated caller) and `counterparty`.
pub fn resolve_direction(
    direction: Option<Direction>,
    actor: Party<'_>,
    counterparty: Party<'_>,
) -> Result<Route, DirectionError> {
    let Some(direction) = direction else {
        return Ok(route(actor, counterparty));
    };

    let sender_role = direction.sender_role();
    let receiver_role = direction.receiver_role();

    if actor.role == sender_role && counterparty.role == receiver_role {
        Ok(route(actor, counterparty))
    } else if counterparty.role == sender_role && actor.role == receiver_role {
        Ok(route(counterparty, actor))
    } else {
        Err(DirectionError::RoleMismatch {
            direction,
            actor_role: actor.role,
            counterparty_role: counterparty.role,
        })
    }
}

/// Refuse a route that debits someone other than the actor, unless the
/// actor is a club.
pub fn check_debit(route: &Route, actor: Party<'_>) -> Result<(), DirectionError> {
    if route.sender_hash == actor.hash || actor.role == Role::Club {
        Ok(())
    } else {
        Err(DirectionError::CounterpartyDebit)
    }
}

/// Pick the counterparty hash out of a request's two hashes, given the
/// actor's own hash.
pub fn counterparty_hash<'a>(
    actor_hash: &str,
    sender_hash: &'a str,
    receiver_hash: &'a str,
) -> Result<&'a str, DirectionError> {
    if sender_hash == actor_hash {
        Ok(receiver_hash)
    } else if receiver_hash == actor_hash {
        Ok(sender_hash)
    } else {
        Err(DirectionError::NotAParty)
    }
}

fn route(sender: Party<'_>, receiver: Party<'_>) -> Route {
    Route {
        sender_hash: sender.hash.to_string(),
        receiver_hash: receiver.hash.to_string(),
    }
}
