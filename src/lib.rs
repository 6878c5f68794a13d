// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus Coin Relay - Authenticated transfer relay for the campus coin ledger
//!
//! Students and clubs sign in here, and every coin transfer passes through
//! the same chain: authorize, validate, resolve direction, relay. The ledger
//! backend remains the only system of record.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Sessions and the authorization gate
//! - `catalog` - Predefined activity catalog
//! - `ledger` - Ledger backend client
//! - `transfer` - Validation, direction resolution and relay

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod state;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;
