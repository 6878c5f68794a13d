// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Sessions, identities and the authorization gate.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{ id, password }` to `/v1/auth/login`
//! 2. The credentials are checked by the ledger's `POST /login`, which
//!    returns the account record `{ id, name, hash, type }`
//! 3. The service signs a session token carrying that identity
//! 4. Later requests send `Authorization: Bearer <token>`; the token is
//!    verified and the gate re-checks expiry and role on every call
//!
//! ## Security
//!
//! - Tokens are HS256-signed with `SESSION_SECRET`
//! - Expiry is enforced both at verification and by the gate
//! - The wallet `hash` travels inside the signed token, so a caller cannot
//!   act as another wallet

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod roles;
pub mod session;

pub use claims::{Identity, Session, SessionClaims};
pub use error::AuthError;
pub use extractor::{Auth, ClubOnly, CurrentSession};
pub use gate::{authorize, authorize_at};
pub use roles::Role;
pub use session::SessionKeys;
