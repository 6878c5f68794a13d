// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{auth::SessionKeys, catalog::ActivityCatalog, ledger::LedgerClient};

/// Shared, immutable handles for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerClient>,
    pub catalog: Arc<ActivityCatalog>,
    pub session_keys: SessionKeys,
}

impl AppState {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        catalog: ActivityCatalog,
        session_keys: SessionKeys,
    ) -> Self {
        Self {
            ledger,
            catalog: Arc::new(catalog),
            session_keys,
        }
    }
}
