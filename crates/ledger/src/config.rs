// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository configuration.

use chemist_core::LifecyclePolicy;
use serde::{Deserialize, Serialize};

/// Capacities of the audit logs and the lifecycle policy constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Platform-event history capacity.
    pub platform_history: usize,
    /// Repo-event history capacity.
    pub repo_history: usize,
    /// Flask-fault log capacity.
    pub fault_history: usize,
    pub lifecycle: LifecyclePolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            platform_history: 2000,
            repo_history: 2000,
            fault_history: 500,
            lifecycle: LifecyclePolicy::default(),
        }
    }
}

impl LedgerConfig {
    chemist_core::setters! {
        set {
            platform_history: usize,
            repo_history: usize,
            fault_history: usize,
            lifecycle: LifecyclePolicy,
        }
    }
}
