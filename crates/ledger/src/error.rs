// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger error types.

use chemist_core::FlaskId;
use thiserror::Error;

/// Errors surfaced by the query surface or raised inside event dispatch.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A query named a flask the registry does not know.
    #[error("flask not registered: {0}")]
    InstanceNotFound(FlaskId),

    /// The outbound command stream has no consumer anymore.
    #[error("command stream closed")]
    CommandChannelClosed,
}
