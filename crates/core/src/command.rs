// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound commands driving the sharding component.

use crate::flask::{Flask, FlaskId};
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// Directives the ledger emits for sharding to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RepoCommand {
    /// Pick a flask for this target and answer with an `Assigned` event.
    #[serde(rename = "monitor")]
    Monitor { target: Target },

    /// Open a telemetry receive channel to this flask.
    #[serde(rename = "telemetry")]
    Telemetry { flask: Flask },

    /// Redistribute the targets previously owned by this flask.
    #[serde(rename = "reassign_work")]
    ReassignWork { flask: FlaskId },
}

impl RepoCommand {
    pub fn name(&self) -> &str {
        match self {
            RepoCommand::Monitor { .. } => "monitor",
            RepoCommand::Telemetry { .. } => "telemetry",
            RepoCommand::ReassignWork { .. } => "reassign_work",
        }
    }

    pub fn log_summary(&self) -> String {
        match self {
            RepoCommand::Monitor { target } => format!("monitor uri={}", target.uri),
            RepoCommand::Telemetry { flask } => format!("telemetry flask={}", flask.id),
            RepoCommand::ReassignWork { flask } => format!("reassign_work flask={flask}"),
        }
    }
}
