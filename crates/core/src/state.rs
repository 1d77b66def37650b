// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target lifecycle state and the state-change record.

use crate::flask::FlaskId;
use crate::target::{Target, TargetUri};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// Not tracked by the ledger (the default for unseen URIs).
    #[default]
    Unknown,
    /// Tracked, waiting for a flask assignment.
    Unmonitored,
    /// A flask was told to scrape it; confirmation pending.
    Assigned,
    /// A flask confirmed it is scraping.
    Monitored,
    /// A flask reported trouble scraping it.
    Problematic,
    /// Two flasks were told to scrape the same target.
    DoubleAssigned,
    /// Two flasks confirmed scraping the same target.
    DoubleMonitored,
    /// Under investigation after a reported problem.
    Investigating,
    /// Investigation gave up; parked until an operator intervenes.
    Unmonitorable,
    /// Retired; no further transitions.
    Fin,
}

impl TargetState {
    /// Every lifecycle state, in declaration order.
    pub const ALL: [TargetState; 10] = [
        TargetState::Unknown,
        TargetState::Unmonitored,
        TargetState::Assigned,
        TargetState::Monitored,
        TargetState::Problematic,
        TargetState::DoubleAssigned,
        TargetState::DoubleMonitored,
        TargetState::Investigating,
        TargetState::Unmonitorable,
        TargetState::Fin,
    ];

    /// Whether this state is terminal (no further transitions expected).
    pub fn is_fin(&self) -> bool {
        matches!(self, TargetState::Fin)
    }
}

crate::simple_display! {
    TargetState {
        Unknown => "unknown",
        Unmonitored => "unmonitored",
        Assigned => "assigned",
        Monitored => "monitored",
        Problematic => "problematic",
        DoubleAssigned => "double_assigned",
        DoubleMonitored => "double_monitored",
        Investigating => "investigating",
        Unmonitorable => "unmonitorable",
        Fin => "fin",
    }
}

/// What produced a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Discovery,
    Assignment,
    Confirmation,
    Unmonitoring,
    Investigation,
}

crate::simple_display! {
    Trigger {
        Discovery => "discovery",
        Assignment => "assignment",
        Confirmation => "confirmation",
        Unmonitoring => "unmonitoring",
        Investigation => "investigation",
    }
}

/// Payload of a state change: the target it concerns, the flask involved
/// (when one was), and when it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleMsg {
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flask: Option<FlaskId>,
    /// Epoch milliseconds when the triggering input arrived.
    pub at_ms: u64,
    pub trigger: Trigger,
}

/// A recorded lifecycle transition for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub from: TargetState,
    pub to: TargetState,
    pub msg: LifecycleMsg,
}

impl StateChange {
    /// URI of the target this change concerns.
    pub fn uri(&self) -> &TargetUri {
        &self.msg.target.uri
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
