// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for the chemist ledger.
//!
//! Platform events serialize with `{"type": "noun:verb", ...fields}` format.
//! Unknown type tags deserialize to `Custom`.

use crate::flask::{Flask, FlaskId};
use crate::state::StateChange;
use crate::target::{Target, TargetUri};
use serde::{Deserialize, Serialize};

/// Discovery and telemetry events arriving from the platform side.
///
/// Every variant carries `at_ms`, the producer's wall-clock time; the audit
/// history is sorted by it on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlatformEvent {
    /// Discovery found a target to monitor.
    #[serde(rename = "target:new")]
    NewTarget { target: Target, at_ms: u64 },

    /// A collector worker joined the fleet.
    #[serde(rename = "flask:new")]
    NewFlask { flask: Flask, at_ms: u64 },

    /// A collector worker disappeared; its work needs a new home.
    #[serde(rename = "flask:terminated")]
    TerminatedFlask { flask: FlaskId, at_ms: u64 },

    /// The monitored process went away.
    #[serde(rename = "target:terminated")]
    TerminatedTarget { uri: TargetUri, at_ms: u64 },

    /// Flask telemetry: scraping this target is up and running.
    #[serde(rename = "target:monitored")]
    Monitored { flask: FlaskId, uri: TargetUri, at_ms: u64 },

    /// Flask telemetry: the flask stopped scraping this target.
    #[serde(rename = "target:unmonitored")]
    Unmonitored { flask: FlaskId, uri: TargetUri, at_ms: u64 },

    /// Flask telemetry: scraping this target is failing.
    #[serde(rename = "target:problem")]
    Problem { flask: FlaskId, uri: TargetUri, msg: String, at_ms: u64 },

    /// Sharding picked a flask for a target.
    #[serde(rename = "target:assigned")]
    Assigned { flask: FlaskId, target: Target, at_ms: u64 },

    #[serde(rename = "noop")]
    NoOp { at_ms: u64 },

    /// Catch-all for unknown event types (extensibility).
    #[serde(other, skip_serializing)]
    Custom,
}

impl PlatformEvent {
    pub fn name(&self) -> &str {
        match self {
            PlatformEvent::NewTarget { .. } => "target:new",
            PlatformEvent::NewFlask { .. } => "flask:new",
            PlatformEvent::TerminatedFlask { .. } => "flask:terminated",
            PlatformEvent::TerminatedTarget { .. } => "target:terminated",
            PlatformEvent::Monitored { .. } => "target:monitored",
            PlatformEvent::Unmonitored { .. } => "target:unmonitored",
            PlatformEvent::Problem { .. } => "target:problem",
            PlatformEvent::Assigned { .. } => "target:assigned",
            PlatformEvent::NoOp { .. } => "noop",
            PlatformEvent::Custom => "custom",
        }
    }

    /// Producer wall-clock time of the event. `Custom` events carry none.
    pub fn at_ms(&self) -> u64 {
        match self {
            PlatformEvent::NewTarget { at_ms, .. }
            | PlatformEvent::NewFlask { at_ms, .. }
            | PlatformEvent::TerminatedFlask { at_ms, .. }
            | PlatformEvent::TerminatedTarget { at_ms, .. }
            | PlatformEvent::Monitored { at_ms, .. }
            | PlatformEvent::Unmonitored { at_ms, .. }
            | PlatformEvent::Problem { at_ms, .. }
            | PlatformEvent::Assigned { at_ms, .. }
            | PlatformEvent::NoOp { at_ms } => *at_ms,
            PlatformEvent::Custom => 0,
        }
    }

    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            PlatformEvent::NewTarget { target, .. } => format!("{t} uri={}", target.uri),
            PlatformEvent::NewFlask { flask, .. } => {
                format!("{t} flask={} addr={}", flask.id, flask.address)
            }
            PlatformEvent::TerminatedFlask { flask, .. } => format!("{t} flask={flask}"),
            PlatformEvent::TerminatedTarget { uri, .. } => format!("{t} uri={uri}"),
            PlatformEvent::Monitored { flask, uri, .. }
            | PlatformEvent::Unmonitored { flask, uri, .. } => {
                format!("{t} flask={flask} uri={uri}")
            }
            PlatformEvent::Problem { flask, uri, msg, .. } => {
                format!("{t} flask={flask} uri={uri} msg={msg}")
            }
            PlatformEvent::Assigned { flask, target, .. } => {
                format!("{t} flask={flask} uri={}", target.uri)
            }
            PlatformEvent::NoOp { .. } | PlatformEvent::Custom => t.to_string(),
        }
    }
}

/// Output of the lifecycle engine, applied to the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RepoEvent {
    #[serde(rename = "state:change")]
    StateChange(StateChange),

    #[serde(rename = "flask:new")]
    NewFlask(Flask),
}

impl RepoEvent {
    pub fn name(&self) -> &str {
        match self {
            RepoEvent::StateChange(_) => "state:change",
            RepoEvent::NewFlask(_) => "flask:new",
        }
    }

    pub fn log_summary(&self) -> String {
        match self {
            RepoEvent::StateChange(sc) => {
                format!("state:change uri={} {} -> {}", sc.uri(), sc.from, sc.to)
            }
            RepoEvent::NewFlask(flask) => format!("flask:new flask={}", flask.id),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
