// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The target lifecycle engine.
//!
//! A pure transition function: current state plus one input, out comes the
//! repo event to apply, or `None` when the combination is not a transition.
//! All mutation happens elsewhere; this module never touches the store.

use crate::event::RepoEvent;
use crate::flask::FlaskId;
use crate::state::{LifecycleMsg, StateChange, TargetState, Trigger};
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// Inputs fed into the lifecycle engine.
///
/// Platform events are translated into these by the handler; the engine
/// never sees raw platform events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleInput {
    /// Discovery reported the target.
    Discovery { target: Target, at_ms: u64 },
    /// Sharding handed the target to a flask.
    Assignment { target: Target, flask: FlaskId, at_ms: u64 },
    /// A flask confirmed it is scraping the target.
    Confirmation { target: Target, flask: FlaskId, at_ms: u64 },
    /// A flask stopped scraping the target.
    Unmonitoring { target: Target, flask: FlaskId, at_ms: u64 },
    /// A problem report opened (or continued) an investigation.
    Investigate { target: Target, at_ms: u64, attempt: u32 },
}

impl LifecycleInput {
    pub fn name(&self) -> &str {
        match self {
            LifecycleInput::Discovery { .. } => "discovery",
            LifecycleInput::Assignment { .. } => "assignment",
            LifecycleInput::Confirmation { .. } => "confirmation",
            LifecycleInput::Unmonitoring { .. } => "unmonitoring",
            LifecycleInput::Investigate { .. } => "investigate",
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            LifecycleInput::Discovery { target, .. }
            | LifecycleInput::Assignment { target, .. }
            | LifecycleInput::Confirmation { target, .. }
            | LifecycleInput::Unmonitoring { target, .. }
            | LifecycleInput::Investigate { target, .. } => target,
        }
    }

    fn into_msg(self) -> LifecycleMsg {
        match self {
            LifecycleInput::Discovery { target, at_ms } => {
                LifecycleMsg { target, flask: None, at_ms, trigger: Trigger::Discovery }
            }
            LifecycleInput::Assignment { target, flask, at_ms } => {
                LifecycleMsg { target, flask: Some(flask), at_ms, trigger: Trigger::Assignment }
            }
            LifecycleInput::Confirmation { target, flask, at_ms } => {
                LifecycleMsg { target, flask: Some(flask), at_ms, trigger: Trigger::Confirmation }
            }
            LifecycleInput::Unmonitoring { target, flask, at_ms } => {
                LifecycleMsg { target, flask: Some(flask), at_ms, trigger: Trigger::Unmonitoring }
            }
            LifecycleInput::Investigate { target, at_ms, .. } => {
                LifecycleMsg { target, flask: None, at_ms, trigger: Trigger::Investigation }
            }
        }
    }
}

/// Where a target lands when investigation exhausts its attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedTargetPolicy {
    /// Retire the target (`Fin`).
    #[default]
    Retire,
    /// Park it as unmonitorable for operator attention.
    Quarantine,
}

crate::simple_display! {
    ExhaustedTargetPolicy {
        Retire => "retire",
        Quarantine => "quarantine",
    }
}

/// Tunable constants of the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    /// Investigation attempts before the target is given up on.
    pub investigate_attempt_limit: u32,
    pub exhausted: ExhaustedTargetPolicy,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self { investigate_attempt_limit: 3, exhausted: ExhaustedTargetPolicy::Retire }
    }
}

impl LifecyclePolicy {
    fn exhausted_state(&self) -> TargetState {
        match self.exhausted {
            ExhaustedTargetPolicy::Retire => TargetState::Fin,
            ExhaustedTargetPolicy::Quarantine => TargetState::Unmonitorable,
        }
    }
}

/// Advance one target by one input.
///
/// `owner` is the flask recorded on the target's current state change, used
/// by the conflict rows (a second flask assigned or confirming). Unlisted
/// state/input combinations return `None`: no transition, no event.
pub fn step(
    current: TargetState,
    owner: Option<&FlaskId>,
    input: LifecycleInput,
    policy: &LifecyclePolicy,
) -> Option<RepoEvent> {
    use TargetState::*;

    let different_flask =
        |flask: &FlaskId| owner.is_some_and(|recorded| recorded != flask);

    let to = match (current, &input) {
        (Unknown, LifecycleInput::Discovery { .. }) => Unmonitored,
        (Unmonitored, LifecycleInput::Assignment { .. }) => Assigned,
        (Assigned, LifecycleInput::Assignment { flask, .. }) if different_flask(flask) => {
            DoubleAssigned
        }
        (Assigned, LifecycleInput::Confirmation { .. }) => Monitored,
        (Monitored, LifecycleInput::Confirmation { flask, .. }) if different_flask(flask) => {
            DoubleMonitored
        }
        (Monitored, LifecycleInput::Unmonitoring { .. }) => Unmonitored,
        (Investigating, LifecycleInput::Confirmation { .. }) => Monitored,
        (Investigating, LifecycleInput::Investigate { attempt, .. })
            if *attempt >= policy.investigate_attempt_limit =>
        {
            policy.exhausted_state()
        }
        // Tie-break: the confirming flask keeps the target.
        (DoubleAssigned, LifecycleInput::Confirmation { .. }) => Monitored,
        (state, LifecycleInput::Investigate { .. }) if !state.is_fin() => Investigating,
        _ => return None,
    };

    Some(RepoEvent::StateChange(StateChange { from: current, to, msg: input.into_msg() }))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
