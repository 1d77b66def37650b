// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform-event dispatch.
//!
//! Sole ingest entry for discovery and flask telemetry. Events from a
//! potentially-unreliable upstream must never fail the caller: dispatch
//! errors are logged, counted, and swallowed.

use super::Repository;
use crate::error::LedgerError;
use chemist_core::{
    step, Clock, FlaskId, LifecycleInput, PlatformEvent, RepoCommand, RepoEvent, TargetUri,
};

impl<C: Clock> Repository<C> {
    /// Apply one platform event to the ledger.
    ///
    /// The event lands in the audit history whether or not it changes any
    /// state.
    pub async fn platform_handler(&self, event: PlatformEvent) {
        tracing::debug!(event = %event.log_summary(), "platform event received");
        self.platform_history.push(event.clone());

        let name = event.name().to_string();
        let _gate = self.lock_writer();
        if let Err(e) = self.dispatch(event) {
            tracing::error!(error = %e, event = %name, "platform event handling failed");
            self.metrics.platform_event_failure();
        }
    }

    fn dispatch(&self, event: PlatformEvent) -> Result<(), LedgerError> {
        match event {
            PlatformEvent::NewTarget { target, .. } => {
                self.run_lifecycle(LifecycleInput::Discovery { target, at_ms: self.now_ms() })
            }

            PlatformEvent::NewFlask { flask, .. } => {
                self.process_repo_event(RepoEvent::NewFlask(flask.clone()))?;
                self.enqueue(RepoCommand::Telemetry { flask })
            }

            PlatformEvent::TerminatedFlask { flask, .. } => {
                // The flask stays in the registry and keeps its distribution
                // entry; reassignment events retire them later.
                self.enqueue(RepoCommand::ReassignWork { flask })
            }

            PlatformEvent::TerminatedTarget { uri, .. } => {
                if self.store.remove_target(&uri) {
                    self.refresh_gauges();
                    tracing::info!(uri = %uri, "target removed from ledger");
                }
                Ok(())
            }

            PlatformEvent::Monitored { flask, uri, .. } => match self.store.target(&uri) {
                Some(target) => self.run_lifecycle(LifecycleInput::Confirmation {
                    target,
                    flask,
                    at_ms: self.now_ms(),
                }),
                None => {
                    self.drop_unknown_target("target:monitored", &uri, &flask);
                    Ok(())
                }
            },

            PlatformEvent::Unmonitored { flask, uri, .. } => match self.store.target(&uri) {
                Some(target) => self.run_lifecycle(LifecycleInput::Unmonitoring {
                    target,
                    flask,
                    at_ms: self.now_ms(),
                }),
                None => {
                    self.drop_unknown_target("target:unmonitored", &uri, &flask);
                    Ok(())
                }
            },

            PlatformEvent::Problem { flask, uri, msg, .. } => match self.store.target(&uri) {
                Some(target) => {
                    tracing::warn!(uri = %uri, flask = %flask, msg = %msg, "problem reported");
                    self.run_lifecycle(LifecycleInput::Investigate {
                        target,
                        at_ms: self.now_ms(),
                        attempt: 0,
                    })
                }
                None => {
                    self.drop_unknown_target("target:problem", &uri, &flask);
                    Ok(())
                }
            },

            PlatformEvent::Assigned { flask, target, .. } => self.run_lifecycle(
                LifecycleInput::Assignment { target, flask, at_ms: self.now_ms() },
            ),

            PlatformEvent::NoOp { .. } | PlatformEvent::Custom => Ok(()),
        }
    }

    /// Feed one input through the lifecycle engine and apply the result.
    fn run_lifecycle(&self, input: LifecycleInput) -> Result<(), LedgerError> {
        let uri = input.target().uri.clone();
        let current = self.store.state_change(&uri);
        let state = current.as_ref().map(|sc| sc.to).unwrap_or_default();
        let owner = current.as_ref().and_then(|sc| sc.msg.flask.as_ref());

        match step(state, owner, input.clone(), &self.policy) {
            Some(event) => self.process_repo_event(event),
            None => {
                tracing::debug!(
                    uri = %uri,
                    state = %state,
                    input = input.name(),
                    "no lifecycle transition"
                );
                Ok(())
            }
        }
    }

    fn drop_unknown_target(&self, event: &str, uri: &TargetUri, flask: &FlaskId) {
        tracing::error!(uri = %uri, flask = %flask, event, "telemetry for unknown target dropped");
        self.metrics.unknown_target_event();
    }
}
