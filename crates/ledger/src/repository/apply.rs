// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repo-event processing: apply the lifecycle engine's output to the
//! state cells, refresh gauges, and emit outbound commands.

use super::Repository;
use crate::error::LedgerError;
use chemist_core::{Clock, RepoCommand, RepoEvent, TargetState};

impl<C: Clock> Repository<C> {
    pub(crate) fn process_repo_event(&self, event: RepoEvent) -> Result<(), LedgerError> {
        self.repo_history.push(event.clone());
        tracing::info!(event = %event.log_summary(), "applying repo event");

        match event {
            RepoEvent::StateChange(sc) => {
                self.store.record(&sc);
                self.refresh_gauges();

                match sc.to {
                    // A target back in the pool needs a flask.
                    TargetState::Unmonitored => {
                        self.enqueue(RepoCommand::Monitor { target: sc.msg.target })?;
                    }
                    // TODO: upstream has not decided what sharding should do
                    // about double-assignment conflicts; emit nothing until
                    // a policy lands here.
                    TargetState::DoubleAssigned | TargetState::DoubleMonitored => {}
                    _ => {}
                }
                Ok(())
            }

            RepoEvent::NewFlask(flask) => {
                self.store.upsert_flask(flask);
                Ok(())
            }
        }
    }

    /// Push every bucket's occupancy to the metrics sink.
    pub(crate) fn refresh_gauges(&self) {
        for (state, count) in self.store.bucket_counts() {
            self.metrics.state_gauge(state, count);
        }
    }
}
