// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only audit surface and the two distribution merge paths.
//!
//! Everything returns owned snapshots; callers never hold a reference
//! into the cells.

use super::Repository;
use crate::error::LedgerError;
use crate::store::Distribution;
use chemist_core::{
    Clock, Flask, FlaskFault, FlaskId, LifecycleMsg, PlatformEvent, RepoEvent, StateChange,
    Target, TargetState, TargetUri, Trigger,
};
use std::collections::{BTreeSet, HashMap};

impl<C: Clock> Repository<C> {
    /// Every state bucket and its occupants.
    pub fn states(&self) -> HashMap<TargetState, HashMap<TargetUri, StateChange>> {
        self.store.buckets()
    }

    /// Platform-event history, sorted by producer time ascending.
    ///
    /// Pushes from concurrent producers land in the buffer unordered; the
    /// sort makes wall-clock ordering observable regardless.
    pub fn historical_platform_events(&self) -> Vec<PlatformEvent> {
        let mut events = self.platform_history.in_order();
        events.sort_by_key(PlatformEvent::at_ms);
        events
    }

    /// Repo-event history in insertion order.
    pub fn historical_repo_events(&self) -> Vec<RepoEvent> {
        self.repo_history.in_order()
    }

    /// Recorded flask faults in insertion order.
    pub fn faults(&self) -> Vec<FlaskFault> {
        self.faults.in_order()
    }

    /// The target behind a URI, if tracked.
    pub fn instance(&self, uri: &TargetUri) -> Option<Target> {
        self.store.target(uri)
    }

    pub fn flask(&self, id: &FlaskId) -> Option<Flask> {
        self.store.flask(id)
    }

    /// Every registered flask.
    pub fn flasks(&self) -> Vec<Flask> {
        self.store.flasks()
    }

    /// Lifecycle state of a URI; unseen URIs are `Unknown`.
    pub fn target_state(&self, uri: &TargetUri) -> TargetState {
        self.store.target_state(uri)
    }

    pub fn distribution(&self) -> Distribution {
        self.store.distribution()
    }

    /// Assignment set of a flask.
    pub fn assigned_targets(&self, id: &FlaskId) -> Result<BTreeSet<Target>, LedgerError> {
        self.store
            .assigned_targets(id)
            .ok_or_else(|| LedgerError::InstanceNotFound(id.clone()))
    }

    /// Targets waiting for a flask: the `Unmonitored` bucket's contents.
    pub fn unassigned_targets(&self) -> BTreeSet<Target> {
        self.store
            .bucket(TargetState::Unmonitored)
            .into_values()
            .map(|sc| sc.msg.target)
            .collect()
    }

    /// URIs investigation has given up on.
    pub fn unmonitorable_targets(&self) -> Vec<TargetUri> {
        let mut uris: Vec<TargetUri> =
            self.store.bucket(TargetState::Unmonitorable).into_keys().collect();
        uris.sort();
        uris
    }

    /// Union a distribution into the ledger's, per flask. Returns the
    /// merged distribution.
    pub fn merge_distribution(&self, incoming: Distribution) -> Distribution {
        let _gate = self.lock_writer();
        self.store.merge_distribution(incoming)
    }

    /// Bootstrap path: learn a pre-existing assignment at startup.
    ///
    /// Each target is written straight into the indices as already
    /// monitored by its flask — the lifecycle engine is bypassed and no
    /// commands are emitted — then the distribution is merged in.
    pub fn merge_existing_distribution(&self, incoming: Distribution) -> Distribution {
        let _gate = self.lock_writer();
        let at_ms = self.now_ms();

        for (flask, targets) in &incoming {
            for target in targets {
                self.store.record(&StateChange {
                    from: TargetState::Unknown,
                    to: TargetState::Monitored,
                    msg: LifecycleMsg {
                        target: target.clone(),
                        flask: Some(flask.clone()),
                        at_ms,
                        trigger: Trigger::Confirmation,
                    },
                });
            }
        }
        self.refresh_gauges();

        self.store.merge_distribution(incoming)
    }
}
