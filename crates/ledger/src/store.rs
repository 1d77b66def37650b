// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four state cells of the ledger.
//!
//! All mutators are idempotent: applying the same change twice must leave
//! the store as applying it once. The bucket index is driven off the target
//! index, so a target occupies exactly the bucket its latest state change
//! names no matter what sequence of changes arrived.

use crate::cell::Cell;
use chemist_core::{Flask, FlaskId, StateChange, Target, TargetState, TargetUri};
use std::collections::{BTreeSet, HashMap};

/// Per-flask assignment sets, as sharding last reported them.
pub type Distribution = HashMap<FlaskId, BTreeSet<Target>>;

/// The ledger's mutable state: target index, per-state buckets, flask
/// distribution, and the known-flask registry.
pub struct StateStore {
    targets: Cell<HashMap<TargetUri, StateChange>>,
    buckets: Cell<HashMap<TargetState, HashMap<TargetUri, StateChange>>>,
    distribution: Cell<Distribution>,
    flasks: Cell<HashMap<FlaskId, Flask>>,
}

impl StateStore {
    pub fn new() -> Self {
        // Pre-seed every bucket so per-state gauges always read, even at zero.
        let buckets =
            TargetState::ALL.iter().map(|s| (*s, HashMap::new())).collect::<HashMap<_, _>>();
        Self {
            targets: Cell::default(),
            buckets: Cell::new(buckets),
            distribution: Cell::default(),
            flasks: Cell::default(),
        }
    }

    /// Record a state change: upsert the target index and move the URI into
    /// the bucket the change names.
    ///
    /// The URI is removed from the bucket the *index* last placed it in, so
    /// a change whose `from` disagrees with the index cannot leave the URI
    /// in two buckets.
    pub fn record(&self, sc: &StateChange) {
        let uri = sc.uri().clone();
        let prev = self.targets.update(|t| t.insert(uri.clone(), sc.clone()));
        self.buckets.update(|buckets| {
            if let Some(prev) = prev {
                if let Some(bucket) = buckets.get_mut(&prev.to) {
                    bucket.remove(&uri);
                }
            }
            buckets.entry(sc.to).or_default().insert(uri, sc.clone());
        });
    }

    /// Delete a target from the index and its bucket. Returns whether it
    /// was present; deleting an absent target is a no-op.
    pub fn remove_target(&self, uri: &TargetUri) -> bool {
        let prev = self.targets.update(|t| t.remove(uri));
        match prev {
            Some(prev) => {
                self.buckets.update(|buckets| {
                    if let Some(bucket) = buckets.get_mut(&prev.to) {
                        bucket.remove(uri);
                    }
                });
                true
            }
            None => false,
        }
    }

    /// Register a flask, giving it an empty distribution entry if it has
    /// none yet.
    pub fn upsert_flask(&self, flask: Flask) {
        let id = flask.id.clone();
        self.flasks.update(|flasks| flasks.insert(id.clone(), flask));
        self.distribution.update(|d| {
            d.entry(id).or_default();
        });
    }

    /// Union `incoming` into the distribution, per flask. Returns the
    /// merged distribution.
    pub fn merge_distribution(&self, incoming: Distribution) -> Distribution {
        self.distribution.update(|d| {
            for (flask, targets) in incoming {
                d.entry(flask).or_default().extend(targets);
            }
            d.clone()
        })
    }

    /// Current lifecycle state of a URI; URIs the ledger has never seen
    /// are `Unknown`.
    pub fn target_state(&self, uri: &TargetUri) -> TargetState {
        self.targets.read(|t| t.get(uri).map(|sc| sc.to).unwrap_or_default())
    }

    /// Latest state change recorded for a URI.
    pub fn state_change(&self, uri: &TargetUri) -> Option<StateChange> {
        self.targets.read(|t| t.get(uri).cloned())
    }

    pub fn target(&self, uri: &TargetUri) -> Option<Target> {
        self.targets.read(|t| t.get(uri).map(|sc| sc.msg.target.clone()))
    }

    pub fn flask(&self, id: &FlaskId) -> Option<Flask> {
        self.flasks.read(|f| f.get(id).cloned())
    }

    pub fn flasks(&self) -> Vec<Flask> {
        self.flasks.read(|f| f.values().cloned().collect())
    }

    pub fn targets(&self) -> HashMap<TargetUri, StateChange> {
        self.targets.snapshot()
    }

    pub fn buckets(&self) -> HashMap<TargetState, HashMap<TargetUri, StateChange>> {
        self.buckets.snapshot()
    }

    /// One bucket's contents (empty for states with no occupants).
    pub fn bucket(&self, state: TargetState) -> HashMap<TargetUri, StateChange> {
        self.buckets.read(|b| b.get(&state).cloned().unwrap_or_default())
    }

    /// Occupancy of every bucket, for gauge refresh.
    pub fn bucket_counts(&self) -> Vec<(TargetState, usize)> {
        self.buckets.read(|b| {
            TargetState::ALL
                .iter()
                .map(|s| (*s, b.get(s).map(HashMap::len).unwrap_or(0)))
                .collect()
        })
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution.snapshot()
    }

    /// Assignment set of one flask; `None` when the flask is unregistered.
    pub fn assigned_targets(&self, id: &FlaskId) -> Option<BTreeSet<Target>> {
        if !self.flasks.read(|f| f.contains_key(id)) {
            return None;
        }
        Some(self.distribution.read(|d| d.get(id).cloned().unwrap_or_default()))
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
