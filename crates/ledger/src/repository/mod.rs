// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Repository: the chemist process's ledger of targets and flasks.
//!
//! Three independently arriving streams meet here — platform discovery,
//! flask telemetry, and the repo events the lifecycle engine produces —
//! and leave as one consistent per-target state machine plus an outbound
//! command stream that drives sharding.

mod apply;
mod platform;
mod queries;

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::metrics::MetricsSink;
use crate::ring::BoundedLog;
use crate::store::StateStore;
use chemist_core::{
    Clock, FlaskFault, LifecyclePolicy, PlatformEvent, RepoCommand, RepoEvent, TargetUri,
};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Concurrent, in-memory, event-driven state store for the collector fleet.
///
/// All mutation funnels through the handler methods; readers get owned
/// snapshots and never see a live reference into the cells. Mutating
/// handlers serialize on a writer gate so a whole event applies before the
/// next one starts; per-cell snapshots stay readable throughout.
pub struct Repository<C: Clock> {
    store: StateStore,
    platform_history: BoundedLog<PlatformEvent>,
    repo_history: BoundedLog<RepoEvent>,
    faults: BoundedLog<FlaskFault>,
    command_tx: mpsc::UnboundedSender<RepoCommand>,
    metrics: Arc<dyn MetricsSink>,
    clock: C,
    policy: LifecyclePolicy,
    write_gate: Mutex<()>,
}

impl<C: Clock> Repository<C> {
    /// Create a repository emitting commands on `command_tx`.
    pub fn new(
        config: LedgerConfig,
        metrics: Arc<dyn MetricsSink>,
        clock: C,
        command_tx: mpsc::UnboundedSender<RepoCommand>,
    ) -> Self {
        Self {
            store: StateStore::new(),
            platform_history: BoundedLog::new(config.platform_history),
            repo_history: BoundedLog::new(config.repo_history),
            faults: BoundedLog::new(config.fault_history),
            command_tx,
            metrics,
            clock,
            policy: config.lifecycle,
            write_gate: Mutex::new(()),
        }
    }

    /// The unbounded command pair; dropping the receiver closes the stream.
    pub fn command_channel() -> (mpsc::UnboundedSender<RepoCommand>, mpsc::UnboundedReceiver<RepoCommand>)
    {
        mpsc::unbounded_channel()
    }

    /// Record an out-of-band error reported against a flask.
    pub async fn error_sink(&self, fault: FlaskFault) {
        tracing::warn!(flask = %fault.flask, cause = %fault.cause, "flask fault recorded");
        self.faults.push(fault);
        self.metrics.fault_recorded();
    }

    /// Accept the metric keys discovered on a target.
    ///
    /// A reserved hook: the ledger does not act on keys yet, it only logs
    /// their arrival.
    pub async fn key_sink(&self, uri: &TargetUri, keys: BTreeSet<String>) {
        tracing::debug!(uri = %uri, keys = keys.len(), "metric keys received");
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// Enqueue an outbound command. The queue is unbounded, so this never
    /// blocks; it fails only when the consumer side is gone.
    pub(crate) fn enqueue(&self, command: RepoCommand) -> Result<(), LedgerError> {
        tracing::debug!(command = %command.log_summary(), "emitting repo command");
        self.command_tx.send(command).map_err(|_| LedgerError::CommandChannelClosed)
    }

    /// Serialize whole-event mutation; readers never take this lock.
    pub(crate) fn lock_writer(&self) -> parking_lot::MutexGuard<'_, ()> {
        self.write_gate.lock()
    }
}

#[cfg(test)]
mod test_helpers;




#[cfg(test)]
#[path = "scenario_tests.rs"]
mod scenario_tests;

#[cfg(test)]
#[path = "property_tests.rs"]
mod property_tests;
