// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observability sink injected into the Repository.
//!
//! The Repository reports per-state occupancy gauges and a handful of
//! counters through this trait; wiring them to an exporter is the
//! embedding service's concern.

use chemist_core::TargetState;

/// Receiver for the ledger's gauges and counters.
pub trait MetricsSink: Send + Sync {
    /// Number of targets currently in `state`. Refreshed after every
    /// applied repo event.
    fn state_gauge(&self, state: TargetState, count: usize);

    /// A platform event blew up inside the handler and was swallowed.
    fn platform_event_failure(&self);

    /// Telemetry arrived for a URI the ledger does not track.
    fn unknown_target_event(&self);

    /// An out-of-band flask fault was recorded.
    fn fault_recorded(&self);
}

/// Sink that drops everything. The default for embeddings without an
/// exporter.
#[derive(Debug, Clone, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn state_gauge(&self, _state: TargetState, _count: usize) {}
    fn platform_event_failure(&self) {}
    fn unknown_target_event(&self) {}
    fn fault_recorded(&self) {}
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingMetrics;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::MetricsSink;
    use chemist_core::TargetState;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Sink that remembers what it saw, for assertions.
    #[derive(Default)]
    pub struct RecordingMetrics {
        gauges: Mutex<HashMap<TargetState, usize>>,
        platform_event_failures: AtomicU64,
        unknown_target_events: AtomicU64,
        faults: AtomicU64,
    }

    impl RecordingMetrics {
        pub fn new() -> Self {
            Self::default()
        }

        /// Last reported gauge value for a state (zero if never reported).
        pub fn gauge(&self, state: TargetState) -> usize {
            self.gauges.lock().get(&state).copied().unwrap_or(0)
        }

        pub fn platform_event_failures(&self) -> u64 {
            self.platform_event_failures.load(Ordering::Relaxed)
        }

        pub fn unknown_target_events(&self) -> u64 {
            self.unknown_target_events.load(Ordering::Relaxed)
        }

        pub fn faults(&self) -> u64 {
            self.faults.load(Ordering::Relaxed)
        }
    }

    impl MetricsSink for RecordingMetrics {
        fn state_gauge(&self, state: TargetState, count: usize) {
            self.gauges.lock().insert(state, count);
        }

        fn platform_event_failure(&self) {
            self.platform_event_failures.fetch_add(1, Ordering::Relaxed);
        }

        fn unknown_target_event(&self) {
            self.unknown_target_events.fetch_add(1, Ordering::Relaxed);
        }

        fn fault_recorded(&self) {
            self.faults.fetch_add(1, Ordering::Relaxed);
        }
    }
}
