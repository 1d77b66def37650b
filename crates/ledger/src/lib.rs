// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chemist-ledger: the Repository of the chemist control plane.
//!
//! Tracks which targets exist, which flask owns which target, and what
//! lifecycle state each target is in; emits the commands that drive
//! sharding. Discovery and telemetry enter through
//! [`Repository::platform_handler`]; sharding consumes the
//! [`RepoCommand`](chemist_core::RepoCommand) stream.

pub mod cell;
pub mod config;
pub mod error;
pub mod metrics;
pub mod repository;
pub mod ring;
pub mod store;

pub use config::LedgerConfig;
pub use error::LedgerError;
#[cfg(any(test, feature = "test-support"))]
pub use metrics::RecordingMetrics;
pub use metrics::{MetricsSink, NoopMetrics};
pub use repository::Repository;
pub use ring::BoundedLog;
pub use store::{Distribution, StateStore};
