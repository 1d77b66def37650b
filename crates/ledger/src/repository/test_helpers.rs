// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the repository.

use crate::config::LedgerConfig;
use crate::metrics::{MetricsSink, RecordingMetrics};
use crate::repository::Repository;
use chemist_core::{Clock, FakeClock, Flask, PlatformEvent, RepoCommand, Target};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Repository wired to a fake clock, recording metrics, and a drainable
/// command receiver.
pub(crate) struct TestContext {
    pub repo: Repository<FakeClock>,
    pub clock: FakeClock,
    pub metrics: Arc<RecordingMetrics>,
    pub command_rx: mpsc::UnboundedReceiver<RepoCommand>,
}

pub(crate) fn setup() -> TestContext {
    setup_with_config(LedgerConfig::default())
}

pub(crate) fn setup_with_config(config: LedgerConfig) -> TestContext {
    let (command_tx, command_rx) = Repository::<FakeClock>::command_channel();
    let metrics = Arc::new(RecordingMetrics::new());
    let clock = FakeClock::new();
    let repo = Repository::new(
        config,
        Arc::clone(&metrics) as Arc<dyn MetricsSink>,
        clock.clone(),
        command_tx,
    );
    TestContext { repo, clock, metrics, command_rx }
}

impl TestContext {
    /// Pop every command currently queued.
    pub(crate) fn drain_commands(&mut self) -> Vec<RepoCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = self.command_rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    /// Advance the clock one tick and stamp an event with the new time.
    fn tick(&self) -> u64 {
        self.clock.advance_ms(1);
        self.clock.epoch_ms()
    }

    pub(crate) async fn discover(&self, uri: &str) {
        let at_ms = self.tick();
        self.repo
            .platform_handler(PlatformEvent::NewTarget { target: Target::new(uri), at_ms })
            .await;
    }

    pub(crate) async fn register_flask(&self, id: &str) {
        let at_ms = self.tick();
        self.repo
            .platform_handler(PlatformEvent::NewFlask {
                flask: Flask::new(id, format!("{id}.flasks.internal:9091")),
                at_ms,
            })
            .await;
    }

    pub(crate) async fn assign(&self, flask: &str, uri: &str) {
        let at_ms = self.tick();
        self.repo
            .platform_handler(PlatformEvent::Assigned {
                flask: flask.into(),
                target: Target::new(uri),
                at_ms,
            })
            .await;
    }

    pub(crate) async fn confirm(&self, flask: &str, uri: &str) {
        let at_ms = self.tick();
        self.repo
            .platform_handler(PlatformEvent::Monitored {
                flask: flask.into(),
                uri: uri.into(),
                at_ms,
            })
            .await;
    }
}
