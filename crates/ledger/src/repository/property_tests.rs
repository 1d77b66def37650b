// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property-based tests: ledger invariants under arbitrary event sequences.

use super::test_helpers::{setup_with_config, TestContext};
use crate::config::LedgerConfig;
use chemist_core::{Flask, PlatformEvent, RepoEvent, Target, TargetState};
use proptest::prelude::*;

fn uri_strategy() -> impl Strategy<Value = String> {
    (0..5usize).prop_map(|i| format!("app://u{i}"))
}

fn flask_strategy() -> impl Strategy<Value = String> {
    (0..3usize).prop_map(|i| format!("f{i}"))
}

/// Any platform event over a small universe of targets and flasks.
fn event_strategy() -> impl Strategy<Value = PlatformEvent> {
    let at_ms = 0..10_000u64;
    prop_oneof![
        (uri_strategy(), at_ms.clone()).prop_map(|(uri, at_ms)| PlatformEvent::NewTarget {
            target: Target::new(uri),
            at_ms,
        }),
        (flask_strategy(), at_ms.clone()).prop_map(|(id, at_ms)| PlatformEvent::NewFlask {
            flask: Flask::new(id.as_str(), format!("{id}.flasks.internal:9091")),
            at_ms,
        }),
        (flask_strategy(), at_ms.clone())
            .prop_map(|(id, at_ms)| PlatformEvent::TerminatedFlask { flask: id.into(), at_ms }),
        (uri_strategy(), at_ms.clone())
            .prop_map(|(uri, at_ms)| PlatformEvent::TerminatedTarget { uri: uri.into(), at_ms }),
        (flask_strategy(), uri_strategy(), at_ms.clone()).prop_map(|(f, uri, at_ms)| {
            PlatformEvent::Monitored { flask: f.into(), uri: uri.into(), at_ms }
        }),
        (flask_strategy(), uri_strategy(), at_ms.clone()).prop_map(|(f, uri, at_ms)| {
            PlatformEvent::Unmonitored { flask: f.into(), uri: uri.into(), at_ms }
        }),
        (flask_strategy(), uri_strategy(), at_ms.clone()).prop_map(|(f, uri, at_ms)| {
            PlatformEvent::Problem { flask: f.into(), uri: uri.into(), msg: "p".into(), at_ms }
        }),
        (flask_strategy(), uri_strategy(), at_ms.clone()).prop_map(|(f, uri, at_ms)| {
            PlatformEvent::Assigned { flask: f.into(), target: Target::new(uri), at_ms }
        }),
        at_ms.prop_map(|at_ms| PlatformEvent::NoOp { at_ms }),
    ]
}

fn small_config() -> LedgerConfig {
    LedgerConfig::default().platform_history(64).repo_history(128).fault_history(8)
}

/// Apply a sequence through the public handler on a private runtime.
fn run(events: Vec<PlatformEvent>) -> TestContext {
    let ctx = setup_with_config(small_config());
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    rt.block_on(async {
        for event in events {
            ctx.repo.platform_handler(event).await;
        }
    });
    ctx
}

/// Each tracked URI sits in exactly the bucket its latest change names.
fn assert_state_uniqueness(ctx: &TestContext) {
    let targets = ctx.repo.store.targets();
    let buckets = ctx.repo.states();

    for (uri, sc) in &targets {
        let holding: Vec<TargetState> = buckets
            .iter()
            .filter(|(_, bucket)| bucket.contains_key(uri))
            .map(|(state, _)| *state)
            .collect();
        assert_eq!(holding, vec![sc.to], "{uri}");
    }
    for bucket in buckets.values() {
        for uri in bucket.keys() {
            assert!(targets.contains_key(uri), "bucketed but untracked: {uri}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariant: state uniqueness and gauge agreement after any sequence.
    #[test]
    fn state_uniqueness_and_gauges(events in prop::collection::vec(event_strategy(), 0..60)) {
        let ctx = run(events);
        assert_state_uniqueness(&ctx);
        for (state, bucket) in ctx.repo.states() {
            prop_assert_eq!(ctx.metrics.gauge(state), bucket.len());
        }
    }

    /// Invariant: audit logs never exceed their capacities, and platform
    /// history reads back sorted by producer time.
    #[test]
    fn bounded_and_sorted_history(events in prop::collection::vec(event_strategy(), 0..200)) {
        let ctx = run(events);
        let platform = ctx.repo.historical_platform_events();
        prop_assert!(platform.len() <= 64);
        prop_assert!(ctx.repo.historical_repo_events().len() <= 128);
        prop_assert!(platform.windows(2).all(|w| w[0].at_ms() <= w[1].at_ms()));
    }

    /// Invariant: command accounting. One telemetry per flask arrival, one
    /// reassignment per flask death, one monitor per entry into the pool.
    #[test]
    fn command_accounting(events in prop::collection::vec(event_strategy(), 0..60)) {
        let new_flasks = events
            .iter()
            .filter(|e| matches!(e, PlatformEvent::NewFlask { .. }))
            .count();
        let dead_flasks = events
            .iter()
            .filter(|e| matches!(e, PlatformEvent::TerminatedFlask { .. }))
            .count();

        let mut ctx = run(events);
        let commands = ctx.drain_commands();

        let pool_entries = ctx
            .repo
            .historical_repo_events()
            .iter()
            .filter(|e| matches!(
                e,
                RepoEvent::StateChange(sc) if sc.to == TargetState::Unmonitored
            ))
            .count();

        let count = |name: &str| commands.iter().filter(|c| c.name() == name).count();
        prop_assert_eq!(count("telemetry"), new_flasks);
        prop_assert_eq!(count("reassign_work"), dead_flasks);
        prop_assert_eq!(count("monitor"), pool_entries);
        prop_assert_eq!(ctx.metrics.platform_event_failures(), 0);
    }

    /// Invariant: terminating a target twice equals terminating it once.
    #[test]
    fn idempotent_terminate(
        events in prop::collection::vec(event_strategy(), 0..40),
        uri in uri_strategy(),
    ) {
        let ctx = run(events);
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let terminate = PlatformEvent::TerminatedTarget { uri: uri.clone().into(), at_ms: 99_999 };
        rt.block_on(ctx.repo.platform_handler(terminate.clone()));
        let states_once = ctx.repo.states();
        let distribution_once = ctx.repo.distribution();

        rt.block_on(ctx.repo.platform_handler(terminate));
        prop_assert_eq!(ctx.repo.states(), states_once);
        prop_assert_eq!(ctx.repo.distribution(), distribution_once);
        assert_state_uniqueness(&ctx);
    }

    /// Invariant: telemetry for an unknown URI leaves every cell untouched.
    #[test]
    fn ghost_telemetry_is_non_destructive(
        events in prop::collection::vec(event_strategy(), 0..40),
    ) {
        let ctx = run(events);
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let targets_before = ctx.repo.store.targets();
        let states_before = ctx.repo.states();
        let distribution_before = ctx.repo.distribution();
        let flasks_before = ctx.repo.flasks();

        // "app://ghost" is outside the generated universe, so it is unknown.
        rt.block_on(ctx.repo.platform_handler(PlatformEvent::Monitored {
            flask: "f0".into(),
            uri: "app://ghost".into(),
            at_ms: 99_999,
        }));

        prop_assert_eq!(ctx.repo.store.targets(), targets_before);
        prop_assert_eq!(ctx.repo.states(), states_before);
        prop_assert_eq!(ctx.repo.distribution(), distribution_before);
        prop_assert_eq!(ctx.repo.flasks(), flasks_before);
    }
}
