// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end runs of the ledger against realistic event sequences.

use super::test_helpers::{setup, setup_with_config};
use crate::config::LedgerConfig;
use chemist_core::{Clock, PlatformEvent, RepoCommand, TargetState, TargetUri};

#[tokio::test]
async fn cold_discovery() {
    let mut ctx = setup();
    ctx.discover("app://u1").await;

    let targets = ctx.repo.states();
    assert_eq!(targets[&TargetState::Unmonitored].len(), 1);
    assert!(targets[&TargetState::Unmonitored].contains_key(&TargetUri::from("app://u1")));
    assert_eq!(ctx.repo.target_state(&"app://u1".into()), TargetState::Unmonitored);

    let commands = ctx.drain_commands();
    assert_eq!(commands.len(), 1);
    assert!(
        matches!(&commands[0], RepoCommand::Monitor { target } if target.uri == "app://u1")
    );
}

#[tokio::test]
async fn happy_path_monitoring() {
    let mut ctx = setup();
    ctx.register_flask("f1").await;
    ctx.discover("app://u1").await;
    ctx.assign("f1", "app://u1").await;
    ctx.confirm("f1", "app://u1").await;

    assert_eq!(ctx.repo.target_state(&"app://u1".into()), TargetState::Monitored);
    // Writing assignments into the distribution is sharding's move, not ours.
    assert_eq!(ctx.repo.assigned_targets(&"f1".into()).unwrap().len(), 0);

    let commands = ctx.drain_commands();
    let names: Vec<&str> = commands.iter().map(RepoCommand::name).collect();
    assert_eq!(names, vec!["telemetry", "monitor"]);
}

#[tokio::test]
async fn double_assignment_is_contained_to_one_bucket() {
    let ctx = setup();
    ctx.discover("app://u1").await;
    ctx.assign("f1", "app://u1").await;
    ctx.assign("f2", "app://u1").await;

    assert_eq!(ctx.repo.target_state(&"app://u1".into()), TargetState::DoubleAssigned);
    let occupied: Vec<TargetState> = ctx
        .repo
        .states()
        .into_iter()
        .filter(|(_, bucket)| bucket.contains_key(&TargetUri::from("app://u1")))
        .map(|(state, _)| state)
        .collect();
    assert_eq!(occupied, vec![TargetState::DoubleAssigned]);
}

#[tokio::test]
async fn flask_death_requests_reassignment() {
    let mut ctx = setup();
    ctx.register_flask("f1").await;

    let at_ms = ctx.clock.epoch_ms();
    ctx.repo
        .platform_handler(PlatformEvent::TerminatedFlask { flask: "f1".into(), at_ms })
        .await;

    let commands = ctx.drain_commands();
    let names: Vec<&str> = commands.iter().map(RepoCommand::name).collect();
    assert_eq!(names, vec!["telemetry", "reassign_work"]);
}

#[tokio::test]
async fn ghost_telemetry_changes_nothing() {
    let mut ctx = setup();
    let at_ms = ctx.clock.epoch_ms();
    ctx.repo
        .platform_handler(PlatformEvent::Monitored {
            flask: "f1".into(),
            uri: "app://u-unknown".into(),
            at_ms,
        })
        .await;

    assert!(ctx.repo.states().values().all(|bucket| bucket.is_empty()));
    assert!(ctx.repo.distribution().is_empty());
    assert!(ctx.repo.flasks().is_empty());
    assert!(ctx.drain_commands().is_empty());
    assert_eq!(ctx.metrics.unknown_target_events(), 1);
}

#[tokio::test]
async fn history_overflow_drops_the_oldest_events() {
    let ctx = setup_with_config(LedgerConfig::default().platform_history(2000));
    for at_ms in 1..=2100u64 {
        ctx.repo.platform_handler(PlatformEvent::NoOp { at_ms }).await;
    }

    let history = ctx.repo.historical_platform_events();
    assert_eq!(history.len(), 2000);
    // The 100 oldest producer times are gone.
    assert_eq!(history.first().map(PlatformEvent::at_ms), Some(101));
    assert_eq!(history.last().map(PlatformEvent::at_ms), Some(2100));
}

#[tokio::test]
async fn full_lifecycle_round_trip_rejoins_the_pool() {
    let mut ctx = setup();
    ctx.register_flask("f1").await;
    ctx.register_flask("f2").await;
    ctx.discover("app://u1").await;
    ctx.assign("f1", "app://u1").await;
    ctx.confirm("f1", "app://u1").await;

    // f1 dies; sharding reassigns to f2, which confirms.
    let at_ms = ctx.clock.epoch_ms();
    ctx.repo
        .platform_handler(PlatformEvent::TerminatedFlask { flask: "f1".into(), at_ms })
        .await;
    ctx.repo
        .platform_handler(PlatformEvent::Unmonitored {
            flask: "f1".into(),
            uri: "app://u1".into(),
            at_ms,
        })
        .await;
    ctx.assign("f2", "app://u1").await;
    ctx.confirm("f2", "app://u1").await;

    assert_eq!(ctx.repo.target_state(&"app://u1".into()), TargetState::Monitored);
    let commands = ctx.drain_commands();
    let names: Vec<&str> = commands.iter().map(RepoCommand::name).collect();
    assert_eq!(
        names,
        vec!["telemetry", "telemetry", "monitor", "reassign_work", "monitor"]
    );
}
