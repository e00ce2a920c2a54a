//! Integration tests for the process lifecycle.
//!
//! Covers:
//! - init failure and duplicate runs
//! - cleanup on every exit path
//! - successor hand-off (ordering, liveness, completion callback)
//! - delivery to processes that already left

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Scripted, count, drained, entries, eventually, harness, journal, position};
use procvisor::{EventKind, ProcessError, ProcessRef, ProcessSpec};

// =============================================================================
// Start-up
// =============================================================================

#[tokio::test]
async fn init_failure_never_registers_and_skips_cleanup() {
    let (sup, rec) = harness();
    let log = journal();
    let a = Scripted::new("a", &log).failing_init("no assets").into_ref();

    assert!(!sup.run(a.clone()));
    assert!(!sup.is_running(&a));
    assert_eq!(sup.live_count(), 0);
    assert_eq!(entries(&log), vec!["a.init"]);

    assert!(eventually(|| !rec.of(EventKind::ProcessInitFailed).is_empty()).await);
    let ev = &rec.of(EventKind::ProcessInitFailed)[0];
    assert_eq!(ev.process.as_deref(), Some("a"));
    assert_eq!(ev.reason.as_deref(), Some("no assets"));
    assert!(rec.of(EventKind::ProcessRegistered).is_empty());
}

#[tokio::test]
async fn running_the_same_process_twice_is_rejected() {
    let (sup, rec) = harness();
    let log = journal();
    let a = Scripted::new("a", &log).into_ref();

    assert!(sup.run(a.clone()));
    assert!(!sup.run(a.clone()));
    assert_eq!(sup.live_count(), 1);
    assert_eq!(sup.names(), vec!["a"]);

    assert!(eventually(|| !rec.of(EventKind::ProcessRejected).is_empty()).await);
    assert_eq!(
        rec.of(EventKind::ProcessRejected)[0].reason.as_deref(),
        Some("already_running")
    );

    sup.stop(&a).await;
    drained(&sup).await;
    assert_eq!(count(&log, "a.cleanup"), 1);
}

// =============================================================================
// Exit paths
// =============================================================================

#[tokio::test]
async fn cleanup_runs_exactly_once_on_every_exit_path() {
    let (sup, _rec) = harness();
    let log = journal();

    let quit = Scripted::new("quit", &log).endless().into_ref();
    let done = Scripted::new("done", &log).into_ref();
    let broken = Scripted::new("broken", &log)
        .ticks([Err(ProcessError::fail("tick broke"))])
        .into_ref();
    let picky = Scripted::new("picky", &log).rejecting_messages().into_ref();

    for p in [&quit, &done, &broken, &picky] {
        assert!(sup.run(p.clone()));
    }
    assert_eq!(sup.live_count(), 4);

    assert!(sup.stop(&quit).await);
    assert!(sup.tick(&done).await);
    assert!(sup.tick(&broken).await);
    assert!(sup.send(&picky, "hello").await);
    drained(&sup).await;

    for name in ["quit", "done", "broken", "picky"] {
        assert_eq!(count(&log, &format!("{name}.cleanup")), 1, "{name}");
    }
}

#[tokio::test]
async fn panicking_tick_is_reported_and_still_cleans_up() {
    let (sup, rec) = harness();
    let log = journal();
    let p = Scripted::new("p", &log).panicking().into_ref();

    assert!(sup.run(p.clone()));
    assert!(sup.tick(&p).await);
    drained(&sup).await;

    assert_eq!(count(&log, "p.cleanup"), 1);
    assert_eq!(count(&log, "p.successor"), 0);
    assert!(eventually(|| !rec.of(EventKind::TickFailed).is_empty()).await);
    assert_eq!(
        rec.of(EventKind::TickFailed)[0].reason.as_deref(),
        Some("panicked: tick exploded")
    );
}

#[tokio::test]
async fn handle_error_stops_without_successor_query() {
    let (sup, rec) = harness();
    let log = journal();
    let next = Scripted::new("next", &log).into_ref();
    let b = Scripted::new("b", &log)
        .rejecting_messages()
        .then(next.clone())
        .into_ref();

    assert!(sup.run(b.clone()));
    assert!(sup.send(&b, "first").await);
    drained(&sup).await;

    assert_eq!(count(&log, "b.cleanup"), 1);
    assert_eq!(count(&log, "b.successor"), 0);
    assert_eq!(count(&log, "next.init"), 0);

    assert!(eventually(|| !rec.of(EventKind::MessageFailed).is_empty()).await);
    let ev = &rec.of(EventKind::MessageFailed)[0];
    assert_eq!(ev.process.as_deref(), Some("b"));
    assert_eq!(ev.reason.as_deref(), Some("bad message"));
}

#[tokio::test]
async fn stopping_an_idle_process_skips_its_successor() {
    let (sup, rec) = harness();
    let log = journal();
    let next = Scripted::new("next", &log).into_ref();
    let a = Scripted::new("a", &log).then(next.clone()).into_ref();

    assert!(sup.run(a.clone()));
    assert!(sup.stop(&a).await);
    drained(&sup).await;

    assert_eq!(entries(&log), vec!["a.init", "a.cleanup"]);
    assert!(!sup.is_running(&next));
    assert!(eventually(|| !rec.of(EventKind::ProcessStopped).is_empty()).await);
    assert_eq!(
        rec.of(EventKind::ProcessStopped)[0].reason.as_deref(),
        Some("quit")
    );
}

// =============================================================================
// Successors
// =============================================================================

#[tokio::test]
async fn three_ticks_then_cleanup_then_successor() {
    let (sup, _rec) = harness();
    let log = journal();
    let b = Scripted::new("b", &log).endless().into_ref();
    let a = Scripted::new("a", &log)
        .ticks([Ok(true), Ok(true), Ok(false)])
        .then(b.clone())
        .into_ref();

    assert!(sup.run(a.clone()));
    for _ in 0..3 {
        assert!(sup.tick(&a).await);
    }
    assert!(eventually(|| sup.is_running(&b) && !sup.is_running(&a)).await);

    assert_eq!(
        entries(&log),
        vec![
            "a.init",
            "a.tick",
            "a.tick",
            "a.tick",
            "a.cleanup",
            "a.successor",
            "b.init",
        ]
    );

    sup.stop(&b).await;
    drained(&sup).await;
}

#[tokio::test]
async fn chain_hand_off_never_empties_the_registry() {
    let (sup, rec) = harness();
    let log = journal();
    let c = Scripted::new("c", &log).into_ref();
    let b = Scripted::new("b", &log).then(c.clone()).into_ref();
    let a = Scripted::new("a", &log).then(b.clone()).into_ref();

    assert!(sup.run(a.clone()));
    let drain = {
        let sup = Arc::clone(&sup);
        tokio::spawn(async move { sup.drain().await })
    };

    let deregistered = |n: usize| rec.of(EventKind::ProcessDeregistered).len() == n;

    assert!(sup.tick(&a).await);
    assert!(eventually(|| deregistered(1)).await);
    assert!(sup.is_running(&b));
    assert!(!drain.is_finished());

    assert!(sup.tick(&b).await);
    assert!(eventually(|| deregistered(2)).await);
    assert!(sup.is_running(&c));
    assert!(!drain.is_finished());

    assert!(sup.tick(&c).await);
    tokio::time::timeout(Duration::from_secs(2), drain)
        .await
        .expect("chain should drain")
        .unwrap();
    assert!(eventually(|| deregistered(3)).await);

    let live: Vec<usize> = rec
        .events()
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                EventKind::ProcessRegistered | EventKind::ProcessDeregistered
            )
        })
        .filter_map(|e| e.live)
        .collect();
    assert_eq!(live, vec![1, 2, 1, 2, 1, 0]);
    assert_eq!(rec.of(EventKind::SuccessorLaunched).len(), 2);
}

#[tokio::test]
async fn panicking_successor_is_reported_as_successor_failure() {
    let (sup, rec) = harness();
    let log = journal();
    let next = Scripted::new("next", &log).into_ref();
    let a = Scripted::new("a", &log)
        .panicking_successor()
        .then(next.clone())
        .into_ref();

    assert!(sup.run(a.clone()));
    assert!(sup.tick(&a).await);
    drained(&sup).await;

    assert_eq!(entries(&log), vec!["a.init", "a.tick", "a.cleanup", "a.successor"]);
    assert!(!sup.is_running(&next));
    assert!(eventually(|| !rec.of(EventKind::SuccessorFailed).is_empty()).await);
    let ev = &rec.of(EventKind::SuccessorFailed)[0];
    assert_eq!(ev.process.as_deref(), Some("a"));
    assert_eq!(ev.reason.as_deref(), Some("panicked: no next level"));
    assert!(eventually(|| rec.of(EventKind::ProcessDeregistered).len() == 1).await);
    assert!(rec.of(EventKind::CleanupFailed).is_empty());
    assert!(rec.of(EventKind::SuccessorLaunched).is_empty());
}

#[tokio::test]
async fn panicking_completion_callback_is_reported_separately() {
    let (sup, rec) = harness();
    let log = journal();
    let a: ProcessRef = Scripted::new("a", &log).endless().into_ref();

    let spec = ProcessSpec::new(a.clone()).with_on_complete(|| panic!("callback blew up"));
    assert!(sup.run(spec));
    assert!(sup.stop(&a).await);
    drained(&sup).await;

    assert_eq!(count(&log, "a.cleanup"), 1);
    assert!(eventually(|| !rec.of(EventKind::CompletionFailed).is_empty()).await);
    assert_eq!(
        rec.of(EventKind::CompletionFailed)[0].reason.as_deref(),
        Some("panicked: callback blew up")
    );
    assert!(rec.of(EventKind::CleanupFailed).is_empty());
}

#[tokio::test]
async fn completion_callback_runs_after_cleanup_and_before_successor() {
    let (sup, _rec) = harness();
    let log = journal();
    let b = Scripted::new("b", &log).endless().into_ref();
    let a = Scripted::new("a", &log).then(b.clone()).into_ref();

    let spec = {
        let log = log.clone();
        ProcessSpec::new(a.clone()).with_on_complete(move || log.lock().push("a.complete".into()))
    };
    assert!(sup.run(spec));
    assert!(sup.tick(&a).await);
    assert!(eventually(|| sup.is_running(&b)).await);

    assert!(position(&log, "a.cleanup") < position(&log, "a.complete"));
    assert!(position(&log, "a.complete") < position(&log, "a.successor"));
    assert!(position(&log, "a.successor") < position(&log, "b.init"));

    sup.stop(&b).await;
    drained(&sup).await;
}

#[tokio::test]
async fn completion_callback_runs_after_quit_too() {
    let (sup, _rec) = harness();
    let log = journal();
    let a: ProcessRef = Scripted::new("a", &log).endless().into_ref();

    let spec = {
        let log = log.clone();
        ProcessSpec::new(a.clone()).with_on_complete(move || log.lock().push("a.complete".into()))
    };
    assert!(sup.run(spec));
    assert!(sup.stop(&a).await);
    drained(&sup).await;

    assert_eq!(entries(&log), vec!["a.init", "a.cleanup", "a.complete"]);
}

// =============================================================================
// Delivery after deregistration
// =============================================================================

#[tokio::test]
async fn messages_to_departed_processes_are_silent_noops() {
    let (sup, _rec) = harness();
    let log = journal();
    let a = Scripted::new("a", &log).into_ref();

    assert!(sup.run(a.clone()));
    assert!(sup.stop(&a).await);
    drained(&sup).await;

    assert!(!sup.send(&a, "late").await);
    assert!(!sup.stop(&a).await);
    assert!(!sup.tick(&a).await);
    assert_eq!(sup.broadcast("late").await, 0);
    assert_eq!(count(&log, "a.message"), 0);
}
