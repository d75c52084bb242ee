//! Integration tests for the lifecycle source
//!
//! Covers emission order, current-phase consistency, termination and release.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use futures::StreamExt;
use lifebind_core::{ActivityEvent, ComponentEvent, LifecycleError};
use lifebind_runtime::{LifecycleConfig, LifecycleProvider, LifecycleSource};
use lifebind_testing::{HostSimulator, TestSubscriber, init_test_tracing};
use std::sync::{Arc, Mutex};

// ============================================================================
// Emission
// ============================================================================

/// The provider's lifecycle stream replays the current phase and then follows the host.
#[test]
fn test_lifecycle_stream_replays_current_then_follows() {
    init_test_tracing();
    let host = HostSimulator::<ComponentEvent>::new();
    host.create();

    let mut observer = TestSubscriber::subscribe(host.provider().lifecycle());

    host.start().resume().pause().stop().destroy();

    observer
        .assert_values(&[
            ComponentEvent::OnCreate,
            ComponentEvent::OnStart,
            ComponentEvent::OnResume,
            ComponentEvent::OnPause,
            ComponentEvent::OnStop,
            ComponentEvent::OnDestroy,
        ])
        .assert_complete();
}

/// `events()` never replays: a late subscriber sees only later phases.
#[test]
fn test_events_only_deliver_future_phases() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create().start();

    let mut observer = TestSubscriber::subscribe(host.provider().events());
    observer.assert_no_values();

    host.resume();
    observer.assert_values(&[ActivityEvent::Resume]).assert_not_complete();
}

/// Every subscriber receives the same phases in the same order.
#[test]
fn test_events_are_multicast() {
    let host = HostSimulator::<ActivityEvent>::new();
    let mut first = TestSubscriber::subscribe(host.provider().events());
    let mut second = TestSubscriber::subscribe(host.source().events());

    host.advance_all(ActivityEvent::ALL);

    first.assert_values(&ActivityEvent::ALL).assert_complete();
    second.assert_values(&ActivityEvent::ALL).assert_complete();
}

/// A reaction that reads the current phase sees the phase it is reacting to.
#[test]
fn test_reaction_reads_phase_of_its_event() {
    let host = HostSimulator::<ActivityEvent>::new();
    let source = host.source();
    let observed = Arc::new(Mutex::new(Vec::new()));

    let reader = source.clone();
    let sink = Arc::clone(&observed);
    let reactions = source.events().map(move |phase| {
        sink.lock().unwrap().push((phase, reader.current_phase()));
        phase
    });
    let mut subscriber = TestSubscriber::subscribe(reactions);

    host.create();
    subscriber.poll_ready();
    host.start();
    subscriber.poll_ready();

    let observed = observed.lock().unwrap();
    assert_eq!(
        *observed,
        vec![
            (ActivityEvent::Create, Some(ActivityEvent::Create)),
            (ActivityEvent::Start, Some(ActivityEvent::Start)),
        ]
    );
}

/// A reader on another thread never sees a published phase ahead of the current phase.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_current_phase_is_updated_before_publishing() {
    for _ in 0..200 {
        let host = HostSimulator::<ActivityEvent>::new();
        let mut events = host.source().events();
        let reader = host.source();

        let observer = tokio::spawn(async move {
            let mut observed = Vec::new();
            while let Some(phase) = events.next().await {
                observed.push((phase, reader.current_phase()));
            }
            observed
        });

        // Emit back to back so delivery races the reader
        host.advance_all(ActivityEvent::ALL);

        let observed = observer.await.unwrap();
        assert_eq!(observed.len(), ActivityEvent::ALL.len());
        for (phase, current) in observed {
            assert!(
                current.is_some_and(|current| current >= phase),
                "read {current:?} while reacting to {phase:?}"
            );
        }
    }
}

// ============================================================================
// Termination
// ============================================================================

/// Subscribing after the terminal phase yields a stream that completes with no items.
#[test]
fn test_events_after_termination_complete_instantly() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.advance_all(ActivityEvent::ALL);

    TestSubscriber::subscribe(host.provider().events())
        .assert_no_values()
        .assert_complete();
    TestSubscriber::subscribe(host.provider().lifecycle())
        .assert_no_values()
        .assert_complete();
    assert!(host.source().is_terminated());
}

/// The source never emits after its terminal phase.
#[test]
fn test_delivery_after_termination_is_rejected() {
    let (emitter, source) = LifecycleSource::channel(LifecycleConfig::default());
    let mut observer = TestSubscriber::subscribe(source.events());

    emitter.emit(ActivityEvent::Destroy).unwrap();
    let err = emitter.emit(ActivityEvent::Create).unwrap_err();

    assert_eq!(err, LifecycleError::SourceTerminated { phase: "create" });
    observer.assert_values(&[ActivityEvent::Destroy]).assert_complete();
    assert_eq!(source.current_phase(), Some(ActivityEvent::Destroy));
}

/// Releasing the host without a terminal phase completes open streams.
#[test]
fn test_released_host_completes_streams() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create();
    let mut observer = TestSubscriber::subscribe(host.provider().events());

    let provider = host.release();

    observer.assert_no_values().assert_complete();
    assert!(provider.source().is_released());
    assert_eq!(provider.current_phase(), Some(ActivityEvent::Create));
}

/// Malformed ordering is passed through untouched.
#[test]
fn test_out_of_order_phases_are_not_corrected() {
    let host = HostSimulator::<ActivityEvent>::new();
    let mut observer = TestSubscriber::subscribe(host.provider().events());

    host.resume().create();

    observer.assert_values(&[ActivityEvent::Resume, ActivityEvent::Create]);
    assert_eq!(host.current_phase(), Some(ActivityEvent::Create));
}
