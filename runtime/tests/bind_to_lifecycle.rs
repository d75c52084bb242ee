//! Integration tests for lifecycle-derived bindings
//!
//! Each binding resolves its closing phase from where the host is when it
//! subscribes. One provider is reused across subscriptions made at every phase.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use futures::stream::{self, StreamExt};
use lifebind_core::{
    ActivityEvent, ComponentEvent, FragmentEvent, LifecycleError, LifecycleEvent, PairingTable,
};
use lifebind_runtime::{BoundStream, LifecycleProvider, bind_to_lifecycle};
use lifebind_testing::{HostSimulator, TestSubscriber};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn pending_bound<P: LifecycleProvider>(provider: &P) -> TestSubscriber<()> {
    let bound = provider
        .bind_to_lifecycle()
        .bind(stream::pending::<()>())
        .expect("host should be inside its lifecycle");
    TestSubscriber::subscribe(bound)
}

// ============================================================================
// Concrete scenarios
// ============================================================================

/// Subscriptions at create, start, resume, pause and stop each close at their own phase.
#[test]
fn test_activity_subscriptions_close_at_corresponding_phase() {
    let host = HostSimulator::<ActivityEvent>::new();
    let provider = host.provider().clone();
    host.create();

    let mut on_create = pending_bound(&provider);

    host.start();
    on_create.assert_not_complete();
    let mut on_start = pending_bound(&provider);

    host.resume();
    on_create.assert_not_complete();
    on_start.assert_not_complete();
    let mut on_resume = pending_bound(&provider);

    host.pause();
    on_create.assert_not_complete();
    on_start.assert_not_complete();
    on_resume.assert_complete();
    let mut on_pause = pending_bound(&provider);

    host.stop();
    on_create.assert_not_complete();
    on_start.assert_complete();
    on_pause.assert_complete();
    let mut on_stop = pending_bound(&provider);

    host.destroy();
    on_create.assert_complete();
    on_stop.assert_complete();
}

/// Same scenario for generic lifecycle-owner events.
#[test]
fn test_component_subscriptions_close_at_corresponding_phase() {
    let host = HostSimulator::<ComponentEvent>::new();
    host.create();
    let mut on_create = pending_bound(host.provider());

    host.start();
    let mut on_start = pending_bound(host.provider());

    host.resume();
    let mut on_resume = pending_bound(host.provider());

    host.pause();
    on_resume.assert_complete();
    on_start.assert_not_complete();

    host.stop();
    on_start.assert_complete();
    on_create.assert_not_complete();

    host.destroy();
    on_create.assert_complete();
}

/// Fragments pair view phases with view phases and attach with detach.
#[test]
fn test_fragment_subscriptions_close_at_corresponding_phase() {
    let host = HostSimulator::<FragmentEvent>::new();

    host.advance(FragmentEvent::Attach);
    let mut on_attach = pending_bound(host.provider());
    host.advance(FragmentEvent::Create);
    let mut on_create = pending_bound(host.provider());
    host.advance(FragmentEvent::CreateView);
    let mut on_create_view = pending_bound(host.provider());

    host.start().resume().pause();
    let mut on_pause = pending_bound(host.provider());

    host.stop();
    on_pause.assert_complete();
    let mut on_stop = pending_bound(host.provider());

    host.advance(FragmentEvent::DestroyView);
    on_create_view.assert_complete();
    on_stop.assert_complete();
    on_create.assert_not_complete();

    host.advance(FragmentEvent::Destroy);
    on_create.assert_complete();
    on_attach.assert_not_complete();

    host.advance(FragmentEvent::Detach);
    on_attach.assert_complete();
}

/// A stream built during setup binds to the phase current when it is first polled.
#[test]
fn test_stream_built_early_binds_at_first_poll() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create();

    let built_on_create = host.provider().bind(stream::pending::<()>()).unwrap();

    host.start();
    let mut subscriber = TestSubscriber::subscribe(built_on_create);

    host.resume().pause();
    subscriber.assert_not_complete();
    host.stop();
    subscriber.assert_complete();
}

/// Streams built together but first polled at different phases close independently.
#[test]
fn test_streams_built_together_close_where_each_was_subscribed() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create();
    let transformer = host.provider().bind_to_lifecycle();
    let first = transformer.bind(stream::pending::<()>()).unwrap();
    let second = transformer.bind(stream::pending::<()>()).unwrap();

    host.start().resume();
    let mut on_resume = TestSubscriber::subscribe(first);
    host.pause();
    let mut on_pause = TestSubscriber::subscribe(second);

    on_resume.assert_complete();
    on_pause.assert_not_complete();
    host.stop();
    on_pause.assert_complete();
}

// ============================================================================
// Failures
// ============================================================================

/// A stream whose host is destroyed before it is first polled reports the failure in-band.
#[test]
fn test_try_bind_reports_failure_at_first_poll() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create();
    let bound = host.provider().bind_to_lifecycle().try_bind(stream::iter([1_u32]));

    host.stop().destroy();

    TestSubscriber::subscribe(bound)
        .assert_values(&[Err(LifecycleError::OutsideLifecycle { phase: "destroy" })])
        .assert_complete();
}

/// After destruction no binding can be made, and upstream is never polled.
#[test]
fn test_subscription_outside_lifecycle_fails_without_touching_upstream() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.advance_all(ActivityEvent::ALL);

    let polled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&polled);
    let upstream = stream::poll_fn(move |_| {
        flag.store(true, Ordering::SeqCst);
        std::task::Poll::Ready(Some(1_u32))
    });

    let result = host.provider().bind_to_lifecycle().bind(upstream);

    assert_eq!(
        result.err(),
        Some(LifecycleError::OutsideLifecycle { phase: "destroy" })
    );
    assert!(!polled.load(Ordering::SeqCst));
}

/// Binding before the host starts is refused.
#[test]
fn test_subscription_before_first_phase_fails() {
    let host = HostSimulator::<ActivityEvent>::new();

    let result = host.provider().bind(stream::pending::<()>());

    assert_eq!(result.err(), Some(LifecycleError::NotStarted));
}

/// A custom policy that leaves a phase unpaired rejects bindings made there.
#[test]
fn test_custom_pairing_rejects_unpaired_phase() {
    let host = HostSimulator::<ActivityEvent>::new();
    let pairing = PairingTable::new([(ActivityEvent::Resume, ActivityEvent::Pause)]);
    host.create();

    let result: Result<BoundStream<()>, _> =
        bind_to_lifecycle(stream::pending::<()>(), &host.source(), &pairing);
    assert!(result.err().is_some_and(|err| err.is_outside_lifecycle()));

    host.start().resume();
    let bound = bind_to_lifecycle(stream::pending::<()>(), &host.source(), &pairing).unwrap();
    let mut subscriber = TestSubscriber::subscribe(bound);
    host.pause();
    subscriber.assert_complete();
}

// ============================================================================
// Futures
// ============================================================================

/// A future bound at resume is cancelled on pause.
#[test]
fn test_future_cancelled_at_corresponding_phase() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create().start().resume();

    let mut bound = host
        .provider()
        .bind_to_lifecycle()
        .bind_future(futures::future::pending::<u32>())
        .unwrap();

    assert!(futures::FutureExt::now_or_never(&mut bound).is_none());
    host.pause();
    assert_eq!(futures::FutureExt::now_or_never(bound), Some(None));
}

/// A future that finishes first delivers its output.
#[tokio::test]
async fn test_future_output_delivered_before_phase() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create();

    let bound = host
        .provider()
        .bind_to_lifecycle()
        .bind_future(async { "loaded" })
        .unwrap();

    assert_eq!(bound.await, Some("loaded"));
}

// ============================================================================
// Properties
// ============================================================================

fn activity_phase() -> impl Strategy<Value = ActivityEvent> {
    prop::sample::select(ActivityEvent::ALL.to_vec())
}

fn fragment_phase() -> impl Strategy<Value = FragmentEvent> {
    prop::sample::select(FragmentEvent::ALL.to_vec())
}

/// Drive a host to `start`, bind there, then walk the rest of the lifecycle.
///
/// Returns the phase at which the binding was observed complete, if it was bound.
fn completion_phase<E: LifecycleEvent>(all: &[E], start: E) -> Result<Option<E>, LifecycleError> {
    let host = HostSimulator::<E>::new();
    let position = all.iter().position(|p| *p == start).unwrap();
    host.advance_all(all[..=position].iter().copied());

    let bound = host.provider().bind(stream::pending::<()>())?;
    let mut subscriber = TestSubscriber::subscribe(bound);

    for phase in &all[position + 1..] {
        host.advance(*phase);
        if subscriber.is_complete() {
            return Ok(Some(*phase));
        }
    }
    Ok(None)
}

proptest! {
    #[test]
    fn activity_binding_completes_exactly_at_pairing(phase in activity_phase()) {
        let expected = ActivityEvent::corresponding_events().get(phase);
        match completion_phase(&ActivityEvent::ALL, phase) {
            Ok(completed) => prop_assert_eq!(completed, expected),
            Err(err) => {
                prop_assert!(expected.is_none());
                prop_assert!(err.is_outside_lifecycle());
            }
        }
    }

    #[test]
    fn fragment_binding_completes_exactly_at_pairing(phase in fragment_phase()) {
        let expected = FragmentEvent::corresponding_events().get(phase);
        match completion_phase(&FragmentEvent::ALL, phase) {
            Ok(completed) => prop_assert_eq!(completed, expected),
            Err(err) => {
                prop_assert!(expected.is_none());
                prop_assert!(err.is_outside_lifecycle());
            }
        }
    }

    #[test]
    fn every_open_binding_completes_on_destruction(phases in prop::collection::vec(activity_phase(), 1..6)) {
        let host = HostSimulator::<ActivityEvent>::new();
        let mut subscribers = Vec::new();

        // Bind at each listed phase that is still reachable, in host order
        let mut bind_at: Vec<_> = phases.into_iter().filter(|p| !p.is_terminal()).collect();
        bind_at.dedup();

        for phase in ActivityEvent::ALL.into_iter().filter(|p| !p.is_terminal()) {
            host.advance(phase);
            if bind_at.contains(&phase) {
                subscribers.push(TestSubscriber::subscribe(
                    host.provider().bind_until_event(ActivityEvent::Create).bind(stream::pending::<()>()).unwrap(),
                ));
            }
        }
        for subscriber in &mut subscribers {
            prop_assert!(!subscriber.is_complete());
        }

        host.destroy();
        for subscriber in &mut subscribers {
            prop_assert!(subscriber.is_complete());
            prop_assert!(subscriber.values().is_empty());
        }
    }
}

/// Bound streams can be consumed with ordinary stream combinators.
#[tokio::test]
async fn test_bound_stream_collects_until_stop() {
    let host = HostSimulator::<ActivityEvent>::new();
    host.create().start();

    let bound = host.provider().bind(stream::iter(0..5)).unwrap();
    let collected: Vec<u32> = bound.collect().await;

    assert_eq!(collected, vec![0, 1, 2, 3, 4]);
}
