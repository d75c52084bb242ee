//! Binding operators.
//!
//! A binding forwards an upstream stream until the host reaches a target phase,
//! then completes and drops the upstream. Two flavours:
//!
//! - [`bind_until_event`]: the caller names the target phase
//! - [`bind_to_lifecycle`]: the target is resolved from the phase the host is at
//!   when the bound stream is subscribed, through a [`PairingTable`]
//!
//! A bound stream is subscribed when it is first polled, not when it is built. Only
//! then is the lifecycle subscription taken and the target resolved, so a stream
//! built during setup and polled later binds to the phase current at that later
//! point.
//!
//! The host reaching its absolute terminal phase (or releasing its emitter) always
//! ends a binding, even when the target phase never fired.

use crate::metrics;
use crate::source::LifecycleSource;
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use lifebind_core::{LifecycleError, LifecycleEvent, PairingTable, Result, resolve};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A stream bound to a host lifecycle.
pub type BoundStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// A future bound to a host lifecycle.
///
/// Resolves to `Some(output)` when the future finishes first, or `None` when the
/// lifecycle ends the binding first (the inner future is dropped at that point).
pub type BoundFuture<T> = Pin<Box<dyn Future<Output = Option<T>> + Send>>;

/// Forward `upstream` until `source` emits `target`.
///
/// The returned stream:
/// - yields upstream items unchanged, including `Err` items of a `Result` stream
/// - completes when upstream completes
/// - completes when the host emits `target`, dropping upstream
/// - completes when the host terminates or is released without emitting `target`
///
/// Phases delivered before the first poll are not observed. On every wake-up the
/// lifecycle is checked before upstream, so once `target` is observed no further
/// upstream item is forwarded.
///
/// # Example
///
/// ```
/// use futures::{stream, FutureExt, StreamExt};
/// use lifebind_core::ActivityEvent;
/// use lifebind_runtime::{bind_until_event, LifecycleConfig, LifecycleSource};
///
/// let (emitter, source) = LifecycleSource::channel(LifecycleConfig::default());
/// let mut bound = bind_until_event(stream::pending::<u32>(), &source, ActivityEvent::Stop);
///
/// emitter.emit(ActivityEvent::Start)?;
/// assert!(bound.next().now_or_never().is_none());
///
/// emitter.emit(ActivityEvent::Stop)?;
/// assert_eq!(bound.next().now_or_never(), Some(None));
/// # Ok::<(), lifebind_core::LifecycleError>(())
/// ```
pub fn bind_until_event<S, E>(upstream: S, source: &LifecycleSource<E>, target: E) -> BoundStream<S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
    E: LifecycleEvent,
{
    forward_ok(bind_on_subscribe(upstream, source.clone(), Target::Event(target)))
}

/// Forward `upstream` until the phase corresponding to the host's phase at
/// subscription.
///
/// The current phase is read when the returned stream is first polled, resolved
/// through `pairing`, and the stream then behaves as [`bind_until_event`] with that
/// target.
///
/// # Errors
///
/// The host is also checked when the stream is built, so a binding that could never
/// start fails here:
///
/// - [`LifecycleError::NotStarted`]: the host has not delivered any phase yet
/// - [`LifecycleError::OutsideLifecycle`]: the current phase has no closing phase
///
/// On error `upstream` is dropped without ever being polled. If the host moves to a
/// phase with no closing phase between building and first poll, the stream
/// completes with no items and the rejection is logged; use
/// [`try_bind_to_lifecycle`] to receive that error in-band.
pub fn bind_to_lifecycle<S, E>(
    upstream: S,
    source: &LifecycleSource<E>,
    pairing: &PairingTable<E>,
) -> Result<BoundStream<S::Item>>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
    E: LifecycleEvent,
{
    bind_stream(upstream, source, Target::corresponding(pairing))
}

/// Forward `upstream` as `Ok` items until the phase corresponding to the host's
/// phase at subscription, reporting a failed resolution in-band.
///
/// Nothing is checked when the stream is built. On first poll, a current phase with
/// no closing phase (or no current phase at all) yields a single `Err` and the
/// stream completes; upstream is never polled.
///
/// # Example
///
/// ```
/// use futures::{stream, FutureExt, StreamExt};
/// use lifebind_core::{ActivityEvent, LifecycleError, LifecycleEvent};
/// use lifebind_runtime::{try_bind_to_lifecycle, LifecycleConfig, LifecycleSource};
///
/// let (emitter, source) = LifecycleSource::channel(LifecycleConfig::default());
/// let pairing = ActivityEvent::corresponding_events();
/// let mut bound = try_bind_to_lifecycle(stream::iter([1, 2]), &source, &pairing);
///
/// emitter.emit(ActivityEvent::Create)?;
/// emitter.emit(ActivityEvent::Destroy)?;
///
/// assert_eq!(
///     bound.next().now_or_never(),
///     Some(Some(Err(LifecycleError::OutsideLifecycle { phase: "destroy" })))
/// );
/// assert_eq!(bound.next().now_or_never(), Some(None));
/// # Ok::<(), lifebind_core::LifecycleError>(())
/// ```
pub fn try_bind_to_lifecycle<S, E>(
    upstream: S,
    source: &LifecycleSource<E>,
    pairing: &PairingTable<E>,
) -> BoundStream<Result<S::Item>>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
    E: LifecycleEvent,
{
    try_bind_stream(upstream, source, Target::corresponding(pairing))
}

/// Run `future` until `source` emits `target`.
pub fn bind_future_until_event<F, E>(future: F, source: &LifecycleSource<E>, target: E) -> BoundFuture<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    E: LifecycleEvent,
{
    first_item(bind_until_event(stream::once(future), source, target))
}

/// Run `future` until the phase corresponding to the host's phase when it is
/// first polled.
///
/// # Errors
///
/// Same conditions as [`bind_to_lifecycle`]; `future` is dropped unpolled.
pub fn bind_future_to_lifecycle<F, E>(
    future: F,
    source: &LifecycleSource<E>,
    pairing: &PairingTable<E>,
) -> Result<BoundFuture<F::Output>>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    E: LifecycleEvent,
{
    bind_future_stream(future, source, Target::corresponding(pairing))
}

/// How a binding finds the phase that ends it.
#[derive(Debug, Clone)]
pub(crate) enum Target<E: LifecycleEvent> {
    /// A phase named up front
    Event(E),
    /// The pairing of whatever phase is current at subscription
    Corresponding(Arc<PairingTable<E>>),
}

impl<E: LifecycleEvent> Target<E> {
    fn corresponding(pairing: &PairingTable<E>) -> Self {
        Self::Corresponding(Arc::new(pairing.clone()))
    }

    fn resolve(&self, source: &LifecycleSource<E>) -> Result<E> {
        match self {
            Self::Event(event) => Ok(*event),
            Self::Corresponding(pairing) => corresponding_target(source, pairing),
        }
    }
}

pub(crate) fn bind_stream<S, E>(upstream: S, source: &LifecycleSource<E>, target: Target<E>) -> Result<BoundStream<S::Item>>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
    E: LifecycleEvent,
{
    target.resolve(source)?;
    Ok(forward_ok(bind_on_subscribe(upstream, source.clone(), target)))
}

pub(crate) fn try_bind_stream<S, E>(upstream: S, source: &LifecycleSource<E>, target: Target<E>) -> BoundStream<Result<S::Item>>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
    E: LifecycleEvent,
{
    Box::pin(bind_on_subscribe(upstream, source.clone(), target))
}

pub(crate) fn bind_future_stream<F, E>(
    future: F,
    source: &LifecycleSource<E>,
    target: Target<E>,
) -> Result<BoundFuture<F::Output>>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    E: LifecycleEvent,
{
    bind_stream(stream::once(future), source, target).map(first_item)
}

fn corresponding_target<E: LifecycleEvent>(source: &LifecycleSource<E>, pairing: &PairingTable<E>) -> Result<E> {
    let resolved = source
        .current_phase()
        .ok_or(LifecycleError::NotStarted)
        .and_then(|phase| resolve(pairing, phase));

    if let Err(err) = &resolved {
        metrics::record_binding_rejected();
        tracing::warn!(error = %err, "Lifecycle binding rejected");
    }
    resolved
}

/// Drop the resolution error of a binding already validated when it was built.
fn forward_ok<S, T>(bound: S) -> BoundStream<T>
where
    S: Stream<Item = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    Box::pin(bound.filter_map(|item| future::ready(item.ok())))
}

fn first_item<T: Send + 'static>(mut bound: BoundStream<T>) -> BoundFuture<T> {
    Box::pin(async move {
        let mut output = None;
        // Keep polling past the item so the binding records its upstream completion
        while let Some(item) = bound.next().await {
            output = Some(item);
        }
        output
    })
}

/// Why a binding stopped forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Target,
    Destroyed,
    Upstream,
}

impl Completion {
    const fn label(self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Destroyed => "destroyed",
            Self::Upstream => "upstream",
        }
    }
}

/// Tracks one live binding. Dropped without completing means the subscriber
/// cancelled.
struct BindingGuard {
    target: &'static str,
    completed: bool,
}

impl BindingGuard {
    fn open(target: &'static str) -> Self {
        metrics::record_binding_opened();
        tracing::trace!(target_phase = target, "Lifecycle binding opened");
        Self {
            target,
            completed: false,
        }
    }

    fn complete(&mut self, completion: Completion) {
        self.completed = true;
        metrics::record_binding_closed(completion.label());
        tracing::debug!(
            target_phase = self.target,
            reason = completion.label(),
            "Lifecycle binding completed"
        );
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        if !self.completed {
            metrics::record_binding_closed("cancelled");
            tracing::debug!(target_phase = self.target, "Lifecycle binding cancelled by subscriber");
        }
    }
}

enum Step<E, T> {
    Lifecycle(Option<E>),
    Upstream(Option<T>),
}

/// The binding itself. Nothing happens until the first poll: then the lifecycle is
/// subscribed, the target resolved, and upstream raced against the lifecycle.
fn bind_on_subscribe<S, E>(upstream: S, source: LifecycleSource<E>, target: Target<E>) -> impl Stream<Item = Result<S::Item>> + Send
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
    E: LifecycleEvent,
{
    async_stream::stream! {
        // Subscribe before reading the current phase so no delivery falls in between
        let mut lifecycle = source.events();

        match target.resolve(&source) {
            Err(err) => yield Err(err),
            Ok(target) => {
                let mut guard = BindingGuard::open(target.label());
                let mut upstream = Box::pin(upstream);
                loop {
                    let step = tokio::select! {
                        biased;
                        phase = lifecycle.next() => Step::Lifecycle(phase),
                        item = upstream.next() => Step::Upstream(item),
                    };

                    match step {
                        Step::Lifecycle(Some(phase)) if phase == target => {
                            guard.complete(Completion::Target);
                            break;
                        }
                        Step::Lifecycle(Some(_)) => {}
                        Step::Lifecycle(None) => {
                            guard.complete(Completion::Destroyed);
                            break;
                        }
                        Step::Upstream(Some(item)) => yield Ok(item),
                        Step::Upstream(None) => {
                            guard.complete(Completion::Upstream);
                            break;
                        }
                    }
                }
            }
        }
    }
}
