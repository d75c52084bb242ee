//! Reusable binding operators.
//!
//! A [`LifecycleTransformer`] captures *how* to bind (fixed target or pairing policy)
//! without binding anything. Every stream it produces is its own subscription: a
//! transformer built from a pairing table reads the host's current phase when each
//! bound stream is first polled, so one transformer serves consumers that subscribe
//! at different points of the host's life.

use crate::bind::{BoundFuture, BoundStream, Target, bind_future_stream, bind_stream, try_bind_stream};
use crate::source::LifecycleSource;
use futures::Stream;
use lifebind_core::{LifecycleEvent, PairingTable, Result};
use std::future::Future;
use std::sync::Arc;

/// A binding operator that can be applied to any number of streams and futures.
///
/// # Example
///
/// ```
/// use futures::{stream, FutureExt, StreamExt};
/// use lifebind_core::{ActivityEvent, LifecycleEvent};
/// use lifebind_runtime::{LifecycleConfig, LifecycleSource, LifecycleTransformer};
/// use std::sync::Arc;
///
/// let (emitter, source) = LifecycleSource::channel(LifecycleConfig::default());
/// let transformer = LifecycleTransformer::corresponding(
///     source.clone(),
///     Arc::new(ActivityEvent::corresponding_events()),
/// );
///
/// emitter.emit(ActivityEvent::Create)?;
/// let mut on_create = transformer.bind(stream::pending::<()>())?;
/// assert!(on_create.next().now_or_never().is_none());
/// emitter.emit(ActivityEvent::Start)?;
/// let mut on_start = transformer.bind(stream::pending::<()>())?;
/// assert!(on_start.next().now_or_never().is_none());
///
/// emitter.emit(ActivityEvent::Stop)?;
/// assert_eq!(on_start.next().now_or_never(), Some(None));
/// assert!(on_create.next().now_or_never().is_none());
/// # Ok::<(), lifebind_core::LifecycleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LifecycleTransformer<E: LifecycleEvent> {
    source: LifecycleSource<E>,
    target: Target<E>,
}

impl<E: LifecycleEvent> LifecycleTransformer<E> {
    /// Bind until the host emits `event`.
    #[must_use]
    pub fn until_event(source: LifecycleSource<E>, event: E) -> Self {
        Self {
            source,
            target: Target::Event(event),
        }
    }

    /// Bind until the phase that `pairing` assigns to the host's phase when each
    /// bound stream is first polled.
    #[must_use]
    pub fn corresponding(source: LifecycleSource<E>, pairing: Arc<PairingTable<E>>) -> Self {
        Self {
            source,
            target: Target::Corresponding(pairing),
        }
    }

    /// The fixed target phase, if this transformer has one.
    #[must_use]
    pub fn target(&self) -> Option<E> {
        match &self.target {
            Target::Event(event) => Some(*event),
            Target::Corresponding(_) => None,
        }
    }

    /// Bind a stream. The target is fixed when the returned stream is first polled.
    ///
    /// # Errors
    ///
    /// For pairing-based transformers, fails when the host has not started or its
    /// current phase has no closing phase. Fixed-target transformers never fail.
    pub fn bind<S>(&self, upstream: S) -> Result<BoundStream<S::Item>>
    where
        S: Stream + Send + 'static,
        S::Item: Send + 'static,
    {
        bind_stream(upstream, &self.source, self.target.clone())
    }

    /// Bind a stream, reporting a target that cannot be resolved at first poll as a
    /// single `Err` item instead of failing up front.
    pub fn try_bind<S>(&self, upstream: S) -> BoundStream<Result<S::Item>>
    where
        S: Stream + Send + 'static,
        S::Item: Send + 'static,
    {
        try_bind_stream(upstream, &self.source, self.target.clone())
    }

    /// Bind a single-valued future.
    ///
    /// # Errors
    ///
    /// Same conditions as [`bind`](Self::bind).
    pub fn bind_future<F>(&self, future: F) -> Result<BoundFuture<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        bind_future_stream(future, &self.source, self.target.clone())
    }
}

/// Fluent binding for any stream.
pub trait StreamLifecycleExt: Stream + Sized {
    /// Bind this stream with `transformer`.
    ///
    /// # Errors
    ///
    /// See [`LifecycleTransformer::bind`].
    fn bind_lifecycle<E>(self, transformer: &LifecycleTransformer<E>) -> Result<BoundStream<Self::Item>>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
        E: LifecycleEvent,
    {
        transformer.bind(self)
    }
}

impl<S: Stream> StreamLifecycleExt for S {}
