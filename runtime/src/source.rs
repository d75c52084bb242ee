//! Lifecycle source: host callbacks in, ordered phase stream out.
//!
//! The host adapter owns the single [`LifecycleEmitter`] and calls
//! [`emit`](LifecycleEmitter::emit) from each lifecycle callback. Everything else
//! holds a read-only [`LifecycleSource`] handle.
//!
//! ```text
//! host callback ──► LifecycleEmitter::emit ──► current phase (watch)
//!                                          └─► phase events (broadcast) ──► subscribers
//! ```
//!
//! The current phase is updated before the phase is published, so a subscriber
//! reading [`LifecycleSource::current_phase`] while reacting to an event always
//! sees that event or a later one.

use crate::config::LifecycleConfig;
use crate::metrics;
use futures::Stream;
use futures::stream::{self, StreamExt};
use lifebind_core::{LifecycleError, LifecycleEvent, Result};
use std::fmt;
use std::pin::Pin;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};

/// Stream of lifecycle phases.
pub type EventStream<E> = Pin<Box<dyn Stream<Item = E> + Send>>;

/// The single writer of a host's lifecycle.
///
/// Not `Clone`: exactly one adapter delivers phases for a host. Dropping the
/// emitter releases the source; every open event stream then completes.
pub struct LifecycleEmitter<E: LifecycleEvent> {
    current: watch::Sender<Option<E>>,
    events: broadcast::Sender<E>,
}

/// Read-only handle to a host's lifecycle.
///
/// Cheap to clone. All handles observe the same current phase and the same
/// multicast phase stream.
pub struct LifecycleSource<E: LifecycleEvent> {
    current: watch::Receiver<Option<E>>,
    events: broadcast::Receiver<E>,
}

impl<E: LifecycleEvent> LifecycleSource<E> {
    /// Create a source and the emitter that feeds it.
    ///
    /// # Example
    ///
    /// ```
    /// use lifebind_core::ActivityEvent;
    /// use lifebind_runtime::{LifecycleConfig, LifecycleSource};
    ///
    /// let (emitter, source) = LifecycleSource::channel(LifecycleConfig::default());
    /// assert_eq!(source.current_phase(), None);
    ///
    /// emitter.emit(ActivityEvent::Create)?;
    /// assert_eq!(source.current_phase(), Some(ActivityEvent::Create));
    /// # Ok::<(), lifebind_core::LifecycleError>(())
    /// ```
    #[must_use]
    pub fn channel(config: LifecycleConfig) -> (LifecycleEmitter<E>, Self) {
        let (current_tx, current_rx) = watch::channel(None);
        let (events_tx, events_rx) = broadcast::channel(config.effective_capacity());

        let emitter = LifecycleEmitter {
            current: current_tx,
            events: events_tx,
        };
        let source = Self {
            current: current_rx,
            events: events_rx,
        };
        (emitter, source)
    }

    /// The phase most recently delivered by the host, `None` before the first one.
    #[must_use]
    pub fn current_phase(&self) -> Option<E> {
        *self.current.borrow()
    }

    /// Whether the host has reached its absolute terminal phase.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.current_phase().is_some_and(LifecycleEvent::is_terminal)
    }

    /// Whether the emitter has been dropped.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.current.has_changed().is_err()
    }

    /// Subscribe to future phase changes.
    ///
    /// The stream yields every phase delivered from now on, in order, and completes
    /// right after yielding the terminal phase. Subscribing once the host is
    /// terminated (or released) yields a stream that completes with no items.
    #[must_use]
    pub fn events(&self) -> EventStream<E> {
        let rx = self.events.resubscribe();
        let terminated = self.is_terminated();
        Box::pin(phase_stream(rx, terminated))
    }

    /// Subscribe to the current phase followed by future phase changes.
    ///
    /// For observers that attach mid-life and need to know where the host is. The
    /// current phase is replayed only while the host is not yet terminated.
    #[must_use]
    pub fn lifecycle(&self) -> EventStream<E> {
        let rx = self.events.resubscribe();
        let terminated = self.is_terminated();
        let replay = self.current_phase().filter(|_| !terminated);
        Box::pin(stream::iter(replay).chain(phase_stream(rx, terminated)))
    }
}

impl<E: LifecycleEvent> Clone for LifecycleSource<E> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
            events: self.events.resubscribe(),
        }
    }
}

impl<E: LifecycleEvent> fmt::Debug for LifecycleSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleSource")
            .field("current_phase", &self.current_phase())
            .field("released", &self.is_released())
            .finish()
    }
}

impl<E: LifecycleEvent> LifecycleEmitter<E> {
    /// Deliver a phase change from the host.
    ///
    /// Updates the current phase, then publishes the phase to every subscriber.
    /// Phase ordering is the host's contract and is not validated here.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::SourceTerminated`] if the terminal phase was already
    /// delivered. The phase is neither recorded nor published.
    #[tracing::instrument(skip_all, fields(phase = phase.label()), name = "lifecycle_emit")]
    pub fn emit(&self, phase: E) -> Result<()> {
        if self.current_phase().is_some_and(LifecycleEvent::is_terminal) {
            tracing::warn!("Lifecycle phase delivered after termination, rejecting");
            return Err(LifecycleError::SourceTerminated {
                phase: phase.label(),
            });
        }

        self.current.send_replace(Some(phase));
        // No receivers just means nothing is bound yet
        let receivers = self.events.send(phase).unwrap_or(0);

        metrics::record_phase_delivered(phase.label());
        tracing::debug!(receivers, "Lifecycle phase delivered");
        Ok(())
    }

    /// The phase most recently delivered.
    #[must_use]
    pub fn current_phase(&self) -> Option<E> {
        *self.current.borrow()
    }

    /// A new read-only handle to this lifecycle.
    #[must_use]
    pub fn source(&self) -> LifecycleSource<E> {
        LifecycleSource {
            current: self.current.subscribe(),
            events: self.events.subscribe(),
        }
    }
}

impl<E: LifecycleEvent> fmt::Debug for LifecycleEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleEmitter")
            .field("current_phase", &self.current_phase())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

/// Adapt a broadcast receiver into a phase stream ending at the terminal phase.
///
/// A lagged receiver has lost phases it can never recover, so its stream ends:
/// every binding attached to it completes early rather than outliving its target.
fn phase_stream<E: LifecycleEvent>(
    mut rx: broadcast::Receiver<E>,
    terminated: bool,
) -> impl Stream<Item = E> + Send {
    if terminated {
        return stream::empty().left_stream();
    }
    let phases = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(phase) => {
                    let last = phase.is_terminal();
                    yield phase;
                    if last {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        skipped,
                        "Lifecycle subscriber lagged, {} phases skipped; ending phase stream",
                        skipped
                    );
                    break;
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Lifecycle emitter released, ending phase stream");
                    break;
                }
            }
        }
    };
    phases.right_stream()
}
