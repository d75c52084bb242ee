//! Lifecycle provider facade.
//!
//! [`LifecycleProvider`] is what consumers depend on: the raw phase stream plus
//! the two binding entry points. [`HostLifecycle`] is the standard implementation,
//! one per host instance, wrapping that host's [`LifecycleSource`].

use crate::bind::BoundStream;
use crate::config::LifecycleConfig;
use crate::source::{EventStream, LifecycleEmitter, LifecycleSource};
use crate::transformer::LifecycleTransformer;
use futures::Stream;
use lifebind_core::{LifecycleEvent, PairingTable, Result};
use std::sync::Arc;

/// Access to a host's lifecycle and the operators bound to it.
///
/// # Example
///
/// ```no_run
/// use futures::{Stream, StreamExt};
/// use lifebind_core::{ActivityEvent, LifecycleError};
/// use lifebind_runtime::LifecycleProvider;
///
/// async fn show_prices<P, S>(provider: &P, prices: S) -> Result<(), LifecycleError>
/// where
///     P: LifecycleProvider<Event = ActivityEvent>,
///     S: Stream<Item = u64> + Send + 'static,
/// {
///     let mut bound = provider.bind_to_lifecycle().bind(prices)?;
///     while let Some(price) = bound.next().await {
///         println!("price: {price}");
///     }
///     Ok(())
/// }
/// ```
pub trait LifecycleProvider {
    /// The phase set of the host.
    type Event: LifecycleEvent;

    /// The current phase (when there is one) followed by every future phase.
    fn lifecycle(&self) -> EventStream<Self::Event>;

    /// An operator binding until the host emits `event`.
    fn bind_until_event(&self, event: Self::Event) -> LifecycleTransformer<Self::Event>;

    /// An operator binding until the phase corresponding to the host's phase when
    /// each bound stream is first polled.
    fn bind_to_lifecycle(&self) -> LifecycleTransformer<Self::Event>;
}

/// The lifecycle provider of one host instance.
#[derive(Debug, Clone)]
pub struct HostLifecycle<E: LifecycleEvent> {
    source: LifecycleSource<E>,
    pairing: Arc<PairingTable<E>>,
}

impl<E: LifecycleEvent> HostLifecycle<E> {
    /// Wrap a source, using the phase set's default pairing policy.
    #[must_use]
    pub fn new(source: LifecycleSource<E>) -> Self {
        Self {
            source,
            pairing: Arc::new(E::corresponding_events()),
        }
    }

    /// Create a provider together with the emitter the host adapter will drive.
    ///
    /// # Example
    ///
    /// ```
    /// use lifebind_core::FragmentEvent;
    /// use lifebind_runtime::{HostLifecycle, LifecycleConfig};
    ///
    /// let (emitter, provider) = HostLifecycle::<FragmentEvent>::create(LifecycleConfig::default());
    /// emitter.emit(FragmentEvent::Attach)?;
    /// assert_eq!(provider.current_phase(), Some(FragmentEvent::Attach));
    /// # Ok::<(), lifebind_core::LifecycleError>(())
    /// ```
    #[must_use]
    pub fn create(config: LifecycleConfig) -> (LifecycleEmitter<E>, Self) {
        let (emitter, source) = LifecycleSource::channel(config);
        (emitter, Self::new(source))
    }

    /// Replace the pairing policy.
    #[must_use]
    pub fn with_pairing(mut self, pairing: PairingTable<E>) -> Self {
        self.pairing = Arc::new(pairing);
        self
    }

    /// The wrapped source.
    #[must_use]
    pub const fn source(&self) -> &LifecycleSource<E> {
        &self.source
    }

    /// The pairing policy used by [`bind_to_lifecycle`](LifecycleProvider::bind_to_lifecycle).
    #[must_use]
    pub fn pairing(&self) -> &PairingTable<E> {
        &self.pairing
    }

    /// The phase most recently delivered by the host.
    #[must_use]
    pub fn current_phase(&self) -> Option<E> {
        self.source.current_phase()
    }

    /// Future phase changes only, see [`LifecycleSource::events`].
    #[must_use]
    pub fn events(&self) -> EventStream<E> {
        self.source.events()
    }

    /// Shorthand for `self.bind_to_lifecycle().bind(upstream)`.
    ///
    /// # Errors
    ///
    /// See [`LifecycleTransformer::bind`].
    pub fn bind<S>(&self, upstream: S) -> Result<BoundStream<S::Item>>
    where
        S: Stream + Send + 'static,
        S::Item: Send + 'static,
    {
        self.bind_to_lifecycle().bind(upstream)
    }
}

impl<E: LifecycleEvent> LifecycleProvider for HostLifecycle<E> {
    type Event = E;

    fn lifecycle(&self) -> EventStream<E> {
        self.source.lifecycle()
    }

    fn bind_until_event(&self, event: E) -> LifecycleTransformer<E> {
        LifecycleTransformer::until_event(self.source.clone(), event)
    }

    fn bind_to_lifecycle(&self) -> LifecycleTransformer<E> {
        LifecycleTransformer::corresponding(self.source.clone(), Arc::clone(&self.pairing))
    }
}
