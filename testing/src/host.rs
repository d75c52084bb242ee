//! Simulated host component.

use lifebind_core::{ActivityEvent, ComponentEvent, FragmentEvent, LifecycleEvent, Result};
use lifebind_runtime::{HostLifecycle, LifecycleConfig, LifecycleEmitter, LifecycleSource};

/// Drives a host through its lifecycle phases in tests.
///
/// Plays the role of the UI framework: it owns the emitter and delivers phases
/// on demand, while tests bind streams through [`provider`](Self::provider).
///
/// # Example
///
/// ```
/// use lifebind_core::ActivityEvent;
/// use lifebind_testing::HostSimulator;
///
/// let host = HostSimulator::<ActivityEvent>::new();
/// host.create().start().resume();
/// assert_eq!(host.current_phase(), Some(ActivityEvent::Resume));
/// ```
#[derive(Debug)]
pub struct HostSimulator<E: LifecycleEvent> {
    emitter: LifecycleEmitter<E>,
    provider: HostLifecycle<E>,
}

impl<E: LifecycleEvent> HostSimulator<E> {
    /// A host that has not delivered any phase yet.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LifecycleConfig::default())
    }

    /// A host with a custom source configuration.
    #[must_use]
    pub fn with_config(config: LifecycleConfig) -> Self {
        let (emitter, provider) = HostLifecycle::create(config);
        Self { emitter, provider }
    }

    /// The provider consumers bind through.
    #[must_use]
    pub const fn provider(&self) -> &HostLifecycle<E> {
        &self.provider
    }

    /// A fresh read-only handle to the host's lifecycle.
    #[must_use]
    pub fn source(&self) -> LifecycleSource<E> {
        self.emitter.source()
    }

    /// The phase most recently delivered.
    #[must_use]
    pub fn current_phase(&self) -> Option<E> {
        self.emitter.current_phase()
    }

    /// Deliver `phase`, reporting a rejected delivery.
    ///
    /// # Errors
    ///
    /// Returns the emitter's error when the host is already terminated.
    pub fn try_advance(&self, phase: E) -> Result<()> {
        self.emitter.emit(phase)
    }

    /// Deliver `phase`.
    ///
    /// # Panics
    ///
    /// Panics if the host is already terminated.
    #[track_caller]
    #[allow(clippy::expect_used)]
    pub fn advance(&self, phase: E) -> &Self {
        self.emitter
            .emit(phase)
            .expect("simulated host delivered a phase after termination");
        self
    }

    /// Deliver each phase in order.
    ///
    /// # Panics
    ///
    /// Panics if the host terminates before the last phase.
    #[track_caller]
    pub fn advance_all(&self, phases: impl IntoIterator<Item = E>) -> &Self {
        for phase in phases {
            self.advance(phase);
        }
        self
    }

    /// Drop the emitter without delivering the terminal phase, as a host that is
    /// released abruptly would.
    pub fn release(self) -> HostLifecycle<E> {
        self.provider
    }
}

impl<E: LifecycleEvent> Default for HostSimulator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSimulator<ActivityEvent> {
    /// Deliver [`ActivityEvent::Create`].
    #[track_caller]
    pub fn create(&self) -> &Self {
        self.advance(ActivityEvent::Create)
    }

    /// Deliver [`ActivityEvent::Start`].
    #[track_caller]
    pub fn start(&self) -> &Self {
        self.advance(ActivityEvent::Start)
    }

    /// Deliver [`ActivityEvent::Resume`].
    #[track_caller]
    pub fn resume(&self) -> &Self {
        self.advance(ActivityEvent::Resume)
    }

    /// Deliver [`ActivityEvent::Pause`].
    #[track_caller]
    pub fn pause(&self) -> &Self {
        self.advance(ActivityEvent::Pause)
    }

    /// Deliver [`ActivityEvent::Stop`].
    #[track_caller]
    pub fn stop(&self) -> &Self {
        self.advance(ActivityEvent::Stop)
    }

    /// Deliver [`ActivityEvent::Destroy`].
    #[track_caller]
    pub fn destroy(&self) -> &Self {
        self.advance(ActivityEvent::Destroy)
    }
}

impl HostSimulator<FragmentEvent> {
    /// Deliver the phases a fragment goes through when added to a created host:
    /// attach, create, create-view.
    #[track_caller]
    pub fn add(&self) -> &Self {
        self.advance_all([FragmentEvent::Attach, FragmentEvent::Create, FragmentEvent::CreateView])
    }

    /// Deliver [`FragmentEvent::Start`].
    #[track_caller]
    pub fn start(&self) -> &Self {
        self.advance(FragmentEvent::Start)
    }

    /// Deliver [`FragmentEvent::Resume`].
    #[track_caller]
    pub fn resume(&self) -> &Self {
        self.advance(FragmentEvent::Resume)
    }

    /// Deliver [`FragmentEvent::Pause`].
    #[track_caller]
    pub fn pause(&self) -> &Self {
        self.advance(FragmentEvent::Pause)
    }

    /// Deliver [`FragmentEvent::Stop`].
    #[track_caller]
    pub fn stop(&self) -> &Self {
        self.advance(FragmentEvent::Stop)
    }

    /// Deliver the phases of a fragment torn down with its host:
    /// destroy-view, destroy, detach.
    #[track_caller]
    pub fn remove(&self) -> &Self {
        self.advance_all([FragmentEvent::DestroyView, FragmentEvent::Destroy, FragmentEvent::Detach])
    }
}

impl HostSimulator<ComponentEvent> {
    /// Deliver [`ComponentEvent::OnCreate`].
    #[track_caller]
    pub fn create(&self) -> &Self {
        self.advance(ComponentEvent::OnCreate)
    }

    /// Deliver [`ComponentEvent::OnStart`].
    #[track_caller]
    pub fn start(&self) -> &Self {
        self.advance(ComponentEvent::OnStart)
    }

    /// Deliver [`ComponentEvent::OnResume`].
    #[track_caller]
    pub fn resume(&self) -> &Self {
        self.advance(ComponentEvent::OnResume)
    }

    /// Deliver [`ComponentEvent::OnPause`].
    #[track_caller]
    pub fn pause(&self) -> &Self {
        self.advance(ComponentEvent::OnPause)
    }

    /// Deliver [`ComponentEvent::OnStop`].
    #[track_caller]
    pub fn stop(&self) -> &Self {
        self.advance(ComponentEvent::OnStop)
    }

    /// Deliver [`ComponentEvent::OnDestroy`].
    #[track_caller]
    pub fn destroy(&self) -> &Self {
        self.advance(ComponentEvent::OnDestroy)
    }
}
