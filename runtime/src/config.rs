//! Configuration for lifecycle sources.

/// Configuration for a [`LifecycleSource`](crate::source::LifecycleSource).
///
/// # Example
///
/// ```
/// use lifebind_runtime::LifecycleConfig;
///
/// let config = LifecycleConfig::default().with_event_capacity(128);
/// assert_eq!(config.event_capacity, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Number of phase events buffered per subscriber before it is considered lagged.
    ///
    /// A value of zero is treated as one.
    pub event_capacity: usize,
}

impl LifecycleConfig {
    /// Default broadcast buffer size.
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(event_capacity: usize) -> Self {
        Self { event_capacity }
    }

    /// Set the event buffer capacity
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Capacity actually used for the broadcast channel.
    pub(crate) fn effective_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}
