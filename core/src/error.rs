//! Error types for lifecycle binding.

use thiserror::Error;

/// Errors raised while resolving or delivering lifecycle phases.
///
/// Upstream stream errors never pass through this type. A bound stream of
/// `Result<T, MyError>` yields its items unchanged; only the binding layer itself
/// reports failures through [`LifecycleError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The host is at a phase with no corresponding closing phase.
    ///
    /// Raised when a lifecycle-derived binding is requested after the host has
    /// already passed the last phase with a defined pairing (typically once it is
    /// fully destroyed). The condition is permanent for that binding attempt.
    #[error("Cannot bind to lifecycle at phase '{phase}': no corresponding closing phase")]
    OutsideLifecycle {
        /// Label of the phase the host was at
        phase: &'static str,
    },

    /// A lifecycle-derived binding was requested before the host delivered any phase.
    #[error("Cannot bind to lifecycle before the host has delivered its first phase")]
    NotStarted,

    /// The host adapter delivered a phase after the absolute terminal phase.
    ///
    /// The delivery is rejected; the source never emits after termination.
    #[error("Lifecycle source already terminated, rejected phase '{phase}'")]
    SourceTerminated {
        /// Label of the rejected phase
        phase: &'static str,
    },
}

impl LifecycleError {
    /// Whether this error is the "no corresponding phase" condition.
    #[must_use]
    pub const fn is_outside_lifecycle(&self) -> bool {
        matches!(self, Self::OutsideLifecycle { .. })
    }
}

/// Result alias used throughout Lifebind.
pub type Result<T> = std::result::Result<T, LifecycleError>;
