//! Pairing tables and correspondence resolution.
//!
//! A [`PairingTable`] is the policy deciding which phase closes a binding opened at
//! a given phase. It is plain data: swapping the table changes the policy without
//! touching [`resolve`] or the binding operators built on top of it.

use crate::error::{LifecycleError, Result};
use crate::event::LifecycleEvent;
use std::collections::HashMap;

/// Immutable mapping from an opening phase to its closing phase.
///
/// The table is not total. Closing-only phases (the terminal phase in particular)
/// have no entry, and resolving them yields [`LifecycleError::OutsideLifecycle`].
///
/// # Examples
///
/// ```
/// use lifebind_core::{ActivityEvent, LifecycleEvent, PairingTable};
///
/// let table = ActivityEvent::corresponding_events();
/// assert_eq!(table.get(ActivityEvent::Start), Some(ActivityEvent::Stop));
/// assert_eq!(table.get(ActivityEvent::Destroy), None);
///
/// // A two-phase policy for a host that only distinguishes start and stop
/// let custom = PairingTable::new([(ActivityEvent::Start, ActivityEvent::Stop)]);
/// assert_eq!(custom.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingTable<E: LifecycleEvent> {
    pairs: HashMap<E, E>,
}

impl<E: LifecycleEvent> PairingTable<E> {
    /// Build a table from `(opening, closing)` pairs.
    ///
    /// A later pair for the same opening phase replaces an earlier one.
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (E, E)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Closing phase for `opening`, if one is defined.
    #[must_use]
    pub fn get(&self, opening: E) -> Option<E> {
        self.pairs.get(&opening).copied()
    }

    /// Whether `opening` has a closing phase.
    #[must_use]
    pub fn contains(&self, opening: E) -> bool {
        self.pairs.contains_key(&opening)
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no phase has a pairing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over `(opening, closing)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (E, E)> + '_ {
        self.pairs.iter().map(|(open, close)| (*open, *close))
    }
}

impl<E: LifecycleEvent> Default for PairingTable<E> {
    fn default() -> Self {
        E::corresponding_events()
    }
}

impl<E: LifecycleEvent> FromIterator<(E, E)> for PairingTable<E> {
    fn from_iter<I: IntoIterator<Item = (E, E)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Resolve the phase that closes a binding opened at `phase`.
///
/// Total over the phase set: every phase yields either its closing phase or
/// [`LifecycleError::OutsideLifecycle`].
///
/// # Errors
///
/// Returns [`LifecycleError::OutsideLifecycle`] when `phase` has no pairing.
///
/// # Examples
///
/// ```
/// use lifebind_core::{resolve, FragmentEvent, LifecycleEvent};
///
/// let table = FragmentEvent::corresponding_events();
/// assert_eq!(resolve(&table, FragmentEvent::Stop), Ok(FragmentEvent::DestroyView));
/// assert!(resolve(&table, FragmentEvent::Detach).is_err());
/// ```
pub fn resolve<E: LifecycleEvent>(pairing: &PairingTable<E>, phase: E) -> Result<E> {
    pairing
        .get(phase)
        .ok_or(LifecycleError::OutsideLifecycle {
            phase: phase.label(),
        })
}
