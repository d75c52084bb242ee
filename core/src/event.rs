//! Lifecycle event model.
//!
//! A host component moves through a fixed, linearly ordered set of phases. Each
//! phase set implements [`LifecycleEvent`], which names the absolute terminal phase
//! and supplies the default [`PairingTable`] mapping opening phases to the phases
//! that close them.
//!
//! Three phase sets ship with the crate:
//!
//! - [`ActivityEvent`]: full-screen host (create, start, resume, pause, stop, destroy)
//! - [`FragmentEvent`]: screen fragment with attach/detach and view creation phases
//! - [`ComponentEvent`]: generic lifecycle-owner events
//!
//! Hosts with a different phase set implement [`LifecycleEvent`] for their own enum.

use crate::pairing::PairingTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A lifecycle phase a host component can occupy.
///
/// # Contract
///
/// - Phases are delivered by the host in a fixed valid order
/// - Exactly one phase is terminal; nothing is delivered after it
/// - [`corresponding_events`](LifecycleEvent::corresponding_events) never pairs the
///   terminal phase with anything
pub trait LifecycleEvent: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// True for the absolute terminal phase of this set.
    fn is_terminal(self) -> bool;

    /// Stable, human-readable label used in logs and errors.
    fn label(self) -> &'static str;

    /// Default pairing policy: which phase closes a binding opened at each phase.
    fn corresponding_events() -> PairingTable<Self>;
}

/// Lifecycle phases of a full-screen host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEvent {
    /// Host created
    Create,
    /// Host visible
    Start,
    /// Host in the foreground
    Resume,
    /// Host leaving the foreground
    Pause,
    /// Host no longer visible
    Stop,
    /// Host destroyed (terminal)
    Destroy,
}

impl ActivityEvent {
    /// All phases in delivery order.
    pub const ALL: [Self; 6] = [
        Self::Create,
        Self::Start,
        Self::Resume,
        Self::Pause,
        Self::Stop,
        Self::Destroy,
    ];
}

impl LifecycleEvent for ActivityEvent {
    fn is_terminal(self) -> bool {
        matches!(self, Self::Destroy)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
        }
    }

    fn corresponding_events() -> PairingTable<Self> {
        PairingTable::new([
            (Self::Create, Self::Destroy),
            (Self::Start, Self::Stop),
            (Self::Resume, Self::Pause),
            (Self::Pause, Self::Stop),
            (Self::Stop, Self::Destroy),
        ])
    }
}

/// Lifecycle phases of a screen fragment hosted inside a full-screen host.
///
/// A fragment outlives its view: `CreateView`/`DestroyView` may cycle while the
/// fragment itself stays attached. `Detach` is the terminal phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentEvent {
    /// Fragment attached to its host
    Attach,
    /// Fragment created
    Create,
    /// Fragment view created
    CreateView,
    /// Fragment visible
    Start,
    /// Fragment in the foreground
    Resume,
    /// Fragment leaving the foreground
    Pause,
    /// Fragment no longer visible
    Stop,
    /// Fragment view destroyed
    DestroyView,
    /// Fragment destroyed
    Destroy,
    /// Fragment detached from its host (terminal)
    Detach,
}

impl FragmentEvent {
    /// All phases in delivery order.
    pub const ALL: [Self; 10] = [
        Self::Attach,
        Self::Create,
        Self::CreateView,
        Self::Start,
        Self::Resume,
        Self::Pause,
        Self::Stop,
        Self::DestroyView,
        Self::Destroy,
        Self::Detach,
    ];
}

impl LifecycleEvent for FragmentEvent {
    fn is_terminal(self) -> bool {
        matches!(self, Self::Detach)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Attach => "attach",
            Self::Create => "create",
            Self::CreateView => "create_view",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::DestroyView => "destroy_view",
            Self::Destroy => "destroy",
            Self::Detach => "detach",
        }
    }

    fn corresponding_events() -> PairingTable<Self> {
        PairingTable::new([
            (Self::Attach, Self::Detach),
            (Self::Create, Self::Destroy),
            (Self::CreateView, Self::DestroyView),
            (Self::Start, Self::Stop),
            (Self::Resume, Self::Pause),
            (Self::Pause, Self::Stop),
            (Self::Stop, Self::DestroyView),
            (Self::DestroyView, Self::Destroy),
            (Self::Destroy, Self::Detach),
        ])
    }
}

/// Generic lifecycle-owner events, for hosts that report transitions as
/// `on_*` notifications rather than activity or fragment callbacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentEvent {
    /// Owner created
    OnCreate,
    /// Owner started
    OnStart,
    /// Owner resumed
    OnResume,
    /// Owner paused
    OnPause,
    /// Owner stopped
    OnStop,
    /// Owner destroyed (terminal)
    OnDestroy,
}

impl ComponentEvent {
    /// All phases in delivery order.
    pub const ALL: [Self; 6] = [
        Self::OnCreate,
        Self::OnStart,
        Self::OnResume,
        Self::OnPause,
        Self::OnStop,
        Self::OnDestroy,
    ];
}

impl LifecycleEvent for ComponentEvent {
    fn is_terminal(self) -> bool {
        matches!(self, Self::OnDestroy)
    }

    fn label(self) -> &'static str {
        match self {
            Self::OnCreate => "on_create",
            Self::OnStart => "on_start",
            Self::OnResume => "on_resume",
            Self::OnPause => "on_pause",
            Self::OnStop => "on_stop",
            Self::OnDestroy => "on_destroy",
        }
    }

    fn corresponding_events() -> PairingTable<Self> {
        PairingTable::new([
            (Self::OnCreate, Self::OnDestroy),
            (Self::OnStart, Self::OnStop),
            (Self::OnResume, Self::OnPause),
            (Self::OnPause, Self::OnStop),
            (Self::OnStop, Self::OnDestroy),
        ])
    }
}

impl fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for FragmentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ComponentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
