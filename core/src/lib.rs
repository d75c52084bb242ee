//! # Lifebind Core
//!
//! Lifecycle event model and correspondence policy for binding reactive streams
//! to the lifetime of a host UI component.
//!
//! This crate is pure: it holds no streams, channels or runtime state. The
//! `lifebind-runtime` crate builds the lifecycle source and binding operators on
//! top of these types.
//!
//! ## Core Concepts
//!
//! - **Lifecycle phase**: one discrete, ordered state a host occupies ([`LifecycleEvent`])
//! - **Pairing table**: data mapping each opening phase to the phase that closes a
//!   binding started there ([`PairingTable`])
//! - **Resolution**: pure lookup of the closing phase, or
//!   [`LifecycleError::OutsideLifecycle`] when none exists ([`resolve`])
//!
//! ## Example
//!
//! ```
//! use lifebind_core::{resolve, ActivityEvent, LifecycleEvent};
//!
//! let table = ActivityEvent::corresponding_events();
//!
//! // A binding opened while resumed closes on pause
//! assert_eq!(resolve(&table, ActivityEvent::Resume), Ok(ActivityEvent::Pause));
//!
//! // Nothing can be bound once the host is destroyed
//! assert!(resolve(&table, ActivityEvent::Destroy).is_err());
//! ```

pub mod error;
pub mod event;
pub mod pairing;

pub use error::{LifecycleError, Result};
pub use event::{ActivityEvent, ComponentEvent, FragmentEvent, LifecycleEvent};
pub use pairing::{PairingTable, resolve};
