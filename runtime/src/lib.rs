//! # Lifebind Runtime
//!
//! Binds reactive streams to the lifecycle of a host UI component, so that
//! subscriptions end automatically when the host passes the matching lifecycle
//! boundary.
//!
//! ## Core Components
//!
//! - **Lifecycle source**: turns host callbacks into one ordered, multicast phase
//!   stream with a synchronously readable current phase ([`LifecycleSource`])
//! - **Binding operators**: forward a stream until a target phase
//!   ([`bind_until_event`]) or until the phase corresponding to where the host is
//!   when the bound stream is first polled ([`bind_to_lifecycle`])
//! - **Transformer**: a reusable operator value ([`LifecycleTransformer`])
//! - **Provider**: the per-host facade ([`HostLifecycle`], [`LifecycleProvider`])
//!
//! ## Data Flow
//!
//! ```text
//! host callbacks → LifecycleEmitter → LifecycleSource ─┬─ current phase ─→ resolve ─┐
//!                                                      └─ phase stream ─────────────┴→ bound stream
//! ```
//!
//! ## Example
//!
//! ```
//! use futures::{stream, FutureExt, StreamExt};
//! use lifebind_core::ActivityEvent;
//! use lifebind_runtime::{HostLifecycle, LifecycleConfig, LifecycleProvider};
//!
//! let (emitter, provider) = HostLifecycle::create(LifecycleConfig::default());
//! emitter.emit(ActivityEvent::Create)?;
//! emitter.emit(ActivityEvent::Start)?;
//!
//! // First polled while started: completes on stop
//! let mut updates = provider.bind_to_lifecycle().bind(stream::pending::<u32>())?;
//! assert!(updates.next().now_or_never().is_none());
//!
//! emitter.emit(ActivityEvent::Resume)?;
//! emitter.emit(ActivityEvent::Pause)?;
//! assert!(updates.next().now_or_never().is_none());
//!
//! emitter.emit(ActivityEvent::Stop)?;
//! assert_eq!(updates.next().now_or_never(), Some(None));
//! # Ok::<(), lifebind_core::LifecycleError>(())
//! ```
//!
//! ## Threading
//!
//! Phases are expected to arrive from one thread, serialized, in the host's order.
//! The source does not reorder or validate them. Bound streams are `Send` and may
//! be polled anywhere, but the ordering guarantees hold relative to the thread
//! delivering phases.

/// Binding operators over streams and futures
pub mod bind;

/// Configuration for lifecycle sources
pub mod config;

/// Metrics for sources and bindings
pub mod metrics;

/// Per-host provider facade
pub mod provider;

/// Lifecycle source and emitter
pub mod source;

/// Reusable binding operators
pub mod transformer;

pub use bind::{
    BoundFuture, BoundStream, bind_future_to_lifecycle, bind_future_until_event, bind_to_lifecycle,
    bind_until_event, try_bind_to_lifecycle,
};
pub use config::LifecycleConfig;
pub use provider::{HostLifecycle, LifecycleProvider};
pub use source::{EventStream, LifecycleEmitter, LifecycleSource};
pub use transformer::{LifecycleTransformer, StreamLifecycleExt};
