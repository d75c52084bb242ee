//! # Lifebind Testing
//!
//! Testing utilities for code bound to host lifecycles.
//!
//! This crate provides:
//! - [`HostSimulator`]: a stand-in for the UI framework that delivers phases on demand
//! - [`TestSubscriber`]: a synchronous observer recording values and completion
//! - [`init_test_tracing`]: log output for test runs
//!
//! ## Example
//!
//! ```
//! use futures::stream;
//! use lifebind_core::ActivityEvent;
//! use lifebind_runtime::LifecycleProvider;
//! use lifebind_testing::{HostSimulator, TestSubscriber};
//!
//! let host = HostSimulator::<ActivityEvent>::new();
//! host.create().start();
//!
//! let bound = host.provider().bind_to_lifecycle().bind(stream::pending::<u32>())?;
//! let mut subscriber = TestSubscriber::subscribe(bound);
//!
//! host.resume().pause();
//! subscriber.assert_not_complete();
//! host.stop();
//! subscriber.assert_complete();
//! # Ok::<(), lifebind_core::LifecycleError>(())
//! ```

use tracing_subscriber::EnvFilter;

pub mod host;
pub mod subscriber;

pub use host::HostSimulator;
pub use subscriber::TestSubscriber;

/// Install a test-friendly `tracing` subscriber.
///
/// Honors `RUST_LOG`; safe to call from every test since only the first call
/// installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
