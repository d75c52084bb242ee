//! Synchronous stream observer for tests.

use futures::FutureExt;
use futures::stream::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;

type Subscription<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Records what a stream delivers, polling it without an executor.
///
/// Every query first drains whatever the stream has ready, so assertions made
/// right after a simulated phase change see its effect.
///
/// # Example
///
/// ```
/// use futures::stream;
/// use lifebind_testing::TestSubscriber;
///
/// let mut subscriber = TestSubscriber::subscribe(stream::iter([1, 2]));
/// subscriber.assert_values(&[1, 2]).assert_complete();
/// ```
pub struct TestSubscriber<T> {
    stream: Option<Subscription<T>>,
    values: Vec<T>,
}

impl<T> TestSubscriber<T> {
    /// Start observing `stream`.
    pub fn subscribe<S>(stream: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        let mut subscriber = Self {
            stream: Some(Box::pin(stream)),
            values: Vec::new(),
        };
        subscriber.poll_ready();
        subscriber
    }

    /// Pull every item the stream has ready.
    pub fn poll_ready(&mut self) {
        while let Some(stream) = self.stream.as_mut() {
            let next = stream.next().now_or_never();
            match next {
                Some(Some(value)) => self.values.push(value),
                Some(None) => self.stream = None,
                None => break,
            }
        }
    }

    /// Items received so far.
    pub fn values(&mut self) -> &[T] {
        self.poll_ready();
        &self.values
    }

    /// Whether the stream has completed.
    pub fn is_complete(&mut self) -> bool {
        self.poll_ready();
        self.stream.is_none()
    }

    /// Drop the stream before it completes, as an early unsubscribe.
    pub fn cancel(&mut self) {
        self.stream = None;
    }

    /// Assert the stream has completed.
    ///
    /// # Panics
    ///
    /// Panics if the stream is still open.
    #[track_caller]
    pub fn assert_complete(&mut self) -> &mut Self {
        assert!(self.is_complete(), "expected stream to be complete");
        self
    }

    /// Assert the stream is still open.
    ///
    /// # Panics
    ///
    /// Panics if the stream has completed.
    #[track_caller]
    pub fn assert_not_complete(&mut self) -> &mut Self {
        assert!(!self.is_complete(), "expected stream to still be open");
        self
    }
}

impl<T: PartialEq + fmt::Debug> TestSubscriber<T> {
    /// Assert exactly these items were received, in order.
    ///
    /// # Panics
    ///
    /// Panics on any mismatch.
    #[track_caller]
    pub fn assert_values(&mut self, expected: &[T]) -> &mut Self {
        self.poll_ready();
        assert_eq!(self.values, expected, "unexpected stream values");
        self
    }

    /// Assert nothing was received.
    ///
    /// # Panics
    ///
    /// Panics if any item was received.
    #[track_caller]
    pub fn assert_no_values(&mut self) -> &mut Self {
        self.assert_values(&[])
    }
}

impl<T: fmt::Debug> fmt::Debug for TestSubscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSubscriber")
            .field("values", &self.values)
            .field("complete", &self.stream.is_none())
            .finish()
    }
}
