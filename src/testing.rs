//! Recording doubles for testing code built on this crate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use remote_function::testing::{RecordingFunction, RecordingSink};
//! use remote_function::EventHandler;
//!
//! #[tokio::test]
//! async fn test_invalid_event_is_rejected() {
//!     let function = RecordingFunction::new(MyFunction);
//!     let handler = EventHandler::new(function.clone());
//!     let mut sink = RecordingSink::new();
//!
//!     assert!(handler.handle(b"garbage", &mut sink).await.is_err());
//!     function.assert_not_called();
//!     sink.assert_no_writes();
//! }
//! ```

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::errors::Result;
use crate::function::{BoxError, BoxFuture, Function};
use crate::sink::ResponseSink;

// ---------------------------------------------------------------------------
// RecordingFunction
// ---------------------------------------------------------------------------

/// Wraps a [`Function`] and records every input it is invoked with.
///
/// Clones share the same record, so keep a clone around after moving the
/// function into a handler.
pub struct RecordingFunction<F: Function> {
    inner: Arc<F>,
    inputs: Arc<Mutex<Vec<F::Input>>>,
}

impl<F: Function> Clone for RecordingFunction<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            inputs: self.inputs.clone(),
        }
    }
}

impl<F> RecordingFunction<F>
where
    F: Function,
    F::Input: Clone,
{
    pub fn new(inner: F) -> Self {
        Self {
            inner: Arc::new(inner),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times the function has been invoked.
    pub fn call_count(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    /// Every input received so far, in invocation order.
    pub fn inputs(&self) -> Vec<F::Input> {
        self.inputs.lock().unwrap().clone()
    }

    /// Assert that the function was never invoked.
    pub fn assert_not_called(&self) {
        let calls = self.call_count();
        assert_eq!(calls, 0, "Expected no invocations, found {}", calls);
    }

    /// Assert that the function was invoked exactly `expected` times.
    pub fn assert_called_times(&self, expected: usize) {
        let calls = self.call_count();
        assert_eq!(
            calls, expected,
            "Expected {} invocation(s), found {}",
            expected, calls
        );
    }
}

impl<F> Function for RecordingFunction<F>
where
    F: Function,
    F::Input: Clone,
{
    type Input = F::Input;
    type Output = F::Output;

    fn execute(&self, input: Self::Input) -> BoxFuture<'_, std::result::Result<Self::Output, BoxError>> {
        self.inputs.lock().unwrap().push(input.clone());
        self.inner.execute(input)
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// A sink that records every write instead of rejecting repeated ones.
///
/// Use it to check the one-write-per-event contract of a handler.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    writes: Vec<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Assert that nothing was written.
    pub fn assert_no_writes(&self) {
        assert!(
            self.writes.is_empty(),
            "Expected no writes, found {}",
            self.writes.len()
        );
    }

    /// Assert exactly one write happened and return its bytes.
    pub fn single_write(&self) -> &[u8] {
        assert_eq!(
            self.writes.len(),
            1,
            "Expected exactly one write, found {}",
            self.writes.len()
        );
        &self.writes[0]
    }

    /// The single write, as UTF-8 text.
    pub fn single_write_str(&self) -> &str {
        std::str::from_utf8(self.single_write()).expect("response is not UTF-8")
    }

    /// The single write, decoded as JSON.
    pub fn single_write_json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(self.single_write()).expect("response is not valid JSON")
    }
}

impl ResponseSink for RecordingSink {
    fn write_and_finish(&mut self, buf: Vec<u8>) -> BoxFuture<'_, Result<()>> {
        self.writes.push(buf);
        Box::pin(async { Ok(()) })
    }
}
