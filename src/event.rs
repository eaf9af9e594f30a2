//! Event-driven invocation: raw bytes in, raw bytes out.
//!
//! [`EventHandler`] decodes the event into the function's input, invokes the
//! function, encodes the output and writes it to a [`ResponseSink`]. Every
//! failure is returned to the caller unchanged, so the host runtime decides
//! how to report it.
//!
//! ```rust
//! use remote_function::{BufferSink, EventHandler, FnFunction};
//!
//! # #[tokio::main]
//! # async fn main() -> remote_function::Result<()> {
//! let handler = EventHandler::new(FnFunction::new(|n: i64| async move {
//!     Ok::<_, remote_function::BoxError>(n * 2)
//! }));
//!
//! let mut sink = BufferSink::new();
//! handler.handle(b"21", &mut sink).await?;
//! assert_eq!(sink.as_bytes(), Some(&b"42"[..]));
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{EventDecoder, JsonEventDecoder, JsonOutputEncoder, OutputEncoder};
use crate::errors::{HandlerError, Result};
use crate::function::{BoxFuture, Function};
use crate::handler::StreamingHandler;
use crate::sink::ResponseSink;

/// Adapts a [`Function`] to raw event invocations.
///
/// The decoder and encoder are fixed at construction. The handler holds no
/// per-call state and can be shared across concurrent invocations.
pub struct EventHandler<F, D = JsonEventDecoder, E = JsonOutputEncoder> {
    function: F,
    decoder: D,
    encoder: E,
}

impl<F: Function> EventHandler<F> {
    /// Create a handler that speaks JSON in both directions.
    pub fn new(function: F) -> Self {
        Self::with_codecs(function, JsonOutputEncoder::new(), JsonEventDecoder)
    }
}

impl<F, D, E> EventHandler<F, D, E>
where
    F: Function,
    D: EventDecoder,
    E: OutputEncoder,
{
    /// Create a handler with a custom output encoder and event decoder.
    pub fn with_codecs(function: F, encoder: E, decoder: D) -> Self {
        Self {
            function,
            decoder,
            encoder,
        }
    }

    /// The wrapped function.
    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F, D, E> EventHandler<F, D, E>
where
    F: Function,
    F::Input: DeserializeOwned + Debug,
    F::Output: Serialize + Debug,
    D: EventDecoder,
    E: OutputEncoder,
{
    /// Decode event bytes into the function input.
    pub fn decode_input(&self, bytes: &[u8]) -> Result<F::Input> {
        self.decoder.decode(bytes)
    }

    /// Encode the function output into a fresh buffer.
    pub fn encode_output(&self, output: &F::Output) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encoder.encode(output, &mut buf)?;
        Ok(buf)
    }

    /// Invoke the wrapped function with an already decoded input.
    pub async fn invoke(&self, input: F::Input) -> Result<F::Output> {
        tracing::trace!(input = ?input, "invoking function");

        let output = self
            .function
            .execute(input)
            .await
            .map_err(HandlerError::Function)?;

        tracing::trace!(output = ?output, "function returned");
        Ok(output)
    }

    /// Handle one raw event: decode, invoke, encode, then write and finish.
    ///
    /// The function is never called if decoding fails.
    pub async fn handle<S: ResponseSink>(&self, event: &[u8], sink: &mut S) -> Result<()> {
        let input = self.decode_input(event)?;
        let output = self.invoke(input).await?;
        let buf = self.encode_output(&output)?;

        tracing::debug!(bytes = buf.len(), "writing event response");
        sink.write_and_finish(buf).await
    }
}

impl<F, D, E> StreamingHandler for EventHandler<F, D, E>
where
    F: Function,
    F::Input: DeserializeOwned + Debug,
    F::Output: Serialize + Debug,
    D: EventDecoder,
    E: OutputEncoder,
{
    fn handle<'a, S: ResponseSink>(
        &'a self,
        event: &'a [u8],
        sink: &'a mut S,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(EventHandler::handle(self, event, sink))
    }
}
