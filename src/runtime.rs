//! Run a [`StreamingHandler`] on the AWS Lambda runtime.
//!
//! The payload is passed to the handler as the exact bytes Lambda delivered,
//! and the bytes the handler writes are returned verbatim as the invocation
//! response. The response must therefore be valid JSON, which is the case for
//! the default codecs.
//!
//! # Example
//!
//! ```rust,no_run
//! use remote_function::{runtime, FnFunction, GatewayHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     let handler = GatewayHandler::new(FnFunction::new(|name: String| async move {
//!         Ok::<_, remote_function::BoxError>(format!("hello, {name}"))
//!     }));
//!     runtime::run_with_tracing(handler).await
//! }
//! ```

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::value::RawValue;
use tracing::{Instrument, Level};

use crate::errors::HandlerError;
use crate::handler::StreamingHandler;
use crate::logger;
use crate::sink::BufferSink;

/// Serve `handler` until the runtime shuts down.
pub async fn run<H: StreamingHandler>(handler: H) -> Result<(), Error> {
    let handler = Arc::new(handler);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Box<RawValue>>| {
        let handler = handler.clone();
        async move { invoke(handler.as_ref(), event).await }
    }))
    .await
}

/// Set up logging at `INFO`, then [`run`] the handler.
pub async fn run_with_tracing<H: StreamingHandler>(handler: H) -> Result<(), Error> {
    logger::setup_tracing(Level::INFO)?;
    run(handler).await
}

/// Handle a single Lambda invocation.
pub async fn invoke<H: StreamingHandler>(
    handler: &H,
    event: LambdaEvent<Box<RawValue>>,
) -> Result<Box<RawValue>, Error> {
    let (payload, context) = event.into_parts();
    let span = tracing::info_span!("invocation", request_id = %context.request_id);

    async move {
        tracing::trace!(payload = payload.get(), "received event");

        let mut sink = BufferSink::new();
        handler.handle(payload.get().as_bytes(), &mut sink).await?;

        let bytes = sink.into_bytes().ok_or_else(|| {
            HandlerError::Sink("handler completed without writing a response".to_string())
        })?;
        let response = RawValue::from_string(String::from_utf8(bytes)?)?;
        Ok(response)
    }
    .instrument(span)
    .await
}
