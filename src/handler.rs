use std::sync::Arc;

use crate::errors::Result;
use crate::function::BoxFuture;
use crate::sink::ResponseSink;

/// A handler for raw invocation payloads.
///
/// Implemented by [`EventHandler`](crate::EventHandler) and
/// [`GatewayHandler`](crate::GatewayHandler), so a host bridge such as
/// [`runtime::run`](crate::runtime::run) only needs to be written once.
pub trait StreamingHandler: Send + Sync + 'static {
    /// Handle one event, writing exactly one response to `sink`.
    fn handle<'a, S: ResponseSink>(
        &'a self,
        event: &'a [u8],
        sink: &'a mut S,
    ) -> BoxFuture<'a, Result<()>>;
}

impl<H: StreamingHandler> StreamingHandler for Arc<H> {
    fn handle<'a, S: ResponseSink>(
        &'a self,
        event: &'a [u8],
        sink: &'a mut S,
    ) -> BoxFuture<'a, Result<()>> {
        (**self).handle(event, sink)
    }
}
