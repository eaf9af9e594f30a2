use crate::errors::{HandlerError, Result};
use crate::function::BoxFuture;

/// Destination for the single response of an invocation.
///
/// Handlers call [`write_and_finish`](ResponseSink::write_and_finish) exactly
/// once per handled event; there are no partial writes.
pub trait ResponseSink: Send {
    /// Write the complete response and close the sink.
    fn write_and_finish(&mut self, buf: Vec<u8>) -> BoxFuture<'_, Result<()>>;
}

/// An in-memory sink holding the response bytes.
///
/// Used by the Lambda runtime bridge, and handy in tests. A second write is
/// rejected with [`HandlerError::Sink`].
#[derive(Debug, Default)]
pub struct BufferSink {
    buf: Option<Vec<u8>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self { buf: None }
    }

    /// Returns `true` once a response has been written.
    pub fn is_finished(&self) -> bool {
        self.buf.is_some()
    }

    /// The written response, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.buf.as_deref()
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.buf
    }
}

impl ResponseSink for BufferSink {
    fn write_and_finish(&mut self, buf: Vec<u8>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.buf.is_some() {
                return Err(HandlerError::Sink("response already finished".to_string()));
            }
            self.buf = Some(buf);
            Ok(())
        })
    }
}
