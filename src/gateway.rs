//! API-gateway invocation: a JSON request envelope carrying the input in its
//! body, answered with a JSON response envelope carrying the output.
//!
//! [`GatewayHandler`] wraps an [`EventHandler`] and adds the envelope work:
//!
//! 1. decode the raw event into a [`GatewayRequest`];
//! 2. take its `body`, failing with [`HandlerError::NoRequestBody`] if absent;
//! 3. base64-decode the body when `isBase64Encoded` is set, failing with
//!    [`HandlerError::InvalidRequestBody`];
//! 4. decode the body into the function input and invoke the function;
//! 5. encode the output as the body of a `200` [`GatewayResponse`].
//!
//! Any failure along the way is turned into an [`ErrorOutput`] and written to
//! the sink, so the handler always completes the exchange. Only a failure of
//! the sink itself is returned.
//!
//! # Example
//!
//! ```rust
//! use remote_function::{BufferSink, FnFunction, GatewayHandler, GatewayResponse};
//!
//! # #[tokio::main]
//! # async fn main() -> remote_function::Result<()> {
//! let handler = GatewayHandler::new(FnFunction::new(|n: i64| async move {
//!     Ok::<_, remote_function::BoxError>(n * 2)
//! }));
//!
//! let mut sink = BufferSink::new();
//! handler
//!     .handle(br#"{"body":"21","isBase64Encoded":false}"#, &mut sink)
//!     .await?;
//!
//! let response: GatewayResponse = serde_json::from_slice(sink.as_bytes().unwrap()).unwrap();
//! assert_eq!(response.status_code, 200);
//! assert_eq!(response.body, "42");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt::Debug;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::{EventDecoder, JsonEventDecoder, JsonOutputEncoder, OutputEncoder};
use crate::config::{ErrorResponseMode, GatewayConfig};
use crate::errors::{HandlerError, Result, STATUS_OK};
use crate::event::EventHandler;
use crate::function::{BoxFuture, Function};
use crate::handler::StreamingHandler;
use crate::sink::ResponseSink;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// The parts of an API-gateway request this adapter reads.
///
/// Routing fields (`rawPath`, `headers`, `requestContext`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// The request body, possibly base64 encoded.
    #[serde(default)]
    pub body: Option<String>,

    /// Whether `body` is base64 encoded.
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

impl GatewayRequest {
    /// A request with a plain text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    /// A request whose body is `bytes`, base64 encoded.
    pub fn base64(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            body: Some(BASE64.encode(bytes)),
            is_base64_encoded: true,
        }
    }

    /// The raw body bytes, decoding base64 transport if declared.
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        let body = self.body.as_deref().ok_or(HandlerError::NoRequestBody)?;

        if self.is_base64_encoded {
            BASE64
                .decode(body)
                .map_err(|e| HandlerError::InvalidRequestBody(e.to_string()))
        } else {
            Ok(body.as_bytes().to_vec())
        }
    }
}

/// An API-gateway response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Response headers. Omitted from the wire when empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    pub body: String,

    /// Always `false` for responses produced by this crate.
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

impl GatewayResponse {
    /// A `200` response with a text body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(STATUS_OK, body)
    }

    pub fn with_status(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// Add a response header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// The error envelope written when an invocation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub error: String,
}

impl From<&HandlerError> for ErrorOutput {
    fn from(err: &HandlerError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// GatewayHandler
// ---------------------------------------------------------------------------

/// Adapts a [`Function`] to API-gateway invocations.
///
/// Type parameters, all JSON by default:
/// - `D` / `E`: decoder for the request body and encoder for the output;
/// - `RD` / `RE`: decoder for the request envelope and encoder for the
///   response envelope.
pub struct GatewayHandler<
    F,
    D = JsonEventDecoder,
    E = JsonOutputEncoder,
    RD = JsonEventDecoder,
    RE = JsonOutputEncoder,
> {
    inner: EventHandler<F, D, E>,
    request_decoder: RD,
    response_encoder: RE,
    config: GatewayConfig,
}

impl<F: Function> GatewayHandler<F> {
    /// Create a handler that speaks JSON everywhere.
    pub fn new(function: F) -> Self {
        Self::with_codecs(
            function,
            JsonOutputEncoder::new(),
            JsonEventDecoder,
            JsonOutputEncoder::new(),
            JsonEventDecoder,
        )
    }
}

impl<F, D, E, RD, RE> GatewayHandler<F, D, E, RD, RE>
where
    F: Function,
    D: EventDecoder,
    E: OutputEncoder,
    RD: EventDecoder,
    RE: OutputEncoder,
{
    /// Create a handler with custom codecs for the envelopes and for the body.
    pub fn with_codecs(
        function: F,
        response_encoder: RE,
        request_decoder: RD,
        output_encoder: E,
        event_decoder: D,
    ) -> Self {
        Self {
            inner: EventHandler::with_codecs(function, output_encoder, event_decoder),
            request_decoder,
            response_encoder,
            config: GatewayConfig::default(),
        }
    }

    /// Replace the error-path configuration.
    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The event handler used to decode, invoke, and encode the body.
    pub fn event_handler(&self) -> &EventHandler<F, D, E> {
        &self.inner
    }
}

impl<F, D, E, RD, RE> GatewayHandler<F, D, E, RD, RE>
where
    F: Function,
    F::Input: DeserializeOwned + Debug,
    F::Output: Serialize + Debug,
    D: EventDecoder,
    E: OutputEncoder,
    RD: EventDecoder,
    RE: OutputEncoder,
{
    /// Run the success path and return the encoded response envelope.
    ///
    /// Errors are returned, not enveloped; [`handle`](Self::handle) does that.
    pub async fn respond(&self, event: &[u8]) -> Result<Vec<u8>> {
        let request: GatewayRequest = self.request_decoder.decode(event)?;
        let body = request.body_bytes()?;
        tracing::debug!(
            bytes = body.len(),
            base64 = request.is_base64_encoded,
            "extracted request body"
        );

        let input = self.inner.decode_input(&body)?;
        let output = self.inner.invoke(input).await?;
        let output = self.inner.encode_output(&output)?;
        let body = String::from_utf8(output)
            .map_err(|e| HandlerError::Encode(format!("response body is not UTF-8: {e}")))?;

        let mut buf = Vec::new();
        self.response_encoder
            .encode(&GatewayResponse::ok(body), &mut buf)?;
        Ok(buf)
    }

    /// Encode the response written when handling fails.
    pub fn error_response(&self, err: &HandlerError) -> Result<Vec<u8>> {
        let envelope = ErrorOutput::from(err);
        let encoder = if self.config.pretty_errors {
            JsonOutputEncoder::pretty()
        } else {
            JsonOutputEncoder::new()
        };

        let mut buf = Vec::new();
        match self.config.error_response {
            ErrorResponseMode::Bare => encoder.encode(&envelope, &mut buf)?,
            ErrorResponseMode::Gateway => {
                let mut body = Vec::new();
                encoder.encode(&envelope, &mut body)?;
                let body = String::from_utf8(body)
                    .map_err(|e| HandlerError::Encode(format!("error body is not UTF-8: {e}")))?;
                let response = GatewayResponse::with_status(err.status_code(), body)
                    .header("content-type", "application/json");
                self.response_encoder.encode(&response, &mut buf)?;
            }
        }
        Ok(buf)
    }

    /// Handle one gateway event, writing either the response envelope or the
    /// error envelope to `sink`, exactly once.
    pub async fn handle<S: ResponseSink>(&self, event: &[u8], sink: &mut S) -> Result<()> {
        let buf = match self.respond(event).await {
            Ok(buf) => buf,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    status = err.status_code(),
                    "gateway invocation failed"
                );
                self.error_response(&err).unwrap_or_else(|encode_err| {
                    tracing::error!(error = %encode_err, "failed to encode error response");
                    fallback_error_response(&err)
                })
            }
        };

        sink.write_and_finish(buf).await
    }
}

/// Compact `{"error": ...}` JSON, used when the configured encoders fail.
fn fallback_error_response(err: &HandlerError) -> Vec<u8> {
    serde_json::json!({ "error": err.to_string() })
        .to_string()
        .into_bytes()
}

impl<F, D, E, RD, RE> StreamingHandler for GatewayHandler<F, D, E, RD, RE>
where
    F: Function,
    F::Input: DeserializeOwned + Debug,
    F::Output: Serialize + Debug,
    D: EventDecoder,
    E: OutputEncoder,
    RD: EventDecoder,
    RE: OutputEncoder,
{
    fn handle<'a, S: ResponseSink>(
        &'a self,
        event: &'a [u8],
        sink: &'a mut S,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(GatewayHandler::handle(self, event, sink))
    }
}
