use crate::function::BoxError;

// ---------------------------------------------------------------------------
// HTTP status codes used when errors are mapped onto gateway responses
// ---------------------------------------------------------------------------

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

// ---------------------------------------------------------------------------
// Main handler error type
// ---------------------------------------------------------------------------

/// Everything that can go wrong while handling one invocation.
///
/// Each stage of the decode, invoke, encode, respond pipeline maps onto
/// exactly one variant. There are intentionally no blanket `From`
/// conversions for codec errors: the call site knows which stage failed.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The event (or request body) could not be decoded into the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// The gateway request carried no body.
    #[error("no request body")]
    NoRequestBody,

    /// The gateway request declared a base64 body that is not valid base64.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The wrapped function failed.
    #[error("function error: {0}")]
    Function(#[source] BoxError),

    /// The function output (or a response envelope) could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// The response sink rejected the write.
    #[error("response sink error: {0}")]
    Sink(String),
}

impl HandlerError {
    /// Returns `true` if the failure was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HandlerError::Decode(_) | HandlerError::NoRequestBody | HandlerError::InvalidRequestBody(_)
        )
    }

    /// HTTP status to report when the error is surfaced through a gateway response.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            STATUS_BAD_REQUEST
        } else {
            STATUS_INTERNAL_SERVER_ERROR
        }
    }
}

// ---------------------------------------------------------------------------
// Result type alias
// ---------------------------------------------------------------------------

pub type Result<T> = std::result::Result<T, HandlerError>;
