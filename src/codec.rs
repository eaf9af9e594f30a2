//! Pluggable encoders and decoders for events and function output.
//!
//! Adapters are generic over these traits so a function can speak any wire
//! format. JSON is the default.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{HandlerError, Result};

/// Decodes raw event bytes into a typed value.
pub trait EventDecoder: Send + Sync + 'static {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// Encodes a typed value, appending the encoded bytes to `buf`.
pub trait OutputEncoder: Send + Sync + 'static {
    fn encode<T: Serialize + ?Sized>(&self, value: &T, buf: &mut Vec<u8>) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Decodes events with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEventDecoder;

impl EventDecoder for JsonEventDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| HandlerError::Decode(e.to_string()))
    }
}

/// Encodes output with `serde_json`, compact unless built with [`JsonOutputEncoder::pretty`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputEncoder {
    pretty: bool,
}

impl JsonOutputEncoder {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// An encoder producing indented, multi-line JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl OutputEncoder for JsonOutputEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T, buf: &mut Vec<u8>) -> Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *buf, value)
        } else {
            serde_json::to_writer(&mut *buf, value)
        };
        written.map_err(|e| HandlerError::Encode(e.to_string()))
    }
}
