#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
//! # remote-function
//!
//! Expose a typed async [`Function`] as a serverless handler.
//!
//! A function is plain business logic: an `Input` goes in, an `Output` comes
//! out. This crate supplies the glue that decodes the triggering event,
//! invokes the function, encodes the result and writes exactly one response.
//! Two triggers are supported:
//!
//! - **Raw events** with [`EventHandler`]: the event bytes are the input,
//!   the response bytes are the output. Errors propagate to the host runtime.
//! - **API-gateway requests** with [`GatewayHandler`]: the input travels in
//!   the body of a request envelope and the output is returned as the body
//!   of a `200` response envelope. Errors never escape; they are reported
//!   as an `{"error": "..."}` envelope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use remote_function::{runtime, BoxError, BoxFuture, Function, GatewayHandler};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Deserialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! #[derive(Debug, Serialize)]
//! struct Greeting {
//!     message: String,
//! }
//!
//! struct GreetFunction;
//!
//! impl Function for GreetFunction {
//!     type Input = Greet;
//!     type Output = Greeting;
//!
//!     fn execute(&self, input: Greet) -> BoxFuture<'_, Result<Greeting, BoxError>> {
//!         Box::pin(async move {
//!             Ok(Greeting {
//!                 message: format!("hello, {}", input.name),
//!             })
//!         })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BoxError> {
//!     runtime::run_with_tracing(GatewayHandler::new(GreetFunction)).await
//! }
//! ```
//!
//! ## Features
//!
//! - `lambda` (default): [`runtime`] bridge onto `lambda_runtime` and
//!   [`logger`] setup.
//! - `age-example` (default): the [`age`] sample function.
//! - `testing`: recording doubles in [`testing`].

pub mod codec;
pub mod config;
pub mod errors;
pub mod event;
pub mod function;
pub mod gateway;
pub mod handler;
pub mod sink;

/// Run handlers on the AWS Lambda runtime.
#[cfg(feature = "lambda")]
#[cfg_attr(docsrs, doc(cfg(feature = "lambda")))]
pub mod runtime;

/// `tracing` subscriber setup for function processes.
#[cfg(feature = "lambda")]
#[cfg_attr(docsrs, doc(cfg(feature = "lambda")))]
pub mod logger;

/// Sample function backed by the agify.io HTTP API.
#[cfg(feature = "age-example")]
#[cfg_attr(docsrs, doc(cfg(feature = "age-example")))]
pub mod age;

#[cfg(feature = "testing")]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub mod testing;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use codec::{EventDecoder, JsonEventDecoder, JsonOutputEncoder, OutputEncoder};
pub use config::{ErrorResponseMode, GatewayConfig};
pub use errors::{HandlerError, Result};
pub use event::EventHandler;
pub use function::{BoxError, BoxFuture, FnFunction, Function};
pub use gateway::{ErrorOutput, GatewayHandler, GatewayRequest, GatewayResponse};
pub use handler::StreamingHandler;
pub use sink::{BufferSink, ResponseSink};
