//! Serve the agify.io age lookup behind an API-gateway trigger.
//!
//! Invoke with a gateway request such as:
//!
//! ```json
//! {"body": "{\"name\":\"alice\"}", "isBase64Encoded": false}
//! ```
//!
//! and the response body will be `{"age":<n>}`.

use remote_function::age::NameToAgeFunction;
use remote_function::{runtime, BoxError, GatewayConfig, GatewayHandler};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let function = NameToAgeFunction::new(reqwest::Client::new());
    let handler = GatewayHandler::new(function).with_config(GatewayConfig::from_env());

    runtime::run_with_tracing(handler).await
}
