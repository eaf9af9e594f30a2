//! Serve a closure behind a raw event trigger.
//!
//! The event is a JSON number and the response is that number doubled.

use remote_function::{runtime, BoxError, EventHandler, FnFunction};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let double = FnFunction::new(|n: i64| async move {
        n.checked_mul(2)
            .ok_or_else(|| BoxError::from(format!("{} is too large to double", n)))
    });

    runtime::run_with_tracing(EventHandler::new(double)).await
}
