use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::function::BoxError;

/// Set to `true` to emit one JSON object per log line instead of compact text.
pub const JSON_LOGS_ENV: &str = "REMOTE_FUNCTION_JSON_LOGS";

fn env_filter(level: Level) -> Result<EnvFilter, BoxError> {
    let default_directive: Directive = format!("remote_function={level}").parse()?;
    Ok(EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env_lossy())
}

fn json_logs_enabled(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true" | "1"))
}

/// Install the global `tracing` subscriber for a function process.
///
/// `RUST_LOG` overrides the default `remote_function=<level>` directive.
/// ANSI colours are disabled since the output ends up in a log service.
pub fn setup_tracing(level: Level) -> Result<(), BoxError> {
    let filter = env_filter(level)?;
    let json = json_logs_enabled(std::env::var(JSON_LOGS_ENV).ok().as_deref());

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_ansi(false)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_ansi(false)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry().with(fmt_layer).try_init()?;
    Ok(())
}
