use std::str::FromStr;

/// Environment variable selecting the [`ErrorResponseMode`] (`bare` or `gateway`).
pub const ERROR_RESPONSE_ENV: &str = "REMOTE_FUNCTION_ERROR_RESPONSE";

/// Environment variable toggling pretty-printed error envelopes (`false` disables).
pub const PRETTY_ERRORS_ENV: &str = "REMOTE_FUNCTION_PRETTY_ERRORS";

/// How a [`GatewayHandler`](crate::GatewayHandler) reports a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorResponseMode {
    /// Write the `{"error": ...}` envelope directly as the invocation response.
    ///
    /// The gateway then answers with its default status (200), exactly as for
    /// a successful call.
    #[default]
    Bare,
    /// Wrap the error envelope in a gateway response whose status code
    /// reflects the failure (400 for bad requests, 500 otherwise).
    Gateway,
}

impl FromStr for ErrorResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(ErrorResponseMode::Bare),
            "gateway" => Ok(ErrorResponseMode::Gateway),
            other => Err(format!("unknown error response mode: {other}")),
        }
    }
}

/// Settings for the gateway adapter's error path.
///
/// # Example
///
/// ```rust
/// use remote_function::{ErrorResponseMode, GatewayConfig};
///
/// let config = GatewayConfig::new()
///     .error_response(ErrorResponseMode::Gateway)
///     .pretty_errors(false);
/// assert_eq!(config.error_response, ErrorResponseMode::Gateway);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// How failures are surfaced. Defaults to [`ErrorResponseMode::Bare`].
    pub error_response: ErrorResponseMode,
    /// Pretty-print the error envelope. Defaults to `true`.
    pub pretty_errors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            error_response: ErrorResponseMode::Bare,
            pretty_errors: true,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how failures are surfaced.
    pub fn error_response(mut self, mode: ErrorResponseMode) -> Self {
        self.error_response = mode;
        self
    }

    /// Set whether the error envelope is pretty-printed.
    pub fn pretty_errors(mut self, pretty: bool) -> Self {
        self.pretty_errors = pretty;
        self
    }

    /// Load the configuration from the process environment.
    ///
    /// Unset or unrecognised values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ERROR_RESPONSE_ENV) {
            match raw.parse() {
                Ok(mode) => config.error_response = mode,
                Err(e) => tracing::warn!(error = %e, "ignoring {}", ERROR_RESPONSE_ENV),
            }
        }

        if let Some(raw) = lookup(PRETTY_ERRORS_ENV) {
            config.pretty_errors = !raw.trim().eq_ignore_ascii_case("false");
        }

        config
    }
}
