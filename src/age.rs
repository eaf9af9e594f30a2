//! Sample function: look up the estimated age for a first name.
//!
//! [`NameToAgeFunction`] calls the public [agify.io](https://agify.io) API
//! and is meant to be served behind a [`GatewayHandler`](crate::GatewayHandler),
//! see `demos/name_to_age.rs`.

use std::time::Duration;

use reqwest::header::ACCEPT_ENCODING;
use serde::{Deserialize, Serialize};

use crate::function::{BoxError, BoxFuture, Function};

/// Base URL of the agify.io API.
pub const AGIFY_URL: &str = "https://api.agify.io";

/// Deadline for the outbound request, independent of the invocation deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResponse {
    pub age: i64,
}

/// Resolves an [`AgeRequest`] into an [`AgeResponse`] over HTTP.
#[derive(Debug, Clone)]
pub struct NameToAgeFunction {
    client: reqwest::Client,
    base_url: String,
}

impl NameToAgeFunction {
    /// Create a function calling agify.io with the given client.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: AGIFY_URL.to_string(),
        }
    }

    /// Point the function at another server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, input: &AgeRequest) -> reqwest::RequestBuilder {
        // agify.io deflates the body unless an encoding is explicitly requested.
        self.client
            .get(format!("{}/", self.base_url))
            .query(&[("name", input.name.as_str())])
            .header(ACCEPT_ENCODING, "identity")
            .timeout(REQUEST_TIMEOUT)
    }

    async fn parse_response(response: reqwest::Response) -> Result<AgeResponse, BoxError> {
        let response = response.error_for_status()?;
        let body = response.bytes().await?;
        let age: AgeResponse = serde_json::from_slice(&body).map_err(|e| {
            format!(
                "failed to parse age response: {} (body: {})",
                e,
                String::from_utf8_lossy(&body)
            )
        })?;
        Ok(age)
    }
}

impl Function for NameToAgeFunction {
    type Input = AgeRequest;
    type Output = AgeResponse;

    fn execute(&self, input: AgeRequest) -> BoxFuture<'_, Result<AgeResponse, BoxError>> {
        Box::pin(async move {
            let response = self.build_request(&input).send().await?;
            Self::parse_response(response).await
        })
    }
}
