use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::constants::USER_AGENT;
use crate::models::{FetchError, FetchResult};
use crate::request::PreparedRequest;

/// Performs exactly one GET per call; no retries
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    /// Creates a transport with the crate's user agent
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Sends the request and returns the raw body.
    ///
    /// Every transport-level fault, including a non-2xx status and an
    /// expired timeout, comes back as [`FetchError::Network`].
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn fetch(&self, request: &PreparedRequest, timeout: Duration) -> FetchResult<String> {
        let response = self
            .client
            .get(request.url.clone())
            .headers(request.headers.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(describe_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Request failed");
            return Err(FetchError::Network(format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(describe_transport_error)?;
        debug!(bytes = body.len(), "Received response body");
        Ok(body)
    }
}

fn describe_transport_error(err: reqwest::Error) -> FetchError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    warn!(error = %err, "Transport failure");
    FetchError::Network(message)
}
