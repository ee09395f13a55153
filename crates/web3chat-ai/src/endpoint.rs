//! Connection settings shared by the GraphQL and plain HTTP clients.

use std::fmt;
use std::time::Duration;

use crate::AiError;

/// Where and how to reach the completion service.
#[derive(Clone)]
pub struct EndpointConfig {
    pub url: String,
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub(crate) fn build_http(&self) -> Result<reqwest::Client, AiError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| AiError::Network(format!("failed to build HTTP client: {e}")))
    }

    /// Start a JSON POST to the endpoint, attaching auth if configured.
    pub(crate) fn post(&self, http: &reqwest::Client) -> reqwest::RequestBuilder {
        let request = http
            .post(&self.url)
            .header("content-type", "application/json");
        match self.api_key {
            Some(ref key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Map a non-2xx response to an error, keeping a short body excerpt.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let body = text.chars().take(200).collect::<String>();
        return Err(AiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
