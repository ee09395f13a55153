//! GraphQL client struct and the request/envelope handling.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::endpoint::{check_status, EndpointConfig};
use crate::AiError;

use super::wire::GraphQlErrorEntry;

/// GraphQL completion-service client.
pub struct GraphQlClient {
    pub(crate) config: EndpointConfig,
    pub(crate) http: reqwest::Client,
}

impl GraphQlClient {
    pub fn new(config: EndpointConfig) -> Result<Self, AiError> {
        let http = config.build_http()?;
        Ok(Self { config, http })
    }

    /// POST `{ query, variables }` and decode `data` into `T`.
    ///
    /// Non-2xx status, a non-empty `errors` list, or a missing `data`
    /// object are all failures.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AiError> {
        debug!(operation, endpoint = %self.config.url, "GraphQL request");

        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self.config.post(&self.http).json(&body).send().await?;
        let response = check_status(response).await?;

        let mut json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Malformed(e.to_string()))?;

        if let Some(errors) = json.get("errors").filter(|e| !e.is_null()) {
            let errors: Vec<GraphQlErrorEntry> = serde_json::from_value(errors.clone())
                .map_err(|e| AiError::Malformed(format!("unreadable errors list: {e}")))?;
            if let Some(first) = errors.first() {
                return Err(AiError::GraphQl(first.message.clone()));
            }
        }

        let data = match json.get_mut("data").map(serde_json::Value::take) {
            Some(data) if !data.is_null() => data,
            _ => return Err(AiError::Malformed(format!("{operation}: no data in response"))),
        };

        serde_json::from_value(data).map_err(|e| AiError::Malformed(format!("{operation}: {e}")))
    }
}
