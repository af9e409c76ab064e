// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::retry::retry_with_backoff;
use crate::domain::error::WalletError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

/// Client for the pool-data graph indexer. Failures here are surfaced as
/// `WalletError::GraphQuery`, distinct from generic connection errors, so
/// the caller can show a tailored message.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    endpoint: Url,
}

#[derive(Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Deserialize)]
struct GraphError {
    message: String,
}

impl GraphClient {
    pub fn new(endpoint: &str) -> Result<Self, WalletError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| WalletError::Config(format!("Invalid graph endpoint: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, WalletError> {
        let body = json!({ "query": query, "variables": variables });

        let response = retry_with_backoff(
            || self.http.post(self.endpoint.clone()).json(&body).send(),
            3,
            Duration::from_millis(200),
        )
        .await
        .map_err(|e| WalletError::GraphQuery(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WalletError::GraphQuery(format!(
                "indexer responded with {}",
                response.status()
            )));
        }

        let parsed: GraphResponse<T> = response
            .json()
            .await
            .map_err(|e| WalletError::GraphQuery(format!("invalid response body: {e}")))?;

        if let Some(first) = parsed.errors.first() {
            return Err(WalletError::GraphQuery(first.message.clone()));
        }

        parsed
            .data
            .ok_or_else(|| WalletError::GraphQuery("response carried no data".to_string()))
    }
}
