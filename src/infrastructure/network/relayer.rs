// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::parsing::parse_u256_lenient;
use crate::common::retry::retry_with_backoff;
use crate::domain::asset::GasToken;
use crate::domain::error::WalletError;
use crate::domain::transaction::TransactionDraft;
use crate::infrastructure::data::assets::AssetRegistry;
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Raw estimate payload returned by the relayer. Numeric fields arrive as
/// decimal or hex strings depending on the relayer version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayerEstimatePayload {
    pub gas_amount: String,
    pub gas_price: String,
    pub total_cost: String,
    #[serde(default)]
    pub gas_token_cost: Option<String>,
    #[serde(default)]
    pub gas_token: Option<Address>,
    #[serde(default)]
    pub relayer_features: Option<RelayerFeatures>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayerFeatures {
    #[serde(default)]
    pub gas_token_supported: bool,
}

/// Parsed relayer estimate. `gas_token`/`gas_token_cost` are populated
/// only when the relayer supports gas tokens AND reported a positive
/// cost; otherwise the native path is the only option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerEstimate {
    pub gas_amount: U256,
    pub gas_price: U256,
    pub total_cost: U256,
    pub gas_token_cost: Option<U256>,
    pub gas_token: Option<GasToken>,
}

fn required_field(payload: &str, field: &str) -> Result<U256, WalletError> {
    parse_u256_lenient(payload).ok_or_else(|| {
        WalletError::Estimation(format!("relayer returned malformed {field}: {payload}"))
    })
}

pub fn parse_estimate_payload(
    payload: &RelayerEstimatePayload,
    registry: &AssetRegistry,
) -> Result<RelayerEstimate, WalletError> {
    let gas_amount = required_field(&payload.gas_amount, "gasAmount")?;
    let gas_price = required_field(&payload.gas_price, "gasPrice")?;
    let total_cost = required_field(&payload.total_cost, "totalCost")?;

    let mut estimate = RelayerEstimate {
        gas_amount,
        gas_price,
        total_cost,
        gas_token_cost: None,
        gas_token: None,
    };

    let supported = payload
        .relayer_features
        .as_ref()
        .map(|f| f.gas_token_supported)
        .unwrap_or(false);
    if !supported {
        return Ok(estimate);
    }

    let cost = payload
        .gas_token_cost
        .as_deref()
        .and_then(parse_u256_lenient)
        .unwrap_or(U256::ZERO);

    if cost > U256::ZERO
        && let Some(token_address) = payload.gas_token
        && let Some(gas_token) = registry.gas_token_details(token_address)
    {
        estimate.gas_token_cost = Some(cost);
        estimate.gas_token = Some(gas_token);
    }

    Ok(estimate)
}

/// HTTP client for the relayer's estimation endpoint.
#[derive(Clone)]
pub struct RelayerClient {
    http: reqwest::Client,
    base: Url,
}

impl RelayerClient {
    pub fn new(base_url: &str) -> Result<Self, WalletError> {
        let base = Url::parse(base_url)
            .map_err(|e| WalletError::Config(format!("Invalid relayer URL: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// Ask the relayer to price a draft set. Transport failures map to
    /// `Estimation`, which the estimator recovers from locally.
    pub async fn estimate(
        &self,
        account: Address,
        drafts: &[TransactionDraft],
    ) -> Result<RelayerEstimatePayload, WalletError> {
        let endpoint = self
            .base
            .join("estimate")
            .map_err(|e| WalletError::Config(format!("Invalid relayer URL: {e}")))?;

        let transactions: Vec<_> = drafts
            .iter()
            .map(|draft| {
                json!({
                    "to": format!("{:#x}", draft.to),
                    "value": format!("{:#x}", draft.value),
                    "data": draft
                        .data
                        .as_ref()
                        .map(|d| format!("0x{}", hex::encode(d)))
                        .unwrap_or_else(|| "0x".to_string()),
                })
            })
            .collect();
        let body = json!({
            "account": format!("{:#x}", account),
            "transactions": transactions,
        });

        let response = retry_with_backoff(
            || self.http.post(endpoint.clone()).json(&body).send(),
            3,
            Duration::from_millis(200),
        )
        .await
        .map_err(|e| WalletError::Estimation(format!("relayer estimate failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WalletError::Estimation(format!(
                "relayer responded with {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| WalletError::Estimation(format!("invalid relayer response: {e}")))
    }
}
