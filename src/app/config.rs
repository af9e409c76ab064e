// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::constants;
use crate::domain::error::WalletError;
use alloy::primitives::Address;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct WalletSettings {
    // General
    #[serde(default = "default_debug")]
    pub debug: bool,
    #[serde(default = "default_chain")]
    pub chain_id: u64,
    #[serde(default = "default_fiat")]
    pub fiat_currency: String,

    // Network
    pub http_providers: Option<HashMap<String, String>>,
    pub websocket_providers: Option<HashMap<String, String>>,
    pub graph_endpoint: Option<String>,

    // Relayer (alternate gas-token fee path)
    pub relayer_url: Option<String>,
    pub relayer_extension_address: Option<Address>,

    // Assets
    pub supported_assets_path: Option<String>,
    pub liquidity_pools_path: Option<String>,

    // Transaction
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u64,
}

fn default_debug() -> bool {
    false
}
fn default_chain() -> u64 {
    constants::CHAIN_ETHEREUM
}
fn default_fiat() -> String {
    "USD".to_string()
}
fn default_slippage_bps() -> u64 {
    constants::DEFAULT_SLIPPAGE_BPS
}

impl WalletSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, WalletError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Deterministic precedence: env/.env > selected profile file.
        builder = builder.add_source(Environment::with_prefix("WALLET"));

        let settings: WalletSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), WalletError> {
        if self.slippage_bps >= 10_000 {
            return Err(WalletError::Config(format!(
                "slippage_bps must be below 10000, got {}",
                self.slippage_bps
            )));
        }
        if let Some(providers) = &self.http_providers {
            for (chain, endpoint) in providers {
                url::Url::parse(endpoint).map_err(|e| {
                    WalletError::Config(format!("Invalid RPC URL for chain {chain}: {e}"))
                })?;
            }
        }
        Ok(())
    }

    pub fn http_provider_for(&self, chain_id: u64) -> Option<&str> {
        self.http_providers
            .as_ref()
            .and_then(|m| m.get(&chain_id.to_string()))
            .map(String::as_str)
    }

    pub fn native_symbol(&self) -> &'static str {
        constants::native_symbol_for_chain(self.chain_id)
    }
}
