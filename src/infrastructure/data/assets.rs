// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::collections::HashMap;
use std::fs;

use alloy::primitives::Address;
use dashmap::DashSet;

use crate::domain::asset::{Asset, GasToken, TokenType};
use crate::domain::constants::INDEX_POOL_TOKENS;
use crate::domain::error::WalletError;

/// Synchronous lookup over the application's supported-asset
/// configuration: symbol -> asset and contract address -> symbol.
///
/// Addresses that fail to resolve are remembered so each one is logged
/// only once per registry lifetime.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    by_symbol: HashMap<String, Asset>,
    by_address: HashMap<Address, String>,
    unresolved: DashSet<Address>,
}

impl AssetRegistry {
    pub fn from_assets(assets: Vec<Asset>) -> Self {
        let mut by_symbol = HashMap::new();
        let mut by_address = HashMap::new();
        for asset in assets {
            if let Some(address) = asset.address {
                by_address.insert(address, asset.symbol.clone());
            }
            by_symbol.insert(asset.symbol.to_uppercase(), asset);
        }
        Self {
            by_symbol,
            by_address,
            unresolved: DashSet::new(),
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, WalletError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("Failed to read asset list {path}: {e}")))?;
        let assets: Vec<Asset> = serde_json::from_str(&raw)
            .map_err(|e| WalletError::Config(format!("Invalid asset list JSON {path}: {e}")))?;

        tracing::info!("Loaded {} supported assets from {path}", assets.len());
        Ok(Self::from_assets(assets))
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Asset> {
        self.by_symbol.get(&symbol.to_uppercase())
    }

    /// Contract address of a supported token; `None` for the native asset
    /// or unknown symbols.
    pub fn address_of(&self, symbol: &str) -> Option<Address> {
        self.by_symbol(symbol).and_then(|a| a.address)
    }

    /// Resolve a token symbol by contract address, falling back to the
    /// supplemental index-fund table for tokens we surface but do not
    /// list. `None` means the asset is not supported at all.
    pub fn symbol_by_address(&self, address: Address) -> Option<String> {
        if let Some(symbol) = self.by_address.get(&address) {
            return Some(symbol.clone());
        }
        if let Some((symbol, _)) = INDEX_POOL_TOKENS.get(&address) {
            return Some((*symbol).to_string());
        }
        if self.unresolved.insert(address) {
            tracing::debug!("Unknown token address {address:#x}; record will be skipped");
        }
        None
    }

    /// Gas-token details for a fee paid through the relayer. Only assets
    /// with a known contract address qualify.
    pub fn gas_token_details(&self, address: Address) -> Option<GasToken> {
        let symbol = self.by_address.get(&address)?;
        let asset = self.by_symbol.get(&symbol.to_uppercase())?;
        Some(GasToken {
            symbol: asset.symbol.clone(),
            decimals: asset.decimals,
            address,
        })
    }

    pub fn decimals(&self, symbol: &str) -> Option<u8> {
        self.by_symbol(symbol).map(|a| a.decimals)
    }
}

pub fn token_asset(symbol: &str, address: Address, decimals: u8, chain: u64) -> Asset {
    Asset {
        symbol: symbol.to_string(),
        address: Some(address),
        decimals,
        chain,
        token_type: TokenType::Token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::CHAIN_ETHEREUM;

    fn registry() -> AssetRegistry {
        let dai = token_asset(
            "DAI",
            Address::from([0x6b; 20]),
            18,
            CHAIN_ETHEREUM,
        );
        let usdc = token_asset("USDC", Address::from([0xa0; 20]), 6, CHAIN_ETHEREUM);
        AssetRegistry::from_assets(vec![dai, usdc])
    }

    #[test]
    fn symbol_lookup_is_case_insensitive() {
        let registry = registry();
        assert_eq!(registry.by_symbol("dai").unwrap().decimals, 18);
        assert_eq!(registry.by_symbol("USDC").unwrap().decimals, 6);
    }

    #[test]
    fn address_resolution_falls_back_to_supplemental_table() {
        let registry = registry();
        assert_eq!(
            registry.symbol_by_address(Address::from([0xa0; 20])),
            Some("USDC".to_string())
        );

        let (rspt_address, _) = INDEX_POOL_TOKENS
            .iter()
            .find(|(_, (symbol, _))| *symbol == "RSPT")
            .map(|(a, meta)| (*a, meta))
            .unwrap();
        assert_eq!(
            registry.symbol_by_address(rspt_address),
            Some("RSPT".to_string())
        );

        assert_eq!(registry.symbol_by_address(Address::from([0xee; 20])), None);
    }

    #[test]
    fn gas_token_details_require_listed_address() {
        let registry = registry();
        let details = registry.gas_token_details(Address::from([0xa0; 20])).unwrap();
        assert_eq!(details.symbol, "USDC");
        assert_eq!(details.decimals, 6);
        assert!(registry.gas_token_details(Address::from([0x01; 20])).is_none());
    }
}
