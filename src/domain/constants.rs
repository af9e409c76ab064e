// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, address};
use lazy_static::lazy_static;
use std::collections::HashMap;

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_ETHEREUM: u64 = 1;
pub const CHAIN_OPTIMISM: u64 = 10;
pub const CHAIN_BSC: u64 = 56;
pub const CHAIN_POLYGON: u64 = 137;
pub const CHAIN_ARBITRUM: u64 = 42161;

pub fn native_symbol_for_chain(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_BSC => "BNB",
        CHAIN_POLYGON => "MATIC",
        _ => "ETH", // Mainnet and the ETH-denominated rollups
    }
}

/// Decimals of every supported chain's native asset.
pub const NATIVE_DECIMALS: u8 = 18;

// =============================================================================
// GAS & TRANSACTION CONSTANTS
// =============================================================================

/// Fallback gas limit used whenever a dry-run estimate cannot be obtained.
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;

/// Safety margin applied on top of a successful dry-run estimate (x1.5).
pub const GAS_MARGIN_NUM: u64 = 3;
pub const GAS_MARGIN_DEN: u64 = 2;

// =============================================================================
// LIQUIDITY POOL CONSTANTS
// =============================================================================

/// Uniswap V2-compatible pair tokens always carry 18 decimals.
pub const POOL_TOKEN_DECIMALS: u8 = 18;

pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;
pub const SWAP_DEADLINE_SECS: u64 = 3600;

pub const UNISWAP_V2_ROUTER_MAINNET: Address =
    address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

pub fn pair_router_for_chain(chain_id: u64) -> Option<Address> {
    match chain_id {
        CHAIN_ETHEREUM => Some(UNISWAP_V2_ROUTER_MAINNET),
        _ => None,
    }
}

// =============================================================================
// SUPPLEMENTAL TOKEN TABLE
// =============================================================================

lazy_static! {
    /// Index-fund pool tokens that are not part of the supported-asset list
    /// yet, but whose ledger events we still want to surface by symbol.
    pub static ref INDEX_POOL_TOKENS: HashMap<Address, (&'static str, u8)> = {
        let mut m = HashMap::new();
        m.insert(
            address!("016bf078abcacb987f0589a6d3beadd4316922b0"),
            ("RSPT", 18),
        );
        m.insert(
            address!("3baa6b7af0d72006d3ea770ca29100eb848559ae"),
            ("RYPT", 18),
        );
        m.insert(
            address!("cda4770d65b4211364cb870ad6be19e7ef1d65f4"),
            ("REPT", 18),
        );
        m
    };
}
