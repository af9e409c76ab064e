// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PoolType {
    /// Pair with an attached staking (rewards) contract.
    Unipool,
    /// Plain pair, no staking.
    Standard,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProportion {
    pub symbol: String,
    pub proportion: f64,
}

/// Static configuration describing a pool's contracts and constituent
/// tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityPool {
    pub name: String,
    #[serde(rename = "type")]
    pub pool_type: PoolType,
    pub uniswap_pair_address: Address,
    #[serde(default)]
    pub unipool_address: Option<Address>,
    pub tokens_proportions: Vec<TokenProportion>,
}

impl LiquidityPool {
    pub fn token_symbols(&self) -> impl Iterator<Item = &str> {
        self.tokens_proportions.iter().map(|t| t.symbol.as_str())
    }
}

/// Per-pool, per-account derived figures, recomputed from fetched data.
/// Amounts are human-unit decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub total_supply: BigDecimal,
    pub tokens_liquidity: HashMap<String, BigDecimal>,
    /// Wallet balance plus staked balance of the pool token.
    pub user_liquidity_token_balance: BigDecimal,
    pub staked_amount: Option<BigDecimal>,
    pub earned_amount: Option<BigDecimal>,
}
