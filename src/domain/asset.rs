// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Token,
    Collectible,
}

impl Default for TokenType {
    fn default() -> Self {
        TokenType::Token
    }
}

/// Immutable reference data for one supported asset. `decimals` governs
/// fixed-point parsing precision for every amount of this asset.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub symbol: String,
    #[serde(default)]
    pub address: Option<Address>,
    pub decimals: u8,
    pub chain: u64,
    #[serde(default)]
    pub token_type: TokenType,
}

impl Asset {
    pub fn is_native(&self, native_symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(native_symbol)
    }
}

/// Alternate asset used to pay network fees through the relayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasToken {
    pub symbol: String,
    pub decimals: u8,
    pub address: Address,
}

/// Wallet balances keyed by asset symbol; values are decimal strings in
/// human units.
pub type WalletBalances = HashMap<String, String>;

/// Fiat rates per asset symbol: symbol -> (currency -> rate).
pub type RatesBySymbol = HashMap<String, HashMap<String, f64>>;

pub fn addresses_equal(a: Option<Address>, b: Option<Address>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
