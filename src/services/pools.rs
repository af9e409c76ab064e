// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Liquidity-pool statistics and proportional-amount math.
//!
//! Pair reserves and total supply come from the graph indexer; per-account
//! balances (wallet, staked, earned) are read on-chain. The proportional
//! math itself is pure and runs on `BigDecimal`.

use crate::domain::constants::POOL_TOKEN_DECIMALS;
use crate::domain::error::WalletError;
use crate::domain::pool::{LiquidityPool, PoolStats, PoolType};
use crate::infrastructure::network::graph::GraphClient;
use crate::network::provider::ChainClient;
use crate::services::amounts::format_base_units;
use crate::services::contracts::{Erc20Token, Unipool};
use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;

const PAIR_QUERY: &str = "query ($pairId: ID!) { pair(id: $pairId) { \
    totalSupply reserve0 reserve1 token0 { symbol } token1 { symbol } } }";

#[derive(Deserialize)]
struct PairData {
    pair: Option<PairSnapshot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairSnapshot {
    total_supply: String,
    reserve0: String,
    reserve1: String,
    token0: PairToken,
    token1: PairToken,
}

#[derive(Deserialize)]
struct PairToken {
    symbol: String,
}

/// Pool-token amount to burn plus the constituent amounts obtained, all
/// in human units, ordered like `pool.tokens_proportions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProportionalRemoval {
    pub pool_token_amount: BigDecimal,
    pub token_amounts: Vec<BigDecimal>,
}

fn liquidity_of(stats: &PoolStats, symbol: &str) -> BigDecimal {
    stats
        .tokens_liquidity
        .get(symbol)
        .cloned()
        .unwrap_or_else(BigDecimal::zero)
}

/// Maximum amount of one constituent the account can withdraw:
/// `liquidity x user_balance / total_supply`.
pub fn max_withdrawable(stats: &PoolStats, symbol: &str) -> BigDecimal {
    if stats.total_supply.is_zero() {
        return BigDecimal::zero();
    }
    liquidity_of(stats, symbol) * &stats.user_liquidity_token_balance / &stats.total_supply
}

/// Compute a proportional withdrawal.
///
/// With `changed_token = None`, `amount` is the pool-token amount to burn
/// and every constituent follows its pool share. With `changed_token =
/// Some(i)`, `amount` is the target for constituent `i`; the implied
/// pool-token burn is the inverse proportion and the other constituents
/// are recomputed from it so the withdrawal stays proportional.
pub fn proportional_removal(
    pool: &LiquidityPool,
    stats: &PoolStats,
    amount: &BigDecimal,
    changed_token: Option<usize>,
) -> Result<ProportionalRemoval, WalletError> {
    if stats.total_supply.is_zero() {
        return Err(WalletError::invalid_amount(
            amount.to_string(),
            "pool has no supply",
        ));
    }

    let pool_token_amount = match changed_token {
        None => amount.clone(),
        Some(index) => {
            let symbol = pool
                .tokens_proportions
                .get(index)
                .map(|t| t.symbol.as_str())
                .ok_or_else(|| {
                    WalletError::invalid_amount(amount.to_string(), "no such pool token")
                })?;
            let liquidity = liquidity_of(stats, symbol);
            if liquidity.is_zero() {
                return Err(WalletError::invalid_amount(
                    amount.to_string(),
                    format!("pool holds no {symbol}"),
                ));
            }
            amount * &stats.total_supply / liquidity
        }
    };

    let token_amounts = pool
        .tokens_proportions
        .iter()
        .map(|token| {
            liquidity_of(stats, &token.symbol) * &pool_token_amount / &stats.total_supply
        })
        .collect();

    Ok(ProportionalRemoval {
        pool_token_amount,
        token_amounts,
    })
}

/// Withdrawal of the account's entire position. Burns the exact
/// pool-token balance instead of inverting a constituent amount, so
/// boundary rounding cannot leave dust behind.
pub fn full_balance_removal(
    pool: &LiquidityPool,
    stats: &PoolStats,
) -> Result<ProportionalRemoval, WalletError> {
    proportional_removal(pool, stats, &stats.user_liquidity_token_balance, None)
}

fn malformed(what: &str, e: impl std::fmt::Display) -> WalletError {
    WalletError::Connection(format!("{what} returned malformed data: {e}"))
}

/// Pool-token balance sitting in the wallet, in base units.
pub async fn pair_token_balance<C: ChainClient>(
    client: &C,
    pair: Address,
    account: Address,
) -> Result<U256, WalletError> {
    let data = Erc20Token::balanceOfCall { owner: account }.abi_encode();
    let returned = client.call(pair, data.into()).await?;
    Erc20Token::balanceOfCall::abi_decode_returns(&returned)
        .map_err(|e| malformed("pair balanceOf", e))
}

/// Pool-token amount staked in the rewards contract, in base units.
pub async fn staked_amount<C: ChainClient>(
    client: &C,
    unipool: Address,
    account: Address,
) -> Result<U256, WalletError> {
    let data = Unipool::balanceOfCall { account }.abi_encode();
    let returned = client.call(unipool, data.into()).await?;
    Unipool::balanceOfCall::abi_decode_returns(&returned)
        .map_err(|e| malformed("staking balanceOf", e))
}

/// Accrued, unclaimed rewards, in base units of the reward token.
pub async fn earned_amount<C: ChainClient>(
    client: &C,
    unipool: Address,
    account: Address,
) -> Result<U256, WalletError> {
    let data = Unipool::earnedCall { account }.abi_encode();
    let returned = client.call(unipool, data.into()).await?;
    Unipool::earnedCall::abi_decode_returns(&returned)
        .map_err(|e| malformed("staking earned", e))
}

fn graph_decimal(raw: &str, field: &str) -> Result<BigDecimal, WalletError> {
    BigDecimal::from_str(raw)
        .map_err(|e| WalletError::GraphQuery(format!("malformed {field} '{raw}': {e}")))
}

/// Assemble per-account pool statistics: indexed pair data plus on-chain
/// balances. The wallet and staked balances together form the user's
/// liquidity-token position.
pub async fn fetch_pool_stats<C: ChainClient>(
    client: &C,
    graph: &GraphClient,
    pool: &LiquidityPool,
    account: Address,
) -> Result<PoolStats, WalletError> {
    let pair_id = format!("{:#x}", pool.uniswap_pair_address);
    let data: PairData = graph.query(PAIR_QUERY, json!({ "pairId": pair_id })).await?;
    let snapshot = data
        .pair
        .ok_or_else(|| WalletError::GraphQuery(format!("pair {pair_id} is not indexed")))?;

    let total_supply = graph_decimal(&snapshot.total_supply, "totalSupply")?;
    let mut tokens_liquidity = HashMap::new();
    tokens_liquidity.insert(
        snapshot.token0.symbol.clone(),
        graph_decimal(&snapshot.reserve0, "reserve0")?,
    );
    tokens_liquidity.insert(
        snapshot.token1.symbol.clone(),
        graph_decimal(&snapshot.reserve1, "reserve1")?,
    );

    let wallet_units =
        pair_token_balance(client, pool.uniswap_pair_address, account).await?;
    let mut user_balance =
        BigDecimal::from_str(&format_base_units(wallet_units, POOL_TOKEN_DECIMALS))
            .unwrap_or_else(|_| BigDecimal::zero());

    let mut staked = None;
    let mut earned = None;
    if pool.pool_type == PoolType::Unipool
        && let Some(unipool) = pool.unipool_address
    {
        let staked_units = staked_amount(client, unipool, account).await?;
        let earned_units = earned_amount(client, unipool, account).await?;
        let staked_dec =
            BigDecimal::from_str(&format_base_units(staked_units, POOL_TOKEN_DECIMALS))
                .unwrap_or_else(|_| BigDecimal::zero());
        user_balance += &staked_dec;
        staked = Some(staked_dec);
        earned = Some(
            BigDecimal::from_str(&format_base_units(earned_units, POOL_TOKEN_DECIMALS))
                .unwrap_or_else(|_| BigDecimal::zero()),
        );
    }

    Ok(PoolStats {
        total_supply,
        tokens_liquidity,
        user_liquidity_token_balance: user_balance,
        staked_amount: staked,
        earned_amount: earned,
    })
}
