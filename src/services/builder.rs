// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Draft assembly for every supported action family.
//!
//! Each intent variant has exactly one handler; the dispatch is
//! exhaustive so adding a variant without a builder fails to compile.
//! Handlers validate inputs, scale amounts to base units, encode
//! calldata, and return the draft sequence in execution order (approvals
//! first). A failed build yields an error and no partial drafts.

use crate::domain::asset::Asset;
use crate::domain::constants::{
    NATIVE_DECIMALS, POOL_TOKEN_DECIMALS, SWAP_DEADLINE_SECS, native_symbol_for_chain,
    pair_router_for_chain,
};
use crate::domain::error::WalletError;
use crate::domain::pool::LiquidityPool;
use crate::domain::transaction::{TransactionDraft, TransactionFeeInfo};
use crate::infrastructure::data::assets::AssetRegistry;
use crate::network::provider::ChainClient;
use crate::services::amounts::parse_base_units;
use crate::services::contracts::{Erc20Token, PairRouter, Unipool};
use crate::services::encoder::{CollectibleTransfer, build_erc721_transfer_data, encode_transfer_call};
use crate::services::estimator::FeeEstimator;
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use std::time::{SystemTime, UNIX_EPOCH};

/// User intent, one variant per action family.
#[derive(Debug, Clone)]
pub enum ActionIntent {
    NativeTransfer {
        to: Address,
        amount: String,
        data: Option<Bytes>,
    },
    TokenTransfer {
        symbol: String,
        to: Address,
        amount: String,
    },
    CollectibleTransfer(CollectibleTransfer),
    AddLiquidity {
        pool: LiquidityPool,
        token_amounts: Vec<String>,
    },
    RemoveLiquidity {
        pool: LiquidityPool,
        pool_token_amount: String,
        obtained_amounts: Vec<String>,
    },
    Stake {
        pool: LiquidityPool,
        amount: String,
    },
    Unstake {
        pool: LiquidityPool,
        amount: String,
    },
    ClaimRewards {
        pool: LiquidityPool,
    },
}

fn current_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A resolved pool constituent: the native asset, or a token with its
/// contract address.
enum Constituent {
    Native { amount: U256 },
    Token { address: Address, amount: U256 },
}

pub struct DraftBuilder<'a> {
    registry: &'a AssetRegistry,
    chain_id: u64,
    native_symbol: &'static str,
    router: Option<Address>,
    slippage_bps: u64,
}

impl<'a> DraftBuilder<'a> {
    pub fn new(registry: &'a AssetRegistry, chain_id: u64) -> Self {
        Self {
            registry,
            chain_id,
            native_symbol: native_symbol_for_chain(chain_id),
            router: pair_router_for_chain(chain_id),
            slippage_bps: crate::domain::constants::DEFAULT_SLIPPAGE_BPS,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u64) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    pub async fn build<C: ChainClient>(
        &self,
        client: &C,
        account: Address,
        intent: &ActionIntent,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        match intent {
            ActionIntent::NativeTransfer { to, amount, data } => {
                self.build_native_transfer(*to, amount, data.clone())
            }
            ActionIntent::TokenTransfer { symbol, to, amount } => {
                self.build_token_transfer(symbol, *to, amount)
            }
            ActionIntent::CollectibleTransfer(transfer) => {
                self.build_collectible_transfer(client, transfer).await
            }
            ActionIntent::AddLiquidity {
                pool,
                token_amounts,
            } => self.build_add_liquidity(account, pool, token_amounts),
            ActionIntent::RemoveLiquidity {
                pool,
                pool_token_amount,
                obtained_amounts,
            } => self.build_remove_liquidity(account, pool, pool_token_amount, obtained_amounts),
            ActionIntent::Stake { pool, amount } => self.build_stake(pool, amount),
            ActionIntent::Unstake { pool, amount } => self.build_unstake(pool, amount),
            ActionIntent::ClaimRewards { pool } => self.build_claim_rewards(pool),
        }
    }

    fn build_native_transfer(
        &self,
        to: Address,
        amount: &str,
        data: Option<Bytes>,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        if to.is_zero() {
            return Err(WalletError::InvalidAddress(format!("{to:#x}")));
        }
        let value = parse_base_units(amount, NATIVE_DECIMALS)?;
        Ok(vec![TransactionDraft::new(to, value, data)])
    }

    fn build_token_transfer(
        &self,
        symbol: &str,
        to: Address,
        amount: &str,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        if to.is_zero() {
            return Err(WalletError::InvalidAddress(format!("{to:#x}")));
        }
        let asset = self.resolve_token(symbol)?;
        let contract = asset
            .address
            .ok_or_else(|| WalletError::UnsupportedAsset(symbol.to_string()))?;
        let value = parse_base_units(amount, asset.decimals)?;
        let data = encode_transfer_call(to, value);
        Ok(vec![TransactionDraft::call(contract, data)])
    }

    async fn build_collectible_transfer<C: ChainClient>(
        &self,
        client: &C,
        transfer: &CollectibleTransfer,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        let data = build_erc721_transfer_data(client, transfer).await?;
        Ok(vec![TransactionDraft::call(
            transfer.contract_address,
            data,
        )])
    }

    fn build_add_liquidity(
        &self,
        account: Address,
        pool: &LiquidityPool,
        token_amounts: &[String],
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        let router = self.router()?;
        let constituents = self.resolve_constituents(pool, token_amounts)?;
        let deadline = self.deadline();

        let mut drafts = Vec::new();
        for constituent in &constituents {
            if let Constituent::Token { address, amount } = constituent {
                drafts.push(approve_draft(*address, router, *amount));
            }
        }

        match (&constituents[0], &constituents[1]) {
            (Constituent::Token { address, amount }, Constituent::Native { amount: eth })
            | (Constituent::Native { amount: eth }, Constituent::Token { address, amount }) => {
                let call = PairRouter::addLiquidityETHCall {
                    token: *address,
                    amountTokenDesired: *amount,
                    amountTokenMin: self.min_after_slippage(*amount),
                    amountETHMin: self.min_after_slippage(*eth),
                    to: account,
                    deadline,
                };
                drafts.push(TransactionDraft::new(
                    router,
                    *eth,
                    Some(call.abi_encode().into()),
                ));
            }
            (
                Constituent::Token {
                    address: token_a,
                    amount: amount_a,
                },
                Constituent::Token {
                    address: token_b,
                    amount: amount_b,
                },
            ) => {
                let call = PairRouter::addLiquidityCall {
                    tokenA: *token_a,
                    tokenB: *token_b,
                    amountADesired: *amount_a,
                    amountBDesired: *amount_b,
                    amountAMin: self.min_after_slippage(*amount_a),
                    amountBMin: self.min_after_slippage(*amount_b),
                    to: account,
                    deadline,
                };
                drafts.push(TransactionDraft::call(router, call.abi_encode().into()));
            }
            (Constituent::Native { .. }, Constituent::Native { .. }) => {
                return Err(WalletError::Encoding(
                    "pool cannot hold the native asset twice".to_string(),
                ));
            }
        }

        Ok(drafts)
    }

    fn build_remove_liquidity(
        &self,
        account: Address,
        pool: &LiquidityPool,
        pool_token_amount: &str,
        obtained_amounts: &[String],
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        let router = self.router()?;
        let liquidity = parse_base_units(pool_token_amount, POOL_TOKEN_DECIMALS)?;
        let constituents = self.resolve_constituents(pool, obtained_amounts)?;
        let deadline = self.deadline();

        // The router pulls the pair tokens being burned.
        let mut drafts = vec![approve_draft(
            pool.uniswap_pair_address,
            router,
            liquidity,
        )];

        match (&constituents[0], &constituents[1]) {
            (Constituent::Token { address, amount }, Constituent::Native { amount: eth })
            | (Constituent::Native { amount: eth }, Constituent::Token { address, amount }) => {
                let call = PairRouter::removeLiquidityETHCall {
                    token: *address,
                    liquidity,
                    amountTokenMin: self.min_after_slippage(*amount),
                    amountETHMin: self.min_after_slippage(*eth),
                    to: account,
                    deadline,
                };
                drafts.push(TransactionDraft::call(router, call.abi_encode().into()));
            }
            (
                Constituent::Token {
                    address: token_a,
                    amount: amount_a,
                },
                Constituent::Token {
                    address: token_b,
                    amount: amount_b,
                },
            ) => {
                let call = PairRouter::removeLiquidityCall {
                    tokenA: *token_a,
                    tokenB: *token_b,
                    liquidity,
                    amountAMin: self.min_after_slippage(*amount_a),
                    amountBMin: self.min_after_slippage(*amount_b),
                    to: account,
                    deadline,
                };
                drafts.push(TransactionDraft::call(router, call.abi_encode().into()));
            }
            (Constituent::Native { .. }, Constituent::Native { .. }) => {
                return Err(WalletError::Encoding(
                    "pool cannot hold the native asset twice".to_string(),
                ));
            }
        }

        Ok(drafts)
    }

    fn build_stake(
        &self,
        pool: &LiquidityPool,
        amount: &str,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        let unipool = staking_contract(pool)?;
        let value = parse_base_units(amount, POOL_TOKEN_DECIMALS)?;

        let stake = Unipool::stakeCall { amount: value };
        Ok(vec![
            approve_draft(pool.uniswap_pair_address, unipool, value),
            TransactionDraft::call(unipool, stake.abi_encode().into()),
        ])
    }

    fn build_unstake(
        &self,
        pool: &LiquidityPool,
        amount: &str,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        let unipool = staking_contract(pool)?;
        let value = parse_base_units(amount, POOL_TOKEN_DECIMALS)?;
        let call = Unipool::withdrawCall { amount: value };
        Ok(vec![TransactionDraft::call(
            unipool,
            call.abi_encode().into(),
        )])
    }

    fn build_claim_rewards(
        &self,
        pool: &LiquidityPool,
    ) -> Result<Vec<TransactionDraft>, WalletError> {
        let unipool = staking_contract(pool)?;
        let call = Unipool::getRewardCall {};
        Ok(vec![TransactionDraft::call(
            unipool,
            call.abi_encode().into(),
        )])
    }

    fn resolve_token(&self, symbol: &str) -> Result<&Asset, WalletError> {
        self.registry
            .by_symbol(symbol)
            .ok_or_else(|| WalletError::UnsupportedAsset(symbol.to_string()))
    }

    fn resolve_constituents(
        &self,
        pool: &LiquidityPool,
        amounts: &[String],
    ) -> Result<Vec<Constituent>, WalletError> {
        if pool.tokens_proportions.len() != 2 {
            return Err(WalletError::Encoding(format!(
                "pool {} must hold exactly two tokens",
                pool.name
            )));
        }
        if amounts.len() != pool.tokens_proportions.len() {
            return Err(WalletError::Encoding(format!(
                "pool {} expects {} amounts, got {}",
                pool.name,
                pool.tokens_proportions.len(),
                amounts.len()
            )));
        }

        pool.tokens_proportions
            .iter()
            .zip(amounts)
            .map(|(token, amount)| {
                if token.symbol == self.native_symbol {
                    Ok(Constituent::Native {
                        amount: parse_base_units(amount, NATIVE_DECIMALS)?,
                    })
                } else {
                    let asset = self.resolve_token(&token.symbol)?;
                    let address = asset
                        .address
                        .ok_or_else(|| WalletError::UnsupportedAsset(token.symbol.clone()))?;
                    Ok(Constituent::Token {
                        address,
                        amount: parse_base_units(amount, asset.decimals)?,
                    })
                }
            })
            .collect()
    }

    fn router(&self) -> Result<Address, WalletError> {
        self.router.ok_or_else(|| {
            WalletError::Config(format!(
                "no pair router configured for chain {}",
                self.chain_id
            ))
        })
    }

    fn min_after_slippage(&self, amount: U256) -> U256 {
        let keep_bps = 10_000u64.saturating_sub(self.slippage_bps);
        amount.saturating_mul(U256::from(keep_bps)) / U256::from(10_000u64)
    }

    fn deadline(&self) -> U256 {
        U256::from(current_unix().saturating_add(SWAP_DEADLINE_SECS))
    }
}

fn staking_contract(pool: &LiquidityPool) -> Result<Address, WalletError> {
    pool.unipool_address.ok_or_else(|| {
        WalletError::Encoding(format!("pool {} has no staking contract", pool.name))
    })
}

fn approve_draft(token: Address, spender: Address, value: U256) -> TransactionDraft {
    let call = Erc20Token::approveCall { spender, value };
    TransactionDraft::call(token, call.abi_encode().into())
}

/// Build the draft set for an intent and immediately price it. A build
/// failure clears the estimation round, so no stale fee survives a
/// failed draft.
pub async fn build_with_estimate<C: ChainClient>(
    builder: &DraftBuilder<'_>,
    estimator: &FeeEstimator<C>,
    account: Address,
    intent: &ActionIntent,
) -> Result<(Vec<TransactionDraft>, TransactionFeeInfo), WalletError> {
    let ticket = estimator.begin();
    let drafts = builder.build(estimator.client(), account, intent).await?;
    let fee_info = estimator
        .estimate_drafts(&ticket, account, &drafts)
        .await
        .unwrap_or_else(TransactionFeeInfo::pending);
    Ok((drafts, fee_info))
}
