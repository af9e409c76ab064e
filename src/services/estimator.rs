// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Gas and fee estimation for draft transactions.
//!
//! A failed dry-run estimate degrades to `DEFAULT_GAS_LIMIT` instead of
//! failing the flow; fee display may lose accuracy but never blocks.
//! Superseded estimation rounds are detected through a generation counter
//! and their results discarded on arrival (last request wins).

use crate::domain::constants::{DEFAULT_GAS_LIMIT, GAS_MARGIN_DEN, GAS_MARGIN_NUM};
use crate::domain::transaction::{TransactionDraft, TransactionFeeInfo};
use crate::infrastructure::network::relayer::RelayerEstimate;
use crate::network::provider::ChainClient;
use alloy::primitives::{Address, U256};
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle for one estimation round. Tickets from superseded rounds are
/// recognized as stale and their results dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateTicket {
    generation: u64,
}

pub struct FeeEstimator<C: ChainClient> {
    client: C,
    generation: AtomicU64,
}

impl<C: ChainClient> FeeEstimator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Open a new estimation round, invalidating every earlier ticket.
    pub fn begin(&self) -> EstimateTicket {
        EstimateTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub fn is_stale(&self, ticket: &EstimateTicket) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket.generation
    }

    /// Gas limit for one draft: a dry-run estimate with a x1.5 safety
    /// margin, or `DEFAULT_GAS_LIMIT` when the estimate cannot be
    /// obtained.
    pub async fn estimate_gas_limit(&self, from: Address, draft: &TransactionDraft) -> u64 {
        if let Some(limit) = draft.gas_limit {
            return limit;
        }
        match self.client.estimate_gas(from, draft).await {
            Ok(estimate) => estimate
                .saturating_mul(GAS_MARGIN_NUM)
                .div_ceil(GAS_MARGIN_DEN),
            Err(e) => {
                tracing::warn!(error = %e, "Gas estimate failed; using default limit");
                DEFAULT_GAS_LIMIT
            }
        }
    }

    /// Price a whole draft set in the native asset. Independent drafts
    /// are estimated concurrently. Returns `None` when the round was
    /// superseded while in flight.
    pub async fn estimate_drafts(
        &self,
        ticket: &EstimateTicket,
        from: Address,
        drafts: &[TransactionDraft],
    ) -> Option<TransactionFeeInfo> {
        let limits = join_all(
            drafts
                .iter()
                .map(|draft| self.estimate_gas_limit(from, draft)),
        )
        .await;

        if self.is_stale(ticket) {
            tracing::debug!("Estimation round superseded; discarding result");
            return None;
        }

        let gas_price = match drafts.iter().find_map(|d| d.gas_price) {
            Some(price) => price,
            None => match self.client.gas_price().await {
                Ok(price) => price,
                Err(e) => {
                    tracing::warn!(error = %e, "Gas price unavailable; fee stays pending");
                    return Some(TransactionFeeInfo::pending());
                }
            },
        };

        let total_gas: u64 = limits.iter().sum();
        let fee = U256::from(total_gas) * U256::from(gas_price);
        Some(TransactionFeeInfo {
            fee: Some(fee),
            gas_token: None,
        })
    }
}

/// Turn a relayer estimate into the fee surfaced to the UI. The gas-token
/// path is taken only when it was requested AND the relayer actually
/// offered one; otherwise the native cost applies.
pub fn build_fee_info(
    estimate: Option<&RelayerEstimate>,
    use_gas_token: bool,
) -> TransactionFeeInfo {
    let Some(estimate) = estimate else {
        return TransactionFeeInfo::pending();
    };

    if !use_gas_token || estimate.gas_token.is_none() {
        return TransactionFeeInfo {
            fee: Some(estimate.total_cost),
            gas_token: None,
        };
    }

    TransactionFeeInfo {
        fee: estimate.gas_token_cost,
        gas_token: estimate.gas_token.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::GasToken;

    fn relayer_estimate(with_token: bool) -> RelayerEstimate {
        RelayerEstimate {
            gas_amount: U256::from(50_000),
            gas_price: U256::from(2_000_000_000u64),
            total_cost: U256::from(100_000_000_000_000u64),
            gas_token_cost: with_token.then(|| U256::from(420_000)),
            gas_token: with_token.then(|| GasToken {
                symbol: "PLR".to_string(),
                decimals: 18,
                address: Address::from([0xe4; 20]),
            }),
        }
    }

    #[test]
    fn missing_estimate_stays_pending() {
        assert_eq!(build_fee_info(None, true), TransactionFeeInfo::pending());
    }

    #[test]
    fn native_cost_wins_without_gas_token() {
        let estimate = relayer_estimate(false);
        let info = build_fee_info(Some(&estimate), true);
        assert_eq!(info.fee, Some(U256::from(100_000_000_000_000u64)));
        assert!(info.gas_token.is_none());
    }

    #[test]
    fn gas_token_cost_requires_opt_in() {
        let estimate = relayer_estimate(true);

        let info = build_fee_info(Some(&estimate), true);
        assert_eq!(info.fee, Some(U256::from(420_000)));
        assert_eq!(info.gas_token.as_ref().unwrap().symbol, "PLR");

        let info = build_fee_info(Some(&estimate), false);
        assert_eq!(info.fee, Some(U256::from(100_000_000_000_000u64)));
        assert!(info.gas_token.is_none());
    }
}
