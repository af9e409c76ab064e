// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::asset::GasToken;
use alloy::primitives::{Address, B256, Bytes, U256};

/// An unsigned transaction specification, not yet broadcast.
///
/// Immutable once built; if any input changes a new draft must be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub to: Address,
    pub value: U256,
    pub data: Option<Bytes>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub nonce: Option<u64>,
}

impl TransactionDraft {
    pub fn new(to: Address, value: U256, data: Option<Bytes>) -> Self {
        Self {
            to,
            value,
            data,
            gas_limit: None,
            gas_price: None,
            nonce: None,
        }
    }

    pub fn call(to: Address, data: Bytes) -> Self {
        Self::new(to, U256::ZERO, Some(data))
    }
}

/// Fee surfaced to the confirmation screen. `fee` stays `None` while an
/// estimate is pending or has failed irrecoverably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFeeInfo {
    pub fee: Option<U256>,
    pub gas_token: Option<GasToken>,
}

impl TransactionFeeInfo {
    pub fn pending() -> Self {
        Self::default()
    }

    /// Symbol of the asset this fee is paid in, `native_symbol` unless a
    /// gas token was selected.
    pub fn fee_symbol<'a>(&'a self, native_symbol: &'a str) -> &'a str {
        self.gas_token
            .as_ref()
            .map(|t| t.symbol.as_str())
            .unwrap_or(native_symbol)
    }

    pub fn fee_decimals(&self, native_decimals: u8) -> u8 {
        self.gas_token
            .as_ref()
            .map(|t| t.decimals)
            .unwrap_or(native_decimals)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
    TimedOut,
}

/// Semantic tag attached to ledger entries that are not plain transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionTag {
    Settlement,
    Withdrawal,
    TopUp,
    AccountDeployment,
    EnsUpdate,
    DeviceAdded,
    DeviceRemoved,
    GasTokenRelayerSwitch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementLeg {
    pub symbol: String,
    pub value: U256,
    pub payment_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionExtra {
    Settlement(Vec<SettlementLeg>),
    Withdrawal { payment_hash: Option<String> },
    EnsName { ens_name: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeWithGasToken {
    pub fee: U256,
    pub gas_token: GasToken,
}

/// A reconciled history entry in the wallet's canonical transaction model.
///
/// Built once per raw record group; re-ingestion of the same raw inputs
/// recomputes an identical entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTransaction {
    pub hash: B256,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub asset: String,
    pub status: TransactionStatus,
    pub created_at: i64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub tag: Option<TransactionTag>,
    pub extra: Option<TransactionExtra>,
    pub fee_with_gas_token: Option<FeeWithGasToken>,
}
