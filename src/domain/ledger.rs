// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw transaction record as returned by the smart-contract-wallet backend.
///
/// The same on-chain transaction may appear as several records that differ
/// only by `index`; reconciliation keeps the highest index per hash.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub hash: B256,
    pub index: u32,
    pub from: LedgerParty,
    pub to: LedgerParty,
    // The backend does not provide createdAt, only updatedAt.
    pub updated_at: DateTime<Utc>,
    pub state: LedgerState,
    pub transaction_type: LedgerRecordType,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub token_address: Option<Address>,
    #[serde(default)]
    pub token_value: U256,
    #[serde(default)]
    pub token_recipient: Option<Address>,
    #[serde(default)]
    pub payment_hash: Option<String>,
    pub gas: LedgerGas,
    #[serde(default)]
    pub gas_token: Option<Address>,
    #[serde(default)]
    pub fee: Option<U256>,
    /// Device address carried by AddDevice records.
    #[serde(default)]
    pub device_address: Option<Address>,
}

/// Sender/recipient details. Nested account structures take precedence
/// over the flat address when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerParty {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub account: Option<LedgerAccount>,
}

impl LedgerParty {
    pub fn resolved_address(&self) -> Option<Address> {
        self.account.as_ref().map(|a| a.address).or(self.address)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccount {
    pub address: Address,
    #[serde(default)]
    pub ens_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerGas {
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub price: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LedgerState {
    Created,
    Queued,
    Sent,
    Completed,
    Failed,
    DroppedOrReplaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LedgerRecordType {
    Erc20Transfer,
    TopUp,
    TopUpErc20Approve,
    Withdrawal,
    Settlement,
    AccountDeployment,
    UpdateAccountEnsName,
    AddDevice,
    RemoveDevice,
    Execution,
}
