// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Ledger reconciliation: raw smart-contract-wallet records into the
//! canonical transaction model.
//!
//! A pure fold over the input slice. Records that cannot be mapped to a
//! known asset are skipped, never erroring the whole batch; everything
//! else is a total function of well-formed input. Re-running over the
//! same records yields an identical list.

use crate::domain::asset::addresses_equal;
use crate::domain::ledger::{LedgerRecord, LedgerRecordType, LedgerState};
use crate::domain::transaction::{
    CanonicalTransaction, FeeWithGasToken, SettlementLeg, TransactionExtra, TransactionStatus,
    TransactionTag,
};
use crate::infrastructure::data::assets::AssetRegistry;
use alloy::primitives::{Address, B256, U256};
use std::collections::HashMap;

pub fn parse_record_status(state: LedgerState) -> TransactionStatus {
    match state {
        LedgerState::Completed => TransactionStatus::Confirmed,
        LedgerState::Failed => TransactionStatus::Failed,
        LedgerState::DroppedOrReplaced => TransactionStatus::TimedOut,
        LedgerState::Created | LedgerState::Queued | LedgerState::Sent => {
            TransactionStatus::Pending
        }
    }
}

/// Reconcile raw wallet-backend records into canonical transactions.
///
/// The same on-chain transaction can surface as several records differing
/// by `index`; exactly one canonical entry survives per hash, built from
/// the record with the highest index. Settlement records aggregate every
/// record of their hash group into a per-leg breakdown.
pub fn reconcile_ledger(
    records: &[LedgerRecord],
    registry: &AssetRegistry,
    native_symbol: &str,
    relayer_extension: Option<Address>,
) -> Vec<CanonicalTransaction> {
    let mut max_index: HashMap<B256, u32> = HashMap::new();
    for record in records {
        max_index
            .entry(record.hash)
            .and_modify(|current| *current = (*current).max(record.index))
            .or_insert(record.index);
    }

    records
        .iter()
        .filter(|record| max_index.get(&record.hash) == Some(&record.index))
        .filter_map(|record| {
            build_canonical(record, records, registry, native_symbol, relayer_extension)
        })
        .collect()
}

fn resolve_leg_symbol(
    registry: &AssetRegistry,
    token_address: Option<Address>,
    native_symbol: &str,
) -> Option<String> {
    match token_address {
        None => Some(native_symbol.to_string()),
        Some(address) => registry.symbol_by_address(address),
    }
}

fn build_canonical(
    record: &LedgerRecord,
    all_records: &[LedgerRecord],
    registry: &AssetRegistry,
    native_symbol: &str,
    relayer_extension: Option<Address>,
) -> Option<CanonicalTransaction> {
    // Internal approval steps have no user-facing meaning.
    if record.transaction_type == LedgerRecordType::TopUpErc20Approve {
        return None;
    }

    let from = record.from.resolved_address().unwrap_or(Address::ZERO);
    let to = if record.transaction_type == LedgerRecordType::Erc20Transfer {
        record.token_recipient.unwrap_or(Address::ZERO)
    } else {
        record.to.resolved_address().unwrap_or(Address::ZERO)
    };

    let mut value = if record.token_address.is_some() {
        record.token_value
    } else {
        record.value
    };

    // Unknown token: skip the record, the asset is not supported yet.
    let asset = resolve_leg_symbol(registry, record.token_address, native_symbol)?;

    let mut tag = None;
    let mut extra = None;

    match record.transaction_type {
        LedgerRecordType::Settlement => {
            let legs: Vec<SettlementLeg> = all_records
                .iter()
                .filter(|other| other.hash == record.hash)
                .map(|other| SettlementLeg {
                    symbol: resolve_leg_symbol(registry, other.token_address, native_symbol)
                        .unwrap_or_else(|| native_symbol.to_string()),
                    value: other.token_value,
                    payment_hash: other.payment_hash.clone(),
                })
                .collect();
            value = U256::ZERO;
            tag = Some(TransactionTag::Settlement);
            extra = Some(TransactionExtra::Settlement(legs));
        }
        LedgerRecordType::Withdrawal => {
            tag = Some(TransactionTag::Withdrawal);
            extra = Some(TransactionExtra::Withdrawal {
                payment_hash: record.payment_hash.clone(),
            });
        }
        LedgerRecordType::TopUp => {
            tag = Some(TransactionTag::TopUp);
        }
        LedgerRecordType::AccountDeployment => {
            tag = Some(TransactionTag::AccountDeployment);
        }
        LedgerRecordType::UpdateAccountEnsName => {
            tag = Some(TransactionTag::EnsUpdate);
            extra = Some(TransactionExtra::EnsName {
                ens_name: record
                    .from
                    .account
                    .as_ref()
                    .and_then(|account| account.ens_name.clone()),
            });
        }
        LedgerRecordType::AddDevice => {
            // Adding the relayer extension as a device is how the account
            // switches to gas-token fee payment.
            if let Some(device) = record.device_address {
                tag = if addresses_equal(Some(device), relayer_extension) {
                    Some(TransactionTag::GasTokenRelayerSwitch)
                } else {
                    Some(TransactionTag::DeviceAdded)
                };
            }
        }
        LedgerRecordType::RemoveDevice => {
            tag = Some(TransactionTag::DeviceRemoved);
        }
        LedgerRecordType::Erc20Transfer
        | LedgerRecordType::TopUpErc20Approve
        | LedgerRecordType::Execution => {}
    }

    let fee_with_gas_token = parse_fee_with_gas_token(record, registry);

    Some(CanonicalTransaction {
        hash: record.hash,
        from,
        to,
        value,
        asset,
        status: parse_record_status(record.state),
        created_at: record.updated_at.timestamp(),
        gas_price: record.gas.price,
        gas_limit: record.gas.used,
        tag,
        extra,
        fee_with_gas_token,
    })
}

fn parse_fee_with_gas_token(
    record: &LedgerRecord,
    registry: &AssetRegistry,
) -> Option<FeeWithGasToken> {
    let gas_token_address = record.gas_token?;
    let fee = record.fee?;
    let gas_token = registry.gas_token_details(gas_token_address)?;
    Some(FeeWithGasToken { fee, gas_token })
}

/// Whether a canonical transaction's extra data references the given
/// payment-network hash. Used by callers to hide unsettled entries whose
/// settlement is already pending.
pub fn extra_contains_payment_hash(payment_hash: &str, extra: &TransactionExtra) -> bool {
    match extra {
        TransactionExtra::Settlement(legs) => legs.iter().any(|leg| {
            leg.payment_hash
                .as_deref()
                .is_some_and(|hash| hash.eq_ignore_ascii_case(payment_hash))
        }),
        TransactionExtra::Withdrawal { payment_hash: own } => own
            .as_deref()
            .is_some_and(|hash| hash.eq_ignore_ascii_case(payment_hash)),
        TransactionExtra::EnsName { .. } => false,
    }
}

/// A payment is hidden while the settlement or withdrawal covering it is
/// still pending, so the feed does not show both the leg and its batch.
pub fn is_hidden_unsettled_transaction(
    payment_hash: &str,
    history: &[CanonicalTransaction],
) -> bool {
    history
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Pending)
        .filter(|tx| {
            matches!(
                tx.tag,
                Some(TransactionTag::Withdrawal | TransactionTag::Settlement)
            )
        })
        .any(|tx| {
            tx.extra
                .as_ref()
                .is_some_and(|extra| extra_contains_payment_hash(payment_hash, extra))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{LedgerAccount, LedgerGas, LedgerParty};
    use chrono::Utc;

    fn record(hash: u8, index: u32, transaction_type: LedgerRecordType) -> LedgerRecord {
        LedgerRecord {
            hash: B256::from([hash; 32]),
            index,
            from: LedgerParty::default(),
            to: LedgerParty::default(),
            updated_at: Utc::now(),
            state: LedgerState::Completed,
            transaction_type,
            value: U256::from(1),
            token_address: None,
            token_value: U256::ZERO,
            token_recipient: None,
            payment_hash: None,
            gas: LedgerGas {
                used: 21_000,
                price: 1_000_000_000,
            },
            gas_token: None,
            fee: None,
            device_address: None,
        }
    }

    #[test]
    fn statuses_map_to_wallet_vocabulary() {
        assert_eq!(
            parse_record_status(LedgerState::Completed),
            TransactionStatus::Confirmed
        );
        assert_eq!(
            parse_record_status(LedgerState::DroppedOrReplaced),
            TransactionStatus::TimedOut
        );
        assert_eq!(
            parse_record_status(LedgerState::Sent),
            TransactionStatus::Pending
        );
    }

    #[test]
    fn nested_account_address_wins_over_flat_field() {
        let flat = Address::from([0x01; 20]);
        let nested = Address::from([0x02; 20]);
        let party = LedgerParty {
            address: Some(flat),
            account: Some(LedgerAccount {
                address: nested,
                ens_name: None,
            }),
        };
        assert_eq!(party.resolved_address(), Some(nested));
    }

    #[test]
    fn settlement_extra_matches_leg_hashes_case_insensitively() {
        let extra = TransactionExtra::Settlement(vec![SettlementLeg {
            symbol: "ETH".to_string(),
            value: U256::from(5),
            payment_hash: Some("0xABCD".to_string()),
        }]);
        assert!(extra_contains_payment_hash("0xabcd", &extra));
        assert!(!extra_contains_payment_hash("0xeeee", &extra));
    }

    #[test]
    fn pending_settlements_hide_their_legs() {
        let registry = AssetRegistry::from_assets(vec![]);
        let mut settlement = record(2, 0, LedgerRecordType::Settlement);
        settlement.state = LedgerState::Sent;
        settlement.payment_hash = Some("0xleg1".to_string());

        let history = reconcile_ledger(&[settlement], &registry, "ETH", None);
        assert!(is_hidden_unsettled_transaction("0xLEG1", &history));
        assert!(!is_hidden_unsettled_transaction("0xother", &history));
    }

    #[test]
    fn approval_steps_never_surface() {
        let registry = AssetRegistry::from_assets(vec![]);
        let records = vec![record(1, 0, LedgerRecordType::TopUpErc20Approve)];
        assert!(reconcile_ledger(&records, &registry, "ETH", None).is_empty());
    }
}
