// SPDX-License-Identifier: MIT
// Exercises the send pipeline end to end without a running chain: draft
// construction, collectible method selection, and the gas-estimation
// fallback behavior, all against an in-memory provider fake.

use alloy::primitives::{Address, B256, Bytes, U256};
use lumen_wallet::core::builder::{ActionIntent, DraftBuilder, build_with_estimate};
use lumen_wallet::core::encoder::CollectibleTransfer;
use lumen_wallet::core::estimator::FeeEstimator;
use lumen_wallet::data::assets::{AssetRegistry, token_asset};
use lumen_wallet::domain::constants::{CHAIN_ETHEREUM, DEFAULT_GAS_LIMIT};
use lumen_wallet::domain::error::WalletError;
use lumen_wallet::domain::transaction::TransactionDraft;
use lumen_wallet::network::provider::{ChainClient, OnchainTransaction};
use std::collections::HashMap;

const GWEI: u128 = 1_000_000_000;

#[derive(Default, Clone)]
struct FakeClient {
    code: HashMap<Address, Bytes>,
    gas_estimate: Option<u64>,
    gas_price: u128,
}

impl ChainClient for FakeClient {
    async fn get_code(&self, address: Address) -> Result<Bytes, WalletError> {
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, WalletError> {
        Ok(U256::ZERO)
    }

    async fn estimate_gas(
        &self,
        _from: Address,
        _draft: &TransactionDraft,
    ) -> Result<u64, WalletError> {
        self.gas_estimate
            .ok_or_else(|| WalletError::Estimation("node rejected the call".to_string()))
    }

    async fn gas_price(&self) -> Result<u128, WalletError> {
        Ok(self.gas_price)
    }

    async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes, WalletError> {
        Ok(Bytes::default())
    }

    async fn get_transaction(
        &self,
        _hash: B256,
    ) -> Result<Option<OnchainTransaction>, WalletError> {
        Ok(None)
    }

    async fn send_raw_transaction(&self, _raw: Bytes) -> Result<B256, WalletError> {
        Ok(B256::ZERO)
    }
}

fn dai_registry() -> (AssetRegistry, Address) {
    let dai = Address::from([0x6b; 20]);
    let registry = AssetRegistry::from_assets(vec![token_asset("DAI", dai, 18, CHAIN_ETHEREUM)]);
    (registry, dai)
}

#[tokio::test]
async fn token_transfer_draft_targets_the_contract() {
    let (registry, dai) = dai_registry();
    let builder = DraftBuilder::new(&registry, CHAIN_ETHEREUM);
    let client = FakeClient::default();
    let recipient = Address::from([0x42; 20]);

    let drafts = builder
        .build(
            &client,
            Address::from([0x01; 20]),
            &ActionIntent::TokenTransfer {
                symbol: "DAI".to_string(),
                to: recipient,
                amount: "2.5".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].to, dai);
    assert_eq!(drafts[0].value, U256::ZERO);
    let data = drafts[0].data.as_ref().unwrap();
    assert_eq!(hex::encode(&data[..4]), "a9059cbb");
}

#[tokio::test]
async fn unknown_token_is_a_typed_failure() {
    let (registry, _) = dai_registry();
    let builder = DraftBuilder::new(&registry, CHAIN_ETHEREUM);
    let client = FakeClient::default();

    let result = builder
        .build(
            &client,
            Address::from([0x01; 20]),
            &ActionIntent::TokenTransfer {
                symbol: "NOPE".to_string(),
                to: Address::from([0x42; 20]),
                amount: "1".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(WalletError::UnsupportedAsset(_))));
}

#[tokio::test]
async fn collectible_method_follows_receiver_bytecode() {
    let (registry, _) = dai_registry();
    let builder = DraftBuilder::new(&registry, CHAIN_ETHEREUM);
    let collection = Address::from([0xcc; 20]);
    let plain_receiver = Address::from([0x42; 20]);
    let contract_receiver = Address::from([0x43; 20]);

    // Plain address, no code at all: fall back to transferFrom.
    let client = FakeClient::default();
    let intent = ActionIntent::CollectibleTransfer(CollectibleTransfer {
        contract_address: collection,
        from: Address::from([0x01; 20]),
        to: plain_receiver,
        token_id: U256::from(7),
    });
    let drafts = builder
        .build(&client, Address::from([0x01; 20]), &intent)
        .await
        .unwrap();
    assert_eq!(drafts[0].to, collection);
    let data = drafts[0].data.as_ref().unwrap();
    assert_eq!(hex::encode(&data[..4]), "23b872dd"); // transferFrom

    // Contract receiver whose code carries the legacy transfer selector.
    let mut client = FakeClient::default();
    client.code.insert(
        contract_receiver,
        Bytes::from(hex::decode("6080a9059cbb5b").unwrap()),
    );
    let intent = ActionIntent::CollectibleTransfer(CollectibleTransfer {
        contract_address: collection,
        from: Address::from([0x01; 20]),
        to: contract_receiver,
        token_id: U256::from(7),
    });
    let drafts = builder
        .build(&client, Address::from([0x01; 20]), &intent)
        .await
        .unwrap();
    let data = drafts[0].data.as_ref().unwrap();
    assert_eq!(hex::encode(&data[..4]), "a9059cbb"); // legacy transfer
}

#[tokio::test]
async fn failed_dry_run_degrades_to_default_gas_limit() {
    let client = FakeClient {
        gas_estimate: None,
        gas_price: GWEI,
        ..Default::default()
    };
    let estimator = FeeEstimator::new(client);
    let draft = TransactionDraft::new(Address::from([0x42; 20]), U256::from(1), None);

    let limit = estimator
        .estimate_gas_limit(Address::from([0x01; 20]), &draft)
        .await;
    assert_eq!(limit, DEFAULT_GAS_LIMIT);
}

#[tokio::test]
async fn successful_estimate_gets_a_safety_margin() {
    let client = FakeClient {
        gas_estimate: Some(100_000),
        gas_price: GWEI,
        ..Default::default()
    };
    let estimator = FeeEstimator::new(client);
    let draft = TransactionDraft::new(Address::from([0x42; 20]), U256::from(1), None);

    let limit = estimator
        .estimate_gas_limit(Address::from([0x01; 20]), &draft)
        .await;
    assert_eq!(limit, 150_000);
}

#[tokio::test]
async fn superseded_estimation_round_is_discarded() {
    let client = FakeClient {
        gas_estimate: Some(21_000),
        gas_price: GWEI,
        ..Default::default()
    };
    let estimator = FeeEstimator::new(client);
    let draft = TransactionDraft::new(Address::from([0x42; 20]), U256::from(1), None);

    let stale_ticket = estimator.begin();
    let _fresh_ticket = estimator.begin();

    let result = estimator
        .estimate_drafts(&stale_ticket, Address::from([0x01; 20]), &[draft])
        .await;
    assert!(result.is_none());
}

#[tokio::test]
async fn build_with_estimate_prices_the_draft_set() {
    let (registry, _) = dai_registry();
    let builder = DraftBuilder::new(&registry, CHAIN_ETHEREUM);
    let client = FakeClient {
        gas_estimate: Some(21_000),
        gas_price: 2 * GWEI,
        ..Default::default()
    };
    let estimator = FeeEstimator::new(client);

    let (drafts, fee_info) = build_with_estimate(
        &builder,
        &estimator,
        Address::from([0x01; 20]),
        &ActionIntent::NativeTransfer {
            to: Address::from([0x42; 20]),
            amount: "0.25".to_string(),
            data: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(
        drafts[0].value,
        U256::from(250_000_000_000_000_000u128) // 0.25 in base units
    );
    // 21_000 estimate -> 31_500 with margin, times 2 gwei.
    assert_eq!(
        fee_info.fee,
        Some(U256::from(31_500u64) * U256::from(2 * GWEI))
    );
}
