// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::domain::error::WalletError;
use crate::domain::transaction::TransactionDraft;
use alloy::consensus::Transaction as _;
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;
pub type WsProvider = RootProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, WalletError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| WalletError::Config(format!("Invalid RPC URL: {}", e)))?;

        let provider = RootProvider::new_http(url);
        Ok(provider)
    }

    pub async fn ws(ws_url: &str) -> Result<WsProvider, WalletError> {
        let provider = RootProvider::connect(ws_url)
            .await
            .map_err(|e| WalletError::Connection(format!("WS Connection failed: {}", e)))?;

        Ok(provider)
    }
}

/// Minimal view of an on-chain transaction returned by `get_transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnchainTransaction {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub block_number: Option<u64>,
}

/// The provider capability the core depends on. Every builder/estimator
/// call receives one explicitly, so tests can substitute a fake without
/// touching any global state.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    async fn get_code(&self, address: Address) -> Result<Bytes, WalletError>;

    async fn get_balance(&self, address: Address) -> Result<U256, WalletError>;

    /// Dry-run gas estimate for a draft. Errors map to an estimation
    /// failure the caller recovers from locally.
    async fn estimate_gas(
        &self,
        from: Address,
        draft: &TransactionDraft,
    ) -> Result<u64, WalletError>;

    async fn gas_price(&self) -> Result<u128, WalletError>;

    /// eth_call against a contract; used for balance/stake/reward reads.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError>;

    async fn get_transaction(&self, hash: B256)
    -> Result<Option<OnchainTransaction>, WalletError>;

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, WalletError>;
}

fn request_for_draft(from: Address, draft: &TransactionDraft) -> TransactionRequest {
    let mut req = TransactionRequest::default()
        .with_from(from)
        .with_to(draft.to)
        .with_value(draft.value);
    if let Some(data) = &draft.data {
        req = req.with_input(data.clone());
    }
    req
}

impl ChainClient for HttpProvider {
    async fn get_code(&self, address: Address) -> Result<Bytes, WalletError> {
        Provider::get_code_at(self, address)
            .await
            .map_err(|e| WalletError::Connection(format!("eth_getCode failed: {e}")))
    }

    async fn get_balance(&self, address: Address) -> Result<U256, WalletError> {
        Provider::get_balance(self, address)
            .await
            .map_err(|e| WalletError::Connection(format!("eth_getBalance failed: {e}")))
    }

    async fn estimate_gas(
        &self,
        from: Address,
        draft: &TransactionDraft,
    ) -> Result<u64, WalletError> {
        Provider::estimate_gas(self, request_for_draft(from, draft))
            .await
            .map_err(|e| WalletError::Estimation(format!("eth_estimateGas failed: {e}")))
    }

    async fn gas_price(&self) -> Result<u128, WalletError> {
        Provider::get_gas_price(self)
            .await
            .map_err(|e| WalletError::Connection(format!("eth_gasPrice failed: {e}")))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError> {
        let req = TransactionRequest::default().with_to(to).with_input(data);
        Provider::call(self, req)
            .await
            .map_err(|e| WalletError::Connection(format!("eth_call failed: {e}")))
    }

    async fn get_transaction(
        &self,
        hash: B256,
    ) -> Result<Option<OnchainTransaction>, WalletError> {
        let found = Provider::get_transaction_by_hash(self, hash)
            .await
            .map_err(|e| {
                WalletError::Connection(format!("eth_getTransactionByHash failed: {e}"))
            })?;

        Ok(found.map(|tx| OnchainTransaction {
            hash,
            from: tx.inner.signer(),
            to: tx.inner.to(),
            value: tx.inner.value(),
            block_number: tx.block_number,
        }))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, WalletError> {
        let pending = Provider::send_raw_transaction(self, raw.as_ref())
            .await
            .map_err(|e| {
                WalletError::Connection(format!("eth_sendRawTransaction failed: {e}"))
            })?;
        Ok(*pending.tx_hash())
    }
}

/// Signing capability supplied by the application. The core never holds
/// key material; it only produces unsigned drafts and hands them over.
#[allow(async_fn_in_trait)]
pub trait TransactionSigner {
    async fn sign_transaction(
        &self,
        draft: &TransactionDraft,
        chain_id: u64,
        nonce: u64,
    ) -> Result<Bytes, WalletError>;

    async fn sign_message(&self, message: &[u8]) -> Result<Bytes, WalletError>;
}

/// Broadcast a pre-signed payload through the provider.
pub async fn transfer_signed<C: ChainClient>(
    client: &C,
    signed: Bytes,
) -> Result<B256, WalletError> {
    client.send_raw_transaction(signed).await
}
