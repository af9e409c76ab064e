// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::error::WalletError;
use crate::network::provider::ChainClient;
use crate::services::amounts::parse_base_units;
use crate::services::contracts::{Erc20Token, Erc721, Erc721Legacy};
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

// First 4 bytes of keccak256(signature), searched for as hex substrings
// in deployed bytecode.
pub const TRANSFER_SELECTOR: &str = "a9059cbb"; // transfer(address,uint256)
pub const SAFE_TRANSFER_FROM_SELECTOR: &str = "42842e0e"; // safeTransferFrom(address,address,uint256)

/// ABI-encode an ERC-20 `transfer`. `amount` must already be in base
/// units.
pub fn encode_transfer_call(to: Address, amount: U256) -> Bytes {
    Erc20Token::transferCall { to, value: amount }
        .abi_encode()
        .into()
}

/// ABI-encode an ERC-20 `approve` from a human-unit amount.
pub fn encode_approve_call(
    spender: Address,
    amount: &str,
    decimals: u8,
) -> Result<Bytes, WalletError> {
    let value = parse_base_units(amount, decimals)?;
    Ok(Erc20Token::approveCall { spender, value }.abi_encode().into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erc721TransferMethod {
    SafeTransferFrom,
    Transfer,
    TransferFrom,
}

fn contract_has_method(code_hex: &str, selector: &str) -> bool {
    code_hex.contains(selector)
}

/// Pick the transfer method a collection supports by scanning its raw
/// bytecode for method selectors.
///
/// Sending to a contract with `safeTransferFrom` fails when the receiver
/// does not implement `onERC721Received`, so safe transfer is only
/// chosen for plain addresses. The selector scan is a substring match
/// over deployed bytecode, not ABI introspection: proxy contracts can
/// carry a selector they do not actually dispatch, so the scan may
/// mis-detect them. `transferFrom` stays the fallback because it is the
/// one method the 721 standard guarantees.
pub fn select_erc721_transfer_method(
    code_hex: &str,
    is_receiver_contract: bool,
) -> Erc721TransferMethod {
    if !is_receiver_contract && contract_has_method(code_hex, SAFE_TRANSFER_FROM_SELECTOR) {
        Erc721TransferMethod::SafeTransferFrom
    } else if contract_has_method(code_hex, TRANSFER_SELECTOR) {
        Erc721TransferMethod::Transfer
    } else {
        Erc721TransferMethod::TransferFrom
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectibleTransfer {
    pub contract_address: Address,
    pub from: Address,
    pub to: Address,
    pub token_id: U256,
}

/// Build calldata for a collectible transfer. An error here means the
/// transfer cannot be made at all; callers must not retry with the same
/// inputs.
pub async fn build_erc721_transfer_data<C: ChainClient>(
    client: &C,
    transfer: &CollectibleTransfer,
) -> Result<Bytes, WalletError> {
    let receiver_code = client.get_code(transfer.to).await.map_err(|e| {
        tracing::warn!(
            to = %format!("{:#x}", transfer.to),
            error = %e,
            "Could not classify collectible receiver"
        );
        WalletError::Encoding(format!("receiver bytecode unavailable: {e}"))
    })?;

    // A plain address has no deployed code.
    let is_receiver_contract = !receiver_code.is_empty();
    let code_hex = hex::encode(&receiver_code);

    let data = match select_erc721_transfer_method(&code_hex, is_receiver_contract) {
        Erc721TransferMethod::SafeTransferFrom => Erc721::safeTransferFromCall {
            from: transfer.from,
            to: transfer.to,
            tokenId: transfer.token_id,
        }
        .abi_encode(),
        Erc721TransferMethod::Transfer => Erc721Legacy::transferCall {
            to: transfer.to,
            tokenId: transfer.token_id,
        }
        .abi_encode(),
        Erc721TransferMethod::TransferFrom => Erc721::transferFromCall {
            from: transfer.from,
            to: transfer.to,
            tokenId: transfer.token_id,
        }
        .abi_encode(),
    };

    Ok(data.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_prefers_safe_transfer_for_plain_receivers() {
        let code = format!("6080{SAFE_TRANSFER_FROM_SELECTOR}5b");
        assert_eq!(
            select_erc721_transfer_method(&code, false),
            Erc721TransferMethod::SafeTransferFrom
        );
        // Contract receivers may lack onERC721Received, so safe transfer
        // is off the table even when the selector is present.
        let code = format!("6080{SAFE_TRANSFER_FROM_SELECTOR}{TRANSFER_SELECTOR}5b");
        assert_eq!(
            select_erc721_transfer_method(&code, true),
            Erc721TransferMethod::Transfer
        );
    }

    #[test]
    fn selection_falls_back_to_transfer_from() {
        assert_eq!(
            select_erc721_transfer_method("60806040", false),
            Erc721TransferMethod::TransferFrom
        );
        assert_eq!(
            select_erc721_transfer_method("", true),
            Erc721TransferMethod::TransferFrom
        );
    }

    #[test]
    fn transfer_calldata_carries_selector_and_args() {
        let to = Address::from([0x22; 20]);
        let data = encode_transfer_call(to, U256::from(1000));
        assert_eq!(hex::encode(&data[..4]), TRANSFER_SELECTOR);
        // address is left-padded into the first 32-byte word
        assert_eq!(data[16..36], to.0[..]);
        assert_eq!(data.len(), 4 + 32 + 32);
    }

    #[test]
    fn approve_calldata_scales_amount() {
        let spender = Address::from([0x33; 20]);
        let data = encode_approve_call(spender, "1.5", 6).unwrap();
        let decoded = Erc20Token::approveCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.value, U256::from(1_500_000));

        assert!(encode_approve_call(spender, "0.0000001", 6).is_err());
    }
}
