// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(s)).ok()
}

pub fn parse_address_hex(s: &str) -> Option<Address> {
    Address::from_str(strip_0x(s)).ok()
}

pub fn parse_u256_hex(s: &str) -> Option<U256> {
    U256::from_str_radix(strip_0x(s), 16).ok()
}

/// Numeric fields from backend payloads arrive either as decimal strings
/// or as 0x-prefixed hex.
pub fn parse_u256_lenient(s: &str) -> Option<U256> {
    let trimmed = s.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        parse_u256_hex(trimmed)
    } else {
        U256::from_str_radix(trimmed, 10).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsers_accept_lower_and_upper_prefixes() {
        assert_eq!(parse_u256_hex("0x2a"), Some(U256::from(42)));
        assert_eq!(parse_u256_hex("0X2a"), Some(U256::from(42)));
        assert_eq!(parse_hex_bytes("0Xabcd"), Some(vec![0xab, 0xcd]));
    }

    #[test]
    fn lenient_parser_handles_both_radixes() {
        assert_eq!(parse_u256_lenient("1000"), Some(U256::from(1000)));
        assert_eq!(parse_u256_lenient("0x3e8"), Some(U256::from(1000)));
        assert_eq!(parse_u256_lenient("not-a-number"), None);
    }
}
