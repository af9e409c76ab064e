// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Fixed-point amount handling and fiat-rate resolution.
//!
//! Token quantities move through the wallet as decimal strings in human
//! units and are scaled to integer base units (`10^decimals`) before they
//! touch a transaction. All arithmetic on amounts runs on `U256` or
//! `BigDecimal`; native floats are reserved for fiat display rates.

use crate::domain::asset::{GasToken, RatesBySymbol, WalletBalances};
use crate::domain::constants::NATIVE_DECIMALS;
use crate::domain::error::WalletError;
use crate::domain::transaction::TransactionFeeInfo;
use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use std::str::FromStr;

pub fn is_valid_decimal(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in trimmed.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

pub fn has_too_much_decimals(value: &str, decimals: u8) -> bool {
    match value.trim().split_once('.') {
        Some((_, frac)) => frac.len() > decimals as usize,
        None => false,
    }
}

/// Scale a decimal string by `10^decimals` into integer base units.
/// Rejects malformed input and values that would lose precision.
pub fn parse_base_units(amount: &str, decimals: u8) -> Result<U256, WalletError> {
    let trimmed = amount.trim();
    if !is_valid_decimal(trimmed) {
        return Err(WalletError::invalid_amount(trimmed, "not a decimal number"));
    }
    if has_too_much_decimals(trimmed, decimals) {
        return Err(WalletError::invalid_amount(
            trimmed,
            format!("more than {decimals} decimal places"),
        ));
    }

    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in frac_part.len()..decimals as usize {
        digits.push('0');
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|_| WalletError::invalid_amount(trimmed, "value out of range"))
}

/// Render integer base units back into a decimal string, trimming
/// trailing fractional zeros.
pub fn format_base_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    if decimals == 0 {
        return raw;
    }
    let decimals = decimals as usize;
    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
    } else {
        raw
    };
    let split = padded.len() - decimals;
    let int_part = &padded[..split];
    let frac_part = padded[split..].trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Resolve a token's fiat rate, going through the native-asset leg
/// (token -> native x native -> fiat) when one is available. Missing legs
/// yield 0 rather than an error; rates are display data only.
pub fn get_rate(rates: &RatesBySymbol, token: &str, native_symbol: &str, fiat: &str) -> f64 {
    let Some(token_rates) = rates.get(token) else {
        return 0.0;
    };
    let Some(native_rates) = rates.get(native_symbol) else {
        return token_rates.get(fiat).copied().unwrap_or(0.0);
    };
    let Some(native_to_fiat) = native_rates.get(fiat).copied() else {
        return 0.0;
    };
    if token == native_symbol {
        return native_to_fiat;
    }
    match token_rates.get(native_symbol).copied() {
        Some(token_to_native) => native_to_fiat * token_to_native,
        None => token_rates.get(fiat).copied().unwrap_or(0.0),
    }
}

/// Stored balance for an asset. A missing entry is a plain "no data"
/// zero; a malformed stored value is an error.
pub fn get_balance(balances: &WalletBalances, symbol: &str) -> Result<BigDecimal, WalletError> {
    match balances.get(symbol) {
        None => Ok(BigDecimal::from(0)),
        Some(raw) => BigDecimal::from_str(raw.trim())
            .map_err(|_| WalletError::invalid_amount(raw, "malformed stored balance")),
    }
}

/// Maximum sendable amount of `symbol` net of the transaction fee.
///
/// The fee is only deducted when the sent asset is the one paying the fee
/// (the chain's native asset, or the selected gas token); other balances
/// are spendable in full. Never negative.
pub fn calculate_max_amount(
    symbol: &str,
    native_symbol: &str,
    balance: &str,
    fee: Option<U256>,
    gas_token: Option<&GasToken>,
) -> Result<String, WalletError> {
    let fee_symbol = gas_token.map(|t| t.symbol.as_str()).unwrap_or(native_symbol);
    let fee_decimals = gas_token.map(|t| t.decimals).unwrap_or(NATIVE_DECIMALS);

    if symbol != fee_symbol {
        // Validate anyway so malformed balances do not slip through.
        let parsed = BigDecimal::from_str(balance.trim())
            .map_err(|_| WalletError::invalid_amount(balance, "malformed balance"))?;
        return Ok(parsed.to_string());
    }

    let balance_units = parse_base_units(balance, fee_decimals)?;
    let max = balance_units.saturating_sub(fee.unwrap_or(U256::ZERO));
    Ok(format_base_units(max, fee_decimals))
}

/// Whether the fee-paying asset's balance covers the estimated fee.
/// An unresolved fee (`None`) does not block: there is nothing to check
/// against yet.
pub fn check_enough_for_fee(
    balances: &WalletBalances,
    fee_info: &TransactionFeeInfo,
    native_symbol: &str,
) -> Result<bool, WalletError> {
    let Some(fee) = fee_info.fee else {
        return Ok(true);
    };
    let symbol = fee_info.fee_symbol(native_symbol);
    let decimals = fee_info.fee_decimals(NATIVE_DECIMALS);
    let Some(raw) = balances.get(symbol) else {
        return Ok(false);
    };
    let balance_units = parse_base_units(raw, decimals)?;
    Ok(balance_units >= fee)
}

/// Validate that `amount` does not exceed the stored balance of `symbol`.
pub fn check_sufficient_balance(
    balances: &WalletBalances,
    symbol: &str,
    amount: &str,
) -> Result<(), WalletError> {
    let available = get_balance(balances, symbol)?;
    let requested = BigDecimal::from_str(amount.trim())
        .map_err(|_| WalletError::invalid_amount(amount, "not a decimal number"))?;
    if requested > available {
        return Err(WalletError::InsufficientBalance {
            required: requested.to_string(),
            available: available.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ETH: &str = "ETH";
    const ONE_ETH: u64 = 1_000_000_000_000_000_000;

    fn rates(entries: &[(&str, &[(&str, f64)])]) -> RatesBySymbol {
        entries
            .iter()
            .map(|(symbol, pairs)| {
                (
                    symbol.to_string(),
                    pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn base_unit_parsing_scales_and_guards_precision() {
        assert_eq!(parse_base_units("1", 18).unwrap(), U256::from(ONE_ETH));
        assert_eq!(parse_base_units("0.5", 18).unwrap(), U256::from(ONE_ETH / 2));
        assert_eq!(parse_base_units("1.5", 6).unwrap(), U256::from(1_500_000));
        assert_eq!(parse_base_units("0", 18).unwrap(), U256::ZERO);

        // Over-precision must be rejected, not rounded.
        assert!(parse_base_units("0.1234567", 6).is_err());
        assert!(parse_base_units("1,5", 18).is_err());
        assert!(parse_base_units("", 18).is_err());
        assert!(parse_base_units("-1", 18).is_err());
    }

    #[test]
    fn format_round_trips_typical_amounts() {
        assert_eq!(format_base_units(U256::from(ONE_ETH), 18), "1");
        assert_eq!(format_base_units(U256::from(ONE_ETH / 2), 18), "0.5");
        assert_eq!(format_base_units(U256::from(1_500_000), 6), "1.5");
        assert_eq!(format_base_units(U256::ZERO, 18), "0");
    }

    #[test]
    fn rate_goes_through_native_leg() {
        let table = rates(&[
            ("ETH", &[("USD", 2000.0)]),
            ("DAI", &[("ETH", 0.0005), ("USD", 1.01)]),
        ]);
        // Native leg present: token->native x native->fiat wins over the
        // direct quote.
        assert_eq!(get_rate(&table, "DAI", ETH, "USD"), 1.0);
        assert_eq!(get_rate(&table, "ETH", ETH, "USD"), 2000.0);
    }

    #[test]
    fn missing_native_fiat_leg_yields_zero_for_tokens() {
        let table = rates(&[
            ("ETH", &[("EUR", 1800.0)]),
            ("DAI", &[("USD", 1.0), ("ETH", 0.0005)]),
        ]);
        assert_eq!(get_rate(&table, "DAI", ETH, "USD"), 0.0);
        assert_eq!(get_rate(&table, "MISSING", ETH, "USD"), 0.0);
    }

    #[test]
    fn max_amount_deducts_fee_for_native_only() {
        let fee = Some(U256::from(ONE_ETH));
        assert_eq!(
            calculate_max_amount(ETH, ETH, "5", fee, None).unwrap(),
            "4"
        );
        // Never negative.
        assert_eq!(
            calculate_max_amount(ETH, ETH, "0.5", fee, None).unwrap(),
            "0"
        );
        // Fee paid in the native asset never reduces a token balance.
        assert_eq!(
            calculate_max_amount("DAI", ETH, "12.25", fee, None).unwrap(),
            "12.25"
        );
    }

    #[test]
    fn max_amount_deducts_gas_token_fee_from_its_own_balance() {
        let plr = GasToken {
            symbol: "PLR".to_string(),
            decimals: 18,
            address: alloy::primitives::Address::from([0xe4; 20]),
        };
        let fee = Some(U256::from(ONE_ETH / 4));
        assert_eq!(
            calculate_max_amount("PLR", ETH, "10", fee, Some(&plr)).unwrap(),
            "9.75"
        );
        // With a gas token selected, the native balance is left alone.
        assert_eq!(
            calculate_max_amount(ETH, ETH, "5", fee, Some(&plr)).unwrap(),
            "5"
        );
    }

    #[test]
    fn fee_balance_check_follows_fee_symbol() {
        let mut balances: WalletBalances = HashMap::new();
        balances.insert(ETH.to_string(), "0.01".to_string());

        let covered = TransactionFeeInfo {
            fee: Some(U256::from(ONE_ETH / 1000)), // 0.001 ETH
            gas_token: None,
        };
        assert!(check_enough_for_fee(&balances, &covered, ETH).unwrap());

        let too_high = TransactionFeeInfo {
            fee: Some(U256::from(ONE_ETH)),
            gas_token: None,
        };
        assert!(!check_enough_for_fee(&balances, &too_high, ETH).unwrap());

        // Pending estimates never block.
        assert!(check_enough_for_fee(&balances, &TransactionFeeInfo::pending(), ETH).unwrap());
    }

    #[test]
    fn insufficient_balance_is_a_typed_error() {
        let mut balances: WalletBalances = HashMap::new();
        balances.insert("DAI".to_string(), "3".to_string());
        assert!(check_sufficient_balance(&balances, "DAI", "2.5").is_ok());
        assert!(matches!(
            check_sufficient_balance(&balances, "DAI", "3.5"),
            Err(WalletError::InsufficientBalance { .. })
        ));
    }
}
