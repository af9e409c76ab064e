// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Invalid amount {value}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Insufficient balance. Required: {required}, Available: {available}")]
    InsufficientBalance { required: String, available: String },

    #[error("Could not encode contract call: {0}")]
    Encoding(String),

    #[error("Gas estimation failed: {0}")]
    Estimation(String),

    #[error("Asset {0} is not supported")]
    UnsupportedAsset(String),

    #[error("Graph query failed: {0}")]
    GraphQuery(String),

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl WalletError {
    pub fn invalid_amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        WalletError::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for WalletError {
    fn from(err: config::ConfigError) -> Self {
        WalletError::Config(err.to_string())
    }
}
