// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Response types of the Lisk Service HTTP API.
//!
//! The service wraps collections in an envelope of `data` plus paging
//! `meta`, and renders every 64-bit amount as a decimal string. These
//! types mirror that JSON shape; the string fields carry accessors that
//! parse into native integers and report a schema violation when the
//! service sends something unexpected.

use serde::Deserialize;

use crate::error::AdapterError;

/// Standard wrapper around service responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: ResponseMeta,
}

/// Paging metadata attached to collection responses.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

/// Error body the service attaches to 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Authentication state of an account: the next unspent nonce and the
/// multisignature key set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthAccount {
    /// Next unspent nonce, as a decimal string
    pub nonce: String,
    #[serde(default)]
    pub number_of_signatures: u32,
    #[serde(default)]
    pub mandatory_keys: Vec<String>,
    #[serde(default)]
    pub optional_keys: Vec<String>,
}

impl AuthAccount {
    pub fn nonce_value(&self) -> Result<u64, AdapterError> {
        parse_amount(&self.nonce, "auth", "nonce")
    }
}

/// One token balance row of an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    #[serde(rename = "tokenID")]
    pub token_id: String,
    /// Spendable amount in base units, as a decimal string
    pub available_balance: String,
    #[serde(default)]
    pub locked_balances: Vec<LockedBalance>,
}

impl TokenBalance {
    pub fn available(&self) -> Result<u64, AdapterError> {
        parse_amount(&self.available_balance, "token/balances", "availableBalance")
    }
}

/// Amount held back from an account balance by a module.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedBalance {
    pub module: String,
    pub amount: String,
}

/// An address with its optional public key and registered name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub address: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Block coordinates attached to an executed transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    pub id: String,
    pub height: u64,
    pub timestamp: u64,
    #[serde(default)]
    pub is_final: bool,
}

/// Command parameters of an indexed transaction. Commands carry different
/// parameter sets, so every field is optional; transfers populate all four.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    #[serde(default, rename = "tokenID")]
    pub token_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub recipient_address: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

/// A transaction as indexed by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(default)]
    pub module_command: Option<String>,
    pub nonce: String,
    pub fee: String,
    pub sender: AccountRef,
    #[serde(default)]
    pub params: TransactionParams,
    #[serde(default)]
    pub block: Option<BlockRef>,
    #[serde(default)]
    pub execution_status: Option<String>,
    /// Transfer memo lifted out of `params` by [`TransactionRecord::normalize`];
    /// never read from the response itself
    #[serde(skip)]
    pub memo: Option<String>,
}

impl TransactionRecord {
    /// Copy the transfer memo up to the top level, the shape callers read.
    pub fn normalize(mut self) -> Self {
        self.memo = self.params.data.clone();
        self
    }

    pub fn amount_value(&self) -> Result<u64, AdapterError> {
        match &self.params.amount {
            Some(amount) => parse_amount(amount, "transactions", "params.amount"),
            None => Err(AdapterError::SchemaViolation {
                schema: "transactions",
                reason: "params.amount is missing".to_string(),
            }),
        }
    }

    pub fn fee_value(&self) -> Result<u64, AdapterError> {
        parse_amount(&self.fee, "transactions", "fee")
    }
}

/// A block header as indexed by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: String,
    pub height: u64,
    pub timestamp: u64,
    #[serde(default)]
    pub generator: Option<AccountRef>,
    #[serde(default)]
    pub number_of_transactions: u32,
    #[serde(default)]
    pub is_final: bool,
}

/// Acknowledgement of an accepted broadcast. Built by the client from the
/// service response once the network identifier is known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastAck {
    /// Network-assigned transaction identifier
    pub transaction_id: String,
    pub message: Option<String>,
}

fn parse_amount(
    value: &str,
    schema: &'static str,
    field: &str,
) -> Result<u64, AdapterError> {
    value.parse().map_err(|_| AdapterError::SchemaViolation {
        schema,
        reason: format!("{field} {value:?} is not an unsigned 64-bit integer"),
    })
}
