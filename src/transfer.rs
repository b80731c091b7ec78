// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer transaction building and signing.
//!
//! [`build_transfer`] turns caller input into a fully signed, ready-to-
//! broadcast [`Transaction`]: it validates the input against the wire
//! schema's bounds, resolves the recipient to raw bytes, signs the
//! canonical unsigned encoding, and assigns the local identifier. Wire
//! encoding of the result is separate so a transaction can be inspected,
//! stored, or re-broadcast without rebuilding it.

use sha2::{Digest, Sha256};

use crate::codec::{self, Value, ValueMap, TRANSACTION_SCHEMA, TRANSFER_PARAMS_SCHEMA};
use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::identity::{address, Identity, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Module name of value transfers.
pub const MODULE_TOKEN: &str = "token";

/// Command name of value transfers.
pub const COMMAND_TRANSFER: &str = "transfer";

/// Display length of a locally assigned transaction identifier. Shorter
/// than the network's own 64-character identifiers so the two are easy to
/// tell apart in logs.
pub const TRANSACTION_ID_LENGTH: usize = 44;

/// Caller input for a value transfer.
///
/// Amount and fee are in the token's base units; their types make the
/// non-negativity requirement hold by construction.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub amount: u64,
    pub fee: u64,
    pub recipient_address: &'a str,
    pub memo: &'a str,
}

/// Decoded transfer parameters carried inside the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    pub token_id: [u8; 8],
    pub amount: u64,
    pub recipient_address: [u8; address::BINARY_ADDRESS_LENGTH],
    pub memo: String,
}

/// A transfer transaction, signed and ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Local identifier, a digest of `(sender_address, nonce)`
    pub id: String,
    pub module: String,
    pub command: String,
    pub nonce: u64,
    pub fee: u64,
    pub sender_address: String,
    pub sender_public_key: [u8; PUBLIC_KEY_LENGTH],
    pub params: TransferParams,
    /// Signatures in signing order; empty only in the unsigned draft
    pub signatures: Vec<[u8; SIGNATURE_LENGTH]>,
}

impl Transaction {
    /// Canonical bytes of the unsigned form, the message that signatures
    /// cover.
    pub fn unsigned_bytes(&self) -> Result<Vec<u8>, AdapterError> {
        self.wire_bytes(false)
    }

    /// Canonical bytes of the signed transaction.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AdapterError> {
        self.wire_bytes(true)
    }

    /// Hex rendering of the signed transaction, the broadcast payload shape.
    pub fn to_hex(&self) -> Result<String, AdapterError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    fn wire_bytes(&self, include_signatures: bool) -> Result<Vec<u8>, AdapterError> {
        let mut params = ValueMap::new();
        params.insert("tokenID", Value::Bytes(self.params.token_id.to_vec()));
        params.insert("amount", Value::U64(self.params.amount));
        params.insert(
            "recipientAddress",
            Value::Bytes(self.params.recipient_address.to_vec()),
        );
        params.insert("data", Value::Text(self.params.memo.clone()));
        let params_bytes = codec::encode(&TRANSFER_PARAMS_SCHEMA, &params)?;

        let signatures = if include_signatures {
            self.signatures.iter().map(|s| s.to_vec()).collect()
        } else {
            Vec::new()
        };

        let mut envelope = ValueMap::new();
        envelope.insert("module", Value::Text(self.module.clone()));
        envelope.insert("command", Value::Text(self.command.clone()));
        envelope.insert("nonce", Value::U64(self.nonce));
        envelope.insert("fee", Value::U64(self.fee));
        envelope.insert(
            "senderPublicKey",
            Value::Bytes(self.sender_public_key.to_vec()),
        );
        envelope.insert("params", Value::Bytes(params_bytes));
        envelope.insert("signatures", Value::BytesList(signatures));
        codec::encode(&TRANSACTION_SCHEMA, &envelope)
    }
}

/// Deterministic local identifier for a transaction: a SHA-256 digest of
/// `sender-nonce`, truncated for display. Two transactions from the same
/// sender with the same nonce collide on purpose; a nonce is spent at most
/// once.
pub fn local_transaction_id(sender_address: &str, nonce: u64) -> String {
    let digest = Sha256::digest(format!("{sender_address}-{nonce}").as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(TRANSACTION_ID_LENGTH);
    id
}

/// Build and sign a transfer for the given, already reserved nonce.
///
/// Validates the memo against the schema bound and the recipient address
/// checksum before anything is encoded, so callers see a validation error
/// rather than an encoding failure.
pub fn build_transfer(
    identity: &Identity,
    config: &AdapterConfig,
    nonce: u64,
    request: &TransferRequest<'_>,
) -> Result<Transaction, AdapterError> {
    if let Some(bound) = TRANSFER_PARAMS_SCHEMA
        .field_by_name("data")
        .and_then(|field| field.max_len)
    {
        if request.memo.len() > bound {
            return Err(AdapterError::Validation {
                field: "memo",
                reason: format!(
                    "{} bytes exceeds the {bound}-byte limit",
                    request.memo.len()
                ),
            });
        }
    }
    let recipient = address::decode_address(request.recipient_address)?;

    let mut transaction = Transaction {
        id: local_transaction_id(identity.address(), nonce),
        module: MODULE_TOKEN.to_string(),
        command: COMMAND_TRANSFER.to_string(),
        nonce,
        fee: request.fee,
        sender_address: identity.address().to_string(),
        sender_public_key: identity.public_key(),
        params: TransferParams {
            token_id: config.token_id,
            amount: request.amount,
            recipient_address: recipient,
            memo: request.memo.to_string(),
        },
        signatures: Vec::new(),
    };

    let unsigned = transaction.unsigned_bytes()?;
    let signature = identity.sign_transaction(&config.chain_id, &unsigned);
    transaction.signatures.push(signature);
    Ok(transaction)
}
