// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy shared across the adapter.
//!
//! Transport failures (`Timeout`, `Unavailable`) are retried across fallback
//! endpoints before they surface; everything else is authoritative the first
//! time it is seen.

/// Errors surfaced by the adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Malformed caller input, rejected before any network traffic.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Address failed structural or checksum validation.
    #[error("Invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A value does not satisfy its wire schema. Unreachable for
    /// transactions built through the adapter's own validation.
    #[error("Schema `{schema}` violated: {reason}")]
    SchemaViolation {
        schema: &'static str,
        reason: String,
    },

    /// A single endpoint did not answer within the configured deadline.
    #[error("{operation}: request to {url} timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        url: String,
        timeout_ms: u64,
    },

    /// Every configured endpoint failed at the transport level.
    #[error("{operation}: all {attempts} service endpoints failed; last error: {last_error}")]
    Unavailable {
        operation: &'static str,
        attempts: usize,
        last_error: String,
    },

    /// The service answered with an application-level error. Authoritative,
    /// never retried against fallbacks.
    #[error("{operation}: service responded with status {status}: {message}")]
    Repository {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// The service has no matching record for the address.
    #[error("No {what} found for address {address}")]
    AccountNotFound {
        address: String,
        what: &'static str,
    },

    /// The network accepted the HTTP request but refused the transaction.
    #[error("Transaction broadcast rejected: {message}")]
    BroadcastRejected { message: String },

    /// A session-scoped operation was called before `connect`.
    #[error("No session is connected; call connect() first")]
    NotConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_operation_and_address_context() {
        let err = AdapterError::AccountNotFound {
            address: "lskzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz".to_string(),
            what: "balance records",
        };
        let text = err.to_string();
        assert!(text.contains("balance records"));
        assert!(text.contains("lskzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz"));

        let err = AdapterError::Unavailable {
            operation: "get transactions",
            attempts: 3,
            last_error: "connection refused".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("get transactions"));
        assert!(text.contains("all 3 service endpoints failed"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn broadcast_rejection_keeps_remote_message() {
        let err = AdapterError::BroadcastRejected {
            message: "Transaction nonce is lower than account nonce".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Transaction broadcast rejected: Transaction nonce is lower than account nonce"
        );
    }

    #[test]
    fn validation_names_the_field() {
        let err = AdapterError::Validation {
            field: "memo",
            reason: "must be at most 64 bytes".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid memo: must be at most 64 bytes");
    }
}
