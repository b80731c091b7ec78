// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Lisk Adapter - Wallet adapter for Lisk-protocol networks
//!
//! This crate connects passphrase-derived wallet identities to a Lisk
//! Service instance: it encodes and signs token transfers in the chain's
//! canonical wire format, tracks per-address nonces under concurrent use,
//! and reads balances, history, and blocks with endpoint failover.
//!
//! ## Modules
//!
//! - `adapter` - Session facade consumed by applications
//! - `codec` - Schema-driven canonical wire encoding
//! - `identity` - Passphrase derivation, addresses, and signing
//! - `nonce` - Per-address nonce reservation
//! - `service` - Lisk Service HTTP client and typed queries
//! - `transfer` - Transfer building and signing

pub mod adapter;
pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod nonce;
pub mod service;
pub mod transfer;

pub use adapter::{LiskAdapter, NewWallet};
pub use config::{AdapterConfig, NetworkParams, LISK_MAINNET, LISK_TESTNET};
pub use error::AdapterError;
