// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet adapter facade.
//!
//! This module provides functionality for:
//! - Connecting a passphrase-derived identity as the active session
//! - Generating and validating recovery passphrases
//! - Creating, signing, and broadcasting token transfers
//! - Reading balances and outbound history for any address
//!
//! One [`LiskAdapter`] instance holds at most one connected identity at a
//! time. Instances are fully isolated from each other, nonce bookkeeping
//! included, so an application can run several sessions side by side.

use tracing::info;

use tokio::sync::RwLock;

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::identity::{self, address, Identity};
use crate::nonce::NonceTracker;
use crate::service::queries::TransactionQuery;
use crate::service::types::{BroadcastAck, TransactionRecord};
use crate::service::ServiceClient;
use crate::transfer::{build_transfer, Transaction, TransferRequest};

/// A freshly generated wallet: a recovery passphrase and the address it
/// derives to.
#[derive(Clone)]
pub struct NewWallet {
    pub address: String,
    pub passphrase: String,
}

// Keep the passphrase out of logs and error chains.
impl std::fmt::Debug for NewWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Wallet adapter for Lisk-protocol networks.
pub struct LiskAdapter {
    config: AdapterConfig,
    client: ServiceClient,
    nonces: NonceTracker,
    session: RwLock<Option<Identity>>,
}

impl LiskAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        let client = ServiceClient::new(&config)?;
        Ok(Self {
            config,
            client,
            nonces: NonceTracker::new(),
            session: RwLock::new(None),
        })
    }

    /// Adapter against Lisk Mainnet with default options.
    pub fn mainnet() -> Result<Self, AdapterError> {
        Self::new(AdapterConfig::mainnet())
    }

    /// Adapter against Lisk Testnet with default options.
    pub fn testnet() -> Result<Self, AdapterError> {
        Self::new(AdapterConfig::testnet())
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Derive the identity for `passphrase`, seed its nonce from the
    /// network, and make it the active session. Returns the address.
    ///
    /// An account the service has never seen seeds at nonce zero.
    /// Reconnecting an identity keeps any nonce already handed out in this
    /// process; the tracker only ever adopts a larger remote value.
    pub async fn connect(&self, passphrase: &str) -> Result<String, AdapterError> {
        let identity = Identity::from_passphrase(passphrase);
        let address = identity.address().to_string();

        let remote_nonce = self.client.get_nonce(&address).await?;
        self.nonces.seed(&address, remote_nonce).await;

        *self.session.write().await = Some(identity);
        info!(%address, remote_nonce, "session connected");
        Ok(address)
    }

    /// Drop the active session. Nonce bookkeeping survives, so a later
    /// reconnect cannot reuse a nonce already handed out.
    pub async fn disconnect(&self) {
        let mut session = self.session.write().await;
        if let Some(identity) = session.take() {
            info!(address = %identity.address(), "session disconnected");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Address of the active session, if any.
    pub async fn connected_address(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|identity| identity.address().to_string())
    }

    /// Generate a wallet offline: a fresh recovery passphrase and its
    /// address. Does not touch the active session.
    pub fn create_wallet(&self) -> NewWallet {
        let passphrase = identity::generate_passphrase();
        let address = identity::address_from_passphrase(&passphrase);
        NewWallet {
            address,
            passphrase,
        }
    }

    /// Whether `passphrase` is a well-formed recovery phrase. Advisory:
    /// [`LiskAdapter::connect`] derives an identity from any string.
    pub fn validate_passphrase(&self, passphrase: &str) -> bool {
        identity::validate_passphrase(passphrase)
    }

    /// Address a passphrase would connect as, without connecting.
    pub fn address_from_passphrase(&self, passphrase: &str) -> String {
        identity::address_from_passphrase(passphrase)
    }

    /// Build and sign a transfer from the connected identity.
    ///
    /// The nonce is reserved first and is not returned on failure: the
    /// transaction may have reached the network even when an error comes
    /// back, and a gap is recoverable where a reused nonce is not.
    pub async fn create_transfer(
        &self,
        request: &TransferRequest<'_>,
    ) -> Result<Transaction, AdapterError> {
        let identity = self
            .session
            .read()
            .await
            .as_ref()
            .ok_or(AdapterError::NotConnected)?
            .clone();

        let nonce = self.nonces.next(identity.address()).await;
        let transaction = build_transfer(&identity, &self.config, nonce, request)?;
        info!(id = %transaction.id, nonce, "transfer created");
        Ok(transaction)
    }

    /// Wire-encode a signed transaction and broadcast it.
    pub async fn post_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<BroadcastAck, AdapterError> {
        let payload = transaction.to_hex()?;
        self.client.post_transaction(&payload).await
    }

    /// Spendable balance of the network's native token, in base units.
    /// The address is checked locally before the service is asked.
    pub async fn get_account_balance(&self, address: &str) -> Result<u64, AdapterError> {
        address::decode_address(address)?;
        let token_id = hex::encode(self.config.token_id);
        self.client.get_available_balance(address, &token_id).await
    }

    /// Most recent outbound transfers of `address`, newest first. `limit`
    /// defaults to the configured page size.
    pub async fn get_latest_outbound_transactions(
        &self,
        address: &str,
        limit: Option<u32>,
    ) -> Result<Vec<TransactionRecord>, AdapterError> {
        address::decode_address(address)?;
        let limit = limit.unwrap_or(self.config.api_max_page_size);
        let query = TransactionQuery::transfers_from(address).with_limit(limit);
        self.client.get_transactions(&query).await
    }
}
