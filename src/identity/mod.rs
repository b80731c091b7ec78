// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Passphrase-derived identities, mnemonic handling, and transaction signing.
//!
//! This module provides functionality for:
//! - Deriving a stable keypair and address from a mnemonic passphrase
//! - Generating and validating recovery passphrases
//! - Signing transactions with the network's tagged-digest scheme
//!
//! Derivation is the network's legacy scheme: the Ed25519 seed is the
//! SHA-256 of the UTF-8 passphrase, which makes the whole identity a pure
//! function of the passphrase. Keys live only in process memory for the
//! lifetime of the value; the signing key zeroizes itself on drop.

pub mod address;

use bip39::{Language, Mnemonic, MnemonicType};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

/// Length of an account public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of a transaction signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Domain separation tag mixed into every transaction signature.
const TRANSACTION_SIGNING_TAG: &[u8] = b"LSK_TX_";

/// A connected account: address plus the keypair derived from a passphrase.
#[derive(Clone)]
pub struct Identity {
    address: String,
    signing_key: SigningKey,
}

impl Identity {
    /// Derive the identity for a passphrase. Deterministic: the same
    /// passphrase always yields the same keypair and address.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let seed: [u8; 32] = Sha256::digest(passphrase.as_bytes()).into();
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = signing_key.verifying_key().to_bytes();
        let address = address::encode_address(&address::address_from_public_key(&public_key));
        Self {
            address,
            signing_key,
        }
    }

    /// The account's human-readable address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The account's public key bytes.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The account's verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign an arbitrary message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Sign the canonical unsigned bytes of a transaction for a network.
    pub fn sign_transaction(
        &self,
        chain_id: &[u8; 4],
        unsigned_bytes: &[u8],
    ) -> [u8; SIGNATURE_LENGTH] {
        self.sign(&transaction_signing_digest(chain_id, unsigned_bytes))
    }
}

// Keep the signing key out of logs and error chains.
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// The digest a transaction signature covers: tag, chain ID, then the
/// canonical unsigned transaction bytes.
pub fn transaction_signing_digest(chain_id: &[u8; 4], unsigned_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(TRANSACTION_SIGNING_TAG);
    hasher.update(chain_id);
    hasher.update(unsigned_bytes);
    hasher.finalize().into()
}

/// Generate a fresh 12-word English recovery passphrase.
pub fn generate_passphrase() -> String {
    Mnemonic::new(MnemonicType::Words12, Language::English)
        .phrase()
        .to_string()
}

/// Check wordlist membership and checksum without deriving any keys.
pub fn validate_passphrase(passphrase: &str) -> bool {
    Mnemonic::from_phrase(passphrase, Language::English).is_ok()
}

/// The address a passphrase derives, without keeping the keys around.
pub fn address_from_passphrase(passphrase: &str) -> String {
    Identity::from_passphrase(passphrase).address
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    const TEST_PASSPHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derivation_is_deterministic() {
        let first = Identity::from_passphrase(TEST_PASSPHRASE);
        let second = Identity::from_passphrase(TEST_PASSPHRASE);
        assert_eq!(first.address(), second.address());
        assert_eq!(first.public_key(), second.public_key());
    }

    #[test]
    fn different_passphrases_derive_different_identities() {
        let first = Identity::from_passphrase("first passphrase");
        let second = Identity::from_passphrase("second passphrase");
        assert_ne!(first.address(), second.address());
        assert_ne!(first.public_key(), second.public_key());
    }

    #[test]
    fn derived_addresses_validate() {
        let identity = Identity::from_passphrase(TEST_PASSPHRASE);
        assert!(address::validate_address(identity.address()));
        let raw = address::decode_address(identity.address()).unwrap();
        assert_eq!(raw, address::address_from_public_key(&identity.public_key()));
    }

    #[test]
    fn signatures_verify_against_the_public_key() {
        let identity = Identity::from_passphrase(TEST_PASSPHRASE);
        let message = b"canonical unsigned bytes";
        let signature = identity.sign_transaction(&[1, 0, 0, 0], message);

        let digest = transaction_signing_digest(&[1, 0, 0, 0], message);
        let signature = Signature::from_bytes(&signature);
        assert!(identity.verifying_key().verify(&digest, &signature).is_ok());
    }

    #[test]
    fn signing_digest_depends_on_the_chain_id() {
        let message = b"canonical unsigned bytes";
        let mainnet = transaction_signing_digest(&[0, 0, 0, 0], message);
        let testnet = transaction_signing_digest(&[1, 0, 0, 0], message);
        assert_ne!(mainnet, testnet);
    }

    #[test]
    fn generated_passphrases_validate() {
        let passphrase = generate_passphrase();
        assert_eq!(passphrase.split_whitespace().count(), 12);
        assert!(validate_passphrase(&passphrase));
        // Two generations are distinct with overwhelming probability.
        assert_ne!(passphrase, generate_passphrase());
    }

    #[test]
    fn validate_passphrase_rejects_bad_input() {
        assert!(validate_passphrase(TEST_PASSPHRASE));
        assert!(!validate_passphrase(""));
        assert!(!validate_passphrase("definitely not a mnemonic"));
        // Right words, wrong checksum.
        assert!(!validate_passphrase(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
    }

    #[test]
    fn debug_output_hides_the_signing_key() {
        let identity = Identity::from_passphrase(TEST_PASSPHRASE);
        let rendered = format!("{identity:?}");
        assert!(rendered.contains(identity.address()));
        assert!(!rendered.contains("signing_key"));
    }

    #[test]
    fn address_from_passphrase_matches_full_derivation() {
        assert_eq!(
            address_from_passphrase(TEST_PASSPHRASE),
            Identity::from_passphrase(TEST_PASSPHRASE).address()
        );
    }
}
