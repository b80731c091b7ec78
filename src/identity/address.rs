// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Human-readable address encoding (lisk32).
//!
//! An address is the string `lsk` followed by 38 base32 symbols: 32 symbols
//! carrying the 20-byte raw address and 6 carrying a BCH checksum over the
//! data symbols. The raw address itself is the first 20 bytes of the
//! SHA-256 of the account's public key.

use sha2::{Digest, Sha256};

use crate::error::AdapterError;

/// Base32 alphabet the address encoding uses. The symbol order is part of
/// the network protocol and differs from RFC 4648.
const CHARSET: &[u8; 32] = b"zxvcpmbn3465o978uyrtkqew2adsjhfg";

/// Generator coefficients of the checksum polynomial.
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

const ADDRESS_PREFIX: &str = "lsk";

/// Total length of an encoded address: prefix + 32 data + 6 checksum symbols.
pub const ADDRESS_LENGTH: usize = 41;

/// Length of a raw binary address.
pub const BINARY_ADDRESS_LENGTH: usize = 20;

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

/// Regroup a sequence of `from_bits`-wide values into `to_bits`-wide values,
/// most significant bits first. Incomplete trailing groups are dropped; the
/// 160-bit address regroups exactly in both directions.
fn regroup_bits(input: &[u8], from_bits: u32, to_bits: u32) -> Vec<u8> {
    let max_value = (1u32 << to_bits) - 1;
    let mut accumulator: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(input.len() * from_bits as usize / to_bits as usize);
    for &value in input {
        accumulator = (accumulator << from_bits) | u32::from(value);
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            out.push(((accumulator >> bits) & max_value) as u8);
        }
    }
    out
}

fn create_checksum(data: &[u8]) -> [u8; 6] {
    let mut values = data.to_vec();
    values.extend_from_slice(&[0u8; 6]);
    let polymod = polymod(&values) ^ 1;
    let mut checksum = [0u8; 6];
    for (position, slot) in checksum.iter_mut().enumerate() {
        *slot = ((polymod >> (5 * (5 - position))) & 31) as u8;
    }
    checksum
}

/// Derive the raw binary address for a public key.
pub fn address_from_public_key(public_key: &[u8; 32]) -> [u8; BINARY_ADDRESS_LENGTH] {
    let digest = Sha256::digest(public_key);
    let mut address = [0u8; BINARY_ADDRESS_LENGTH];
    address.copy_from_slice(&digest[..BINARY_ADDRESS_LENGTH]);
    address
}

/// Encode a raw binary address into its human-readable form.
pub fn encode_address(address: &[u8; BINARY_ADDRESS_LENGTH]) -> String {
    let data = regroup_bits(address, 8, 5);
    let checksum = create_checksum(&data);
    let mut out = String::with_capacity(ADDRESS_LENGTH);
    out.push_str(ADDRESS_PREFIX);
    for &symbol in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[symbol as usize] as char);
    }
    out
}

/// Decode a human-readable address back to its raw 20 bytes, verifying the
/// checksum.
pub fn decode_address(address: &str) -> Result<[u8; BINARY_ADDRESS_LENGTH], AdapterError> {
    let invalid = |reason: String| AdapterError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    if address.len() != ADDRESS_LENGTH {
        return Err(invalid(format!(
            "expected {ADDRESS_LENGTH} characters, got {}",
            address.len()
        )));
    }
    let Some(encoded) = address.strip_prefix(ADDRESS_PREFIX) else {
        return Err(invalid(format!("missing `{ADDRESS_PREFIX}` prefix")));
    };

    let mut symbols = Vec::with_capacity(encoded.len());
    for character in encoded.bytes() {
        let Some(position) = CHARSET.iter().position(|&c| c == character) else {
            return Err(invalid(format!(
                "character `{}` is not in the address alphabet",
                character as char
            )));
        };
        symbols.push(position as u8);
    }

    if polymod(&symbols) != 1 {
        return Err(invalid("checksum mismatch".to_string()));
    }

    let data = &symbols[..symbols.len() - 6];
    let bytes = regroup_bits(data, 5, 8);
    bytes
        .try_into()
        .map_err(|_| invalid("address does not regroup to 20 bytes".to_string()))
}

/// Whether a string is a well-formed address with a valid checksum.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_addresses_have_the_expected_shape() {
        let address = encode_address(&[0u8; 20]);
        assert_eq!(address.len(), ADDRESS_LENGTH);
        assert!(address.starts_with("lsk"));
        assert!(address[3..].bytes().all(|c| CHARSET.contains(&c)));
        // 20 zero bytes regroup to 32 zero symbols, all mapping to `z`.
        assert_eq!(&address[3..35], "z".repeat(32));
    }

    #[test]
    fn round_trip_various_byte_patterns() {
        let patterns: [[u8; 20]; 4] = [
            [0u8; 20],
            [0xff; 20],
            core::array::from_fn(|i| i as u8),
            core::array::from_fn(|i| (i as u8).wrapping_mul(37).wrapping_add(11)),
        ];
        for bytes in patterns {
            let encoded = encode_address(&bytes);
            assert_eq!(decode_address(&encoded).unwrap(), bytes);
            assert!(validate_address(&encoded));
        }
    }

    #[test]
    fn single_symbol_tampering_is_detected() {
        let encoded = encode_address(&[0x5a; 20]);
        let bytes = encoded.as_bytes();
        for position in 3..ADDRESS_LENGTH {
            let mut tampered = bytes.to_vec();
            // Swap the symbol for a different one from the alphabet.
            let replacement = CHARSET
                .iter()
                .copied()
                .find(|&c| c != bytes[position])
                .unwrap();
            tampered[position] = replacement;
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                decode_address(&tampered).is_err(),
                "tampered position {position} was accepted"
            );
        }
    }

    #[test]
    fn structural_errors_are_rejected() {
        assert!(decode_address("").is_err());
        assert!(decode_address("lsk").is_err());
        // Wrong prefix, right length.
        let mut wrong_prefix = encode_address(&[1u8; 20]);
        wrong_prefix.replace_range(0..3, "tsk");
        assert!(decode_address(&wrong_prefix).is_err());
        // Character outside the alphabet ('1' is not in the charset).
        let mut bad_char = encode_address(&[1u8; 20]);
        bad_char.replace_range(3..4, "1");
        assert!(decode_address(&bad_char).is_err());
        // Too long.
        let mut long = encode_address(&[1u8; 20]);
        long.push('z');
        assert!(decode_address(&long).is_err());
    }

    #[test]
    fn public_key_addresses_are_a_sha256_prefix() {
        let public_key = [0x42u8; 32];
        let address = address_from_public_key(&public_key);
        let digest = Sha256::digest(public_key);
        assert_eq!(&address[..], &digest[..20]);
    }
}
