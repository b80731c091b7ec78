// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Adapter Configuration
//!
//! Network presets and the per-instance options recognized by the adapter.
//!
//! ## Options
//!
//! | Option | Description | Default |
//! |--------|-------------|---------|
//! | `service_url` | Primary Lisk Service endpoint | per network preset |
//! | `service_url_fallbacks` | Ordered fallback endpoints | empty |
//! | `chain_id` | 4-byte network identifier mixed into signatures | per network preset |
//! | `token_id` | 8-byte native token identifier | per network preset |
//! | `api_max_page_size` | Default page size for history queries | `100` |
//! | `request_timeout` | Per-request deadline before trying the next endpoint | `10s` |

use std::time::Duration;

use url::Url;

use crate::error::AdapterError;

/// Default page size for history queries when the caller does not cap them.
pub const DEFAULT_API_MAX_PAGE_SIZE: u32 = 100;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Static parameters of a Lisk-protocol network.
#[derive(Debug, Clone)]
pub struct NetworkParams {
    /// Network name for display
    pub name: &'static str,
    /// 4-byte chain identifier, part of every transaction signature
    pub chain_id: [u8; 4],
    /// 8-byte native token identifier (chain ID + 4 zero bytes)
    pub token_id: [u8; 8],
    /// Default Lisk Service endpoint
    pub service_url: &'static str,
}

/// Lisk Mainnet configuration.
pub const LISK_MAINNET: NetworkParams = NetworkParams {
    name: "Lisk Mainnet",
    chain_id: [0x00, 0x00, 0x00, 0x00],
    token_id: [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    service_url: "https://service.lisk.com",
};

/// Lisk Testnet configuration.
pub const LISK_TESTNET: NetworkParams = NetworkParams {
    name: "Lisk Testnet",
    chain_id: [0x01, 0x00, 0x00, 0x00],
    token_id: [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    service_url: "https://testnet-service.lisk.com",
};

/// Per-instance adapter configuration.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Primary service endpoint
    pub service_url: String,
    /// Fallback endpoints, tried in order after the primary fails
    pub service_url_fallbacks: Vec<String>,
    /// 4-byte chain identifier used when signing
    pub chain_id: [u8; 4],
    /// 8-byte native token identifier used for balance queries and transfers
    pub token_id: [u8; 8],
    /// Default page size for history queries
    pub api_max_page_size: u32,
    /// Per-request deadline before advancing to the next endpoint
    pub request_timeout: Duration,
}

impl AdapterConfig {
    /// Configuration for a named network preset.
    pub fn for_network(network: &NetworkParams) -> Self {
        Self {
            service_url: network.service_url.to_string(),
            service_url_fallbacks: Vec::new(),
            chain_id: network.chain_id,
            token_id: network.token_id,
            api_max_page_size: DEFAULT_API_MAX_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Mainnet configuration with defaults.
    pub fn mainnet() -> Self {
        Self::for_network(&LISK_MAINNET)
    }

    /// Testnet configuration with defaults.
    pub fn testnet() -> Self {
        Self::for_network(&LISK_TESTNET)
    }

    /// All endpoints in rotation order: primary first, then fallbacks.
    pub fn endpoints(&self) -> Vec<&str> {
        let mut endpoints = Vec::with_capacity(1 + self.service_url_fallbacks.len());
        endpoints.push(self.service_url.as_str());
        endpoints.extend(self.service_url_fallbacks.iter().map(String::as_str));
        endpoints
    }

    /// Check the configuration before building a client from it.
    pub fn validate(&self) -> Result<(), AdapterError> {
        for endpoint in self.endpoints() {
            let url = Url::parse(endpoint).map_err(|e| AdapterError::Validation {
                field: "service_url",
                reason: format!("`{endpoint}` is not a valid URL: {e}"),
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(AdapterError::Validation {
                    field: "service_url",
                    reason: format!("`{endpoint}` must use http or https"),
                });
            }
        }
        if self.api_max_page_size == 0 {
            return Err(AdapterError::Validation {
                field: "api_max_page_size",
                reason: "page size must be at least 1".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(AdapterError::Validation {
                field: "request_timeout",
                reason: "timeout must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_point_at_their_networks() {
        let mainnet = AdapterConfig::mainnet();
        assert_eq!(mainnet.service_url, "https://service.lisk.com");
        assert_eq!(mainnet.chain_id, [0x00, 0x00, 0x00, 0x00]);

        let testnet = AdapterConfig::testnet();
        assert_eq!(testnet.service_url, "https://testnet-service.lisk.com");
        assert_eq!(testnet.chain_id, [0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn native_token_id_extends_the_chain_id() {
        for network in [&LISK_MAINNET, &LISK_TESTNET] {
            assert_eq!(&network.token_id[..4], &network.chain_id);
            assert_eq!(&network.token_id[4..], &[0u8; 4]);
        }
    }

    #[test]
    fn endpoints_keep_primary_first() {
        let mut config = AdapterConfig::testnet();
        config.service_url_fallbacks = vec![
            "https://fallback-1.example".to_string(),
            "https://fallback-2.example".to_string(),
        ];
        assert_eq!(
            config.endpoints(),
            vec![
                "https://testnet-service.lisk.com",
                "https://fallback-1.example",
                "https://fallback-2.example",
            ]
        );
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(AdapterConfig::mainnet().validate().is_ok());
        assert!(AdapterConfig::testnet().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_endpoints() {
        let mut config = AdapterConfig::testnet();
        config.service_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AdapterConfig::testnet();
        config.service_url_fallbacks = vec!["ftp://mirror.example".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_degenerate_limits() {
        let mut config = AdapterConfig::testnet();
        config.api_max_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = AdapterConfig::testnet();
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
