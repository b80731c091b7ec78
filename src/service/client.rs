// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lisk Service HTTP client.
//!
//! This module provides functionality for:
//! - Querying account auth state, token balances, transactions, and blocks
//! - Broadcasting signed transactions to the network
//! - Rotating through fallback endpoints when one fails at the transport level
//!
//! Failover only covers failures where the service never gave an
//! authoritative answer: timeouts, connection errors, and 5xx statuses.
//! A 4xx response means the request itself is wrong and is returned
//! as-is; no other endpoint would answer it differently.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::AdapterConfig;
use crate::error::AdapterError;

use super::queries::{
    AuthQuery, BalanceQuery, BlockQuery, TransactionQuery, AUTH_PATH, BLOCKS_PATH,
    TOKEN_BALANCES_PATH, TRANSACTIONS_PATH,
};
use super::types::{
    AuthAccount, BlockRecord, BroadcastAck, ErrorResponse, ResponseEnvelope, TokenBalance,
    TransactionRecord,
};

/// Client for the Lisk Service read and broadcast API.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    /// Base URLs in rotation order, primary first, trailing slashes trimmed
    endpoints: Vec<String>,
    /// Per-request deadline, also reported in timeout errors
    timeout: Duration,
    http: Client,
}

/// Raw broadcast response. The service acknowledges with a transaction ID,
/// but a misbehaving node can answer 200 with a missing or empty ID, so
/// both fields stay optional until checked.
#[derive(Debug, Deserialize)]
struct BroadcastResponse {
    #[serde(default, rename = "transactionID")]
    transaction_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ServiceClient {
    pub fn new(config: &AdapterConfig) -> Result<Self, AdapterError> {
        config.validate()?;
        let endpoints = config
            .endpoints()
            .into_iter()
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .collect();
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AdapterError::Validation {
                field: "http client",
                reason: format!("failed to initialize: {e}"),
            })?;
        Ok(Self {
            endpoints,
            timeout: config.request_timeout,
            http,
        })
    }

    /// Authentication state of an account. An address the chain has never
    /// seen surfaces as [`AdapterError::AccountNotFound`].
    pub async fn get_auth(&self, query: &AuthQuery) -> Result<AuthAccount, AdapterError> {
        let result: Result<ResponseEnvelope<AuthAccount>, AdapterError> = self
            .get_json("get auth", AUTH_PATH, &query.query_pairs())
            .await;
        match result {
            Ok(envelope) => Ok(envelope.data),
            Err(AdapterError::Repository { status: 404, .. }) => {
                Err(AdapterError::AccountNotFound {
                    address: query.address().to_string(),
                    what: "auth data",
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Next unspent nonce of an address. An address unknown to the service
    /// has spent none, so a missing auth record reads as zero.
    pub async fn get_nonce(&self, address: &str) -> Result<u64, AdapterError> {
        match self.get_auth(&AuthQuery::for_address(address)).await {
            Ok(auth) => auth.nonce_value(),
            Err(AdapterError::AccountNotFound { .. }) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Token balance rows matching the query. An unknown address holds
    /// nothing, so a 404 reads as an empty set.
    pub async fn get_balances(
        &self,
        query: &BalanceQuery,
    ) -> Result<Vec<TokenBalance>, AdapterError> {
        let result: Result<ResponseEnvelope<Vec<TokenBalance>>, AdapterError> = self
            .get_json("get balances", TOKEN_BALANCES_PATH, &query.query_pairs())
            .await;
        match result {
            Ok(envelope) => Ok(envelope.data),
            Err(AdapterError::Repository { status: 404, .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Spendable balance of one token, in base units.
    pub async fn get_available_balance(
        &self,
        address: &str,
        token_id: &str,
    ) -> Result<u64, AdapterError> {
        let query = BalanceQuery::for_address(address).with_token_id(token_id);
        let balances = self.get_balances(&query).await?;
        // The service filters by token, but match locally as well rather
        // than trusting row order.
        match balances
            .iter()
            .find(|row| row.token_id.eq_ignore_ascii_case(token_id))
        {
            Some(row) => row.available(),
            None => Err(AdapterError::AccountNotFound {
                address: address.to_string(),
                what: "balance records",
            }),
        }
    }

    /// Indexed transactions matching the query, memos lifted to the top
    /// level. No matches read as an empty set.
    pub async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionRecord>, AdapterError> {
        let result: Result<ResponseEnvelope<Vec<TransactionRecord>>, AdapterError> = self
            .get_json("get transactions", TRANSACTIONS_PATH, &query.query_pairs())
            .await;
        match result {
            Ok(envelope) => Ok(envelope
                .data
                .into_iter()
                .map(TransactionRecord::normalize)
                .collect()),
            Err(AdapterError::Repository { status: 404, .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Indexed blocks matching the query.
    pub async fn get_blocks(&self, query: &BlockQuery) -> Result<Vec<BlockRecord>, AdapterError> {
        let envelope: ResponseEnvelope<Vec<BlockRecord>> = self
            .get_json("get blocks", BLOCKS_PATH, &query.query_pairs())
            .await?;
        Ok(envelope.data)
    }

    /// Height of the chain tip. A service whose index holds no blocks has
    /// answered authoritatively, so the empty set surfaces as a
    /// [`AdapterError::Repository`] error, not a transport failure.
    pub async fn get_last_block_height(&self) -> Result<u64, AdapterError> {
        let blocks = self.get_blocks(&BlockQuery::latest()).await?;
        match blocks.first() {
            Some(block) => Ok(block.height),
            None => Err(AdapterError::Repository {
                operation: "get blocks",
                status: 200,
                message: "no blocks returned for the chain tip".to_string(),
            }),
        }
    }

    /// Broadcast a signed transaction, hex-encoded. A 400 response and a
    /// 2xx response without a non-empty transaction ID both mean the
    /// network refused the transaction.
    pub async fn post_transaction(
        &self,
        transaction_hex: &str,
    ) -> Result<BroadcastAck, AdapterError> {
        let body = json!({ "transaction": transaction_hex });
        let response: BroadcastResponse = match self
            .request_json("post transaction", TRANSACTIONS_PATH, |http, url| {
                http.post(url).json(&body)
            })
            .await
        {
            Ok(response) => response,
            Err(AdapterError::Repository {
                status: 400,
                message,
                ..
            }) => return Err(AdapterError::BroadcastRejected { message }),
            Err(e) => return Err(e),
        };

        match response.transaction_id {
            Some(transaction_id) if !transaction_id.is_empty() => {
                info!(%transaction_id, "transaction accepted by the network");
                Ok(BroadcastAck {
                    transaction_id,
                    message: response.message,
                })
            }
            _ => Err(AdapterError::BroadcastRejected {
                message: response
                    .message
                    .unwrap_or_else(|| "service did not return a transaction ID".to_string()),
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &'static str,
        query: &[(&'static str, String)],
    ) -> Result<T, AdapterError> {
        self.request_json(operation, path, |http, url| http.get(url).query(query))
            .await
    }

    /// Run one request against each endpoint in turn until an endpoint
    /// gives an authoritative answer.
    async fn request_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &'static str,
        build: impl Fn(&Client, String) -> reqwest::RequestBuilder,
    ) -> Result<T, AdapterError> {
        let mut all_timed_out = true;
        let mut last_timeout: Option<AdapterError> = None;
        let mut last_failure = "no endpoints configured".to_string();

        for endpoint in &self.endpoints {
            let url = format!("{endpoint}{path}");
            let response = match build(&self.http, url.clone()).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    warn!(%url, timeout_ms = self.timeout.as_millis() as u64, "service request timed out, trying next endpoint");
                    last_failure = format!("request to {url} timed out");
                    last_timeout = Some(AdapterError::Timeout {
                        operation,
                        url,
                        timeout_ms: self.timeout.as_millis() as u64,
                    });
                    continue;
                }
                Err(e) => {
                    warn!(%url, error = %e, "service request failed, trying next endpoint");
                    all_timed_out = false;
                    last_failure = format!("request to {url} failed: {e}");
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() {
                let message = read_error_message(response).await;
                warn!(%url, status = status.as_u16(), %message, "service error, trying next endpoint");
                all_timed_out = false;
                last_failure = format!("{url} responded with status {status}: {message}");
                continue;
            }
            if status.is_client_error() {
                let message = read_error_message(response).await;
                return Err(AdapterError::Repository {
                    operation,
                    status: status.as_u16(),
                    message,
                });
            }

            return response
                .json::<T>()
                .await
                .map_err(|e| AdapterError::SchemaViolation {
                    schema: "service response",
                    reason: format!("{operation}: body from {url} did not match: {e}"),
                });
        }

        match last_timeout {
            Some(timeout) if all_timed_out => Err(timeout),
            _ => Err(AdapterError::Unavailable {
                operation,
                attempts: self.endpoints.len(),
                last_error: last_failure,
            }),
        }
    }
}

/// Best-effort extraction of the error message from a failed response.
async fn read_error_message(response: reqwest::Response) -> String {
    match response.json::<ErrorResponse>().await {
        Ok(ErrorResponse {
            message: Some(message),
            ..
        }) => message,
        _ => "no error message".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Json, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::Router;
    use serde_json::Value;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config_for(primary: String, fallbacks: Vec<String>) -> AdapterConfig {
        let mut config = AdapterConfig::testnet();
        config.service_url = primary;
        config.service_url_fallbacks = fallbacks;
        config.request_timeout = Duration::from_millis(400);
        config
    }

    fn auth_body(nonce: &str) -> Value {
        json!({
            "data": {
                "nonce": nonce,
                "numberOfSignatures": 0,
                "mandatoryKeys": [],
                "optionalKeys": [],
            },
            "meta": {},
        })
    }

    #[tokio::test]
    async fn auth_queries_pass_the_address_and_parse_the_nonce() {
        let app = Router::new().route(
            AUTH_PATH,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("address").map(String::as_str), Some("lskexample"));
                Json(auth_body("7"))
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        assert_eq!(client.get_nonce("lskexample").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn nonce_of_an_unseen_address_is_zero() {
        let app = Router::new().route(
            AUTH_PATH,
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": true, "message": "Account not found"})),
                )
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        assert_eq!(client.get_nonce("lskunseen").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn server_errors_advance_to_the_fallback() {
        let primary_hits = Arc::new(AtomicUsize::new(0));
        let hits = primary_hits.clone();
        let primary = Router::new().route(
            AUTH_PATH,
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
                }
            }),
        );
        let fallback = Router::new().route(AUTH_PATH, get(|| async { Json(auth_body("3")) }));

        let primary_url = serve(primary).await;
        let fallback_url = serve(fallback).await;

        let client = ServiceClient::new(&config_for(primary_url, vec![fallback_url])).unwrap();
        assert_eq!(client.get_nonce("lskexample").await.unwrap(), 3);
        assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn client_errors_are_authoritative_and_skip_fallbacks() {
        let primary = Router::new().route(
            AUTH_PATH,
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": true, "message": "Unknown input parameter(s): addres"})),
                )
            }),
        );
        let fallback_hits = Arc::new(AtomicUsize::new(0));
        let hits = fallback_hits.clone();
        let fallback = Router::new().route(
            AUTH_PATH,
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(auth_body("0"))
                }
            }),
        );

        let primary_url = serve(primary).await;
        let fallback_url = serve(fallback).await;

        let client = ServiceClient::new(&config_for(primary_url, vec![fallback_url])).unwrap();
        let err = client
            .get_auth(&AuthQuery::for_address("lskexample"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Repository { status: 400, .. }
        ));
        assert_eq!(fallback_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn timeouts_advance_to_the_fallback() {
        let primary = Router::new().route(
            AUTH_PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_millis(2_000)).await;
                Json(auth_body("99"))
            }),
        );
        let fallback = Router::new().route(AUTH_PATH, get(|| async { Json(auth_body("5")) }));

        let primary_url = serve(primary).await;
        let fallback_url = serve(fallback).await;

        let client = ServiceClient::new(&config_for(primary_url, vec![fallback_url])).unwrap();
        assert_eq!(client.get_nonce("lskexample").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn rotation_walks_the_fallbacks_in_order_without_revisiting() {
        let primary_hits = Arc::new(AtomicUsize::new(0));
        let hits = primary_hits.clone();
        let primary = Router::new().route(
            AUTH_PATH,
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2_000)).await;
                    Json(auth_body("99"))
                }
            }),
        );
        let first = Router::new().route(
            AUTH_PATH,
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
        );
        let second = Router::new().route(AUTH_PATH, get(|| async { Json(auth_body("12")) }));

        let primary_url = serve(primary).await;
        let first_url = serve(first).await;
        let second_url = serve(second).await;

        let client =
            ServiceClient::new(&config_for(primary_url, vec![first_url, second_url])).unwrap();
        assert_eq!(client.get_nonce("lskexample").await.unwrap(), 12);
        assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_lone_timeout_surfaces_the_deadline() {
        let app = Router::new().route(
            AUTH_PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_millis(2_000)).await;
                Json(auth_body("99"))
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let err = client.get_nonce("lskexample").await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Timeout { timeout_ms: 400, .. }
        ));
    }

    #[tokio::test]
    async fn exhausting_every_endpoint_is_unavailable() {
        let broken = || {
            Router::new().route(
                AUTH_PATH,
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
            )
        };
        let primary_url = serve(broken()).await;
        let fallback_url = serve(broken()).await;

        let client = ServiceClient::new(&config_for(primary_url, vec![fallback_url])).unwrap();
        let err = client.get_nonce("lskexample").await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Unavailable { attempts: 2, .. }
        ));
    }

    #[tokio::test]
    async fn broadcast_posts_the_hex_payload_and_returns_the_ack() {
        let app = Router::new().route(
            TRANSACTIONS_PATH,
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["transaction"], json!("0a05746f6b656e"));
                Json(json!({
                    "transactionID": "65c28137c45c6f2b01028b3e074e25b3ff1f33ca",
                    "message": "Transaction payload was successfully passed to the network node",
                }))
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let ack = client.post_transaction("0a05746f6b656e").await.unwrap();
        assert_eq!(
            ack.transaction_id,
            "65c28137c45c6f2b01028b3e074e25b3ff1f33ca"
        );
        assert!(ack.message.is_some());
    }

    #[tokio::test]
    async fn broadcast_rejection_carries_the_service_message() {
        let app = Router::new().route(
            TRANSACTIONS_PATH,
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": true,
                        "message": "Transaction verification failed: nonce is lower than account nonce",
                    })),
                )
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let err = client.post_transaction("0a00").await.unwrap_err();
        match err {
            AdapterError::BroadcastRejected { message } => {
                assert!(message.contains("nonce is lower"));
            }
            other => panic!("expected BroadcastRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn broadcast_without_a_transaction_id_is_a_rejection() {
        let app = Router::new().route(
            TRANSACTIONS_PATH,
            post(|| async { Json(json!({"message": "queued"})) }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let err = client.post_transaction("0a00").await.unwrap_err();
        assert!(matches!(err, AdapterError::BroadcastRejected { .. }));
    }

    #[tokio::test]
    async fn broadcast_with_an_empty_transaction_id_is_a_rejection() {
        let app = Router::new().route(
            TRANSACTIONS_PATH,
            post(|| async { Json(json!({"transactionID": "", "message": "ok"})) }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let err = client.post_transaction("0a00").await.unwrap_err();
        match err {
            AdapterError::BroadcastRejected { message } => assert_eq!(message, "ok"),
            other => panic!("expected BroadcastRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn available_balance_reads_the_matching_token_row() {
        let app = Router::new().route(
            TOKEN_BALANCES_PATH,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(
                    params.get("tokenID").map(String::as_str),
                    Some("0100000000000000")
                );
                Json(json!({
                    "data": [
                        {"tokenID": "0400000000000000", "availableBalance": "1"},
                        {"tokenID": "0100000000000000", "availableBalance": "2500000000"},
                    ],
                    "meta": {"count": 2, "offset": 0, "total": 2},
                }))
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let balance = client
            .get_available_balance("lskexample", "0100000000000000")
            .await
            .unwrap();
        assert_eq!(balance, 2_500_000_000);
    }

    #[tokio::test]
    async fn missing_balance_rows_read_as_account_not_found() {
        let app = Router::new().route(
            TOKEN_BALANCES_PATH,
            get(|| async { Json(json!({"data": [], "meta": {"count": 0, "offset": 0, "total": 0}})) }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let err = client
            .get_available_balance("lskempty", "0100000000000000")
            .await
            .unwrap_err();
        match err {
            AdapterError::AccountNotFound { address, what } => {
                assert_eq!(address, "lskempty");
                assert_eq!(what, "balance records");
            }
            other => panic!("expected AccountNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transactions_come_back_normalized() {
        let app = Router::new().route(
            TRANSACTIONS_PATH,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(
                    params.get("moduleCommand").map(String::as_str),
                    Some("token:transfer")
                );
                assert_eq!(params.get("sort").map(String::as_str), Some("timestamp:desc"));
                Json(json!({
                    "data": [{
                        "id": "adb12f2a",
                        "moduleCommand": "token:transfer",
                        "nonce": "2",
                        "fee": "200000",
                        "sender": {"address": "lskexample"},
                        "params": {
                            "tokenID": "0100000000000000",
                            "amount": "150000000",
                            "recipientAddress": "lskrecipient",
                            "data": "rent",
                        },
                    }],
                    "meta": {"count": 1, "offset": 0, "total": 1},
                }))
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let transactions = client
            .get_transactions(&TransactionQuery::transfers_from("lskexample"))
            .await
            .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].memo.as_deref(), Some("rent"));
    }

    #[tokio::test]
    async fn last_block_height_reads_the_chain_tip() {
        let app = Router::new().route(
            BLOCKS_PATH,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("limit").map(String::as_str), Some("1"));
                assert_eq!(params.get("sort").map(String::as_str), Some("height:desc"));
                Json(json!({
                    "data": [{"id": "01e6b8", "height": 8344, "timestamp": 1755900000u64}],
                    "meta": {"count": 1, "offset": 0, "total": 8344},
                }))
            }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        assert_eq!(client.get_last_block_height().await.unwrap(), 8344);
    }

    #[tokio::test]
    async fn an_empty_chain_tip_is_a_repository_error() {
        let app = Router::new().route(
            BLOCKS_PATH,
            get(|| async { Json(json!({"data": [], "meta": {"count": 0, "offset": 0, "total": 0}})) }),
        );
        let url = serve(app).await;

        let client = ServiceClient::new(&config_for(url, Vec::new())).unwrap();
        let err = client.get_last_block_height().await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Repository {
                operation: "get blocks",
                status: 200,
                ..
            }
        ));
    }
}
