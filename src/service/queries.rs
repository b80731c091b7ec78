// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed query builders for the Lisk Service read endpoints.
//!
//! The service takes its filters as URL query parameters with a small
//! grammar: numeric filters accept closed or half-open ranges rendered as
//! `min:max`, and sorting is a `field:direction` token. The builders here
//! own that rendering so call sites never concatenate filter strings, and
//! each endpoint only offers the filters it actually supports.

pub const AUTH_PATH: &str = "/api/v3/auth";
pub const TOKEN_BALANCES_PATH: &str = "/api/v3/token/balances";
pub const TRANSACTIONS_PATH: &str = "/api/v3/transactions";
pub const BLOCKS_PATH: &str = "/api/v3/blocks";

/// `moduleCommand` value of token transfers.
pub const MODULE_COMMAND_TRANSFER: &str = "token:transfer";

/// Inclusive numeric range, rendered as `min:max` with either side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFilter {
    min: Option<u64>,
    max: Option<u64>,
}

impl RangeFilter {
    pub fn at_least(min: u64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: u64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: u64, max: u64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn render(self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{min}:{max}"),
            (Some(min), None) => format!("{min}:"),
            (None, Some(max)) => format!(":{max}"),
            (None, None) => ":".to_string(),
        }
    }
}

/// Sort orders the transaction index accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSort {
    AmountAsc,
    AmountDesc,
    TimestampAsc,
    TimestampDesc,
}

impl TransactionSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmountAsc => "amount:asc",
            Self::AmountDesc => "amount:desc",
            Self::TimestampAsc => "timestamp:asc",
            Self::TimestampDesc => "timestamp:desc",
        }
    }
}

/// Sort orders the auth/account index accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSort {
    BalanceAsc,
    BalanceDesc,
}

impl AuthSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BalanceAsc => "balance:asc",
            Self::BalanceDesc => "balance:desc",
        }
    }
}

/// Sort orders the block index accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSort {
    HeightAsc,
    HeightDesc,
    TimestampAsc,
    TimestampDesc,
}

impl BlockSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeightAsc => "height:asc",
            Self::HeightDesc => "height:desc",
            Self::TimestampAsc => "timestamp:asc",
            Self::TimestampDesc => "timestamp:desc",
        }
    }
}

/// Lookup of an account's authentication state. Keyed by address; the
/// remaining filters narrow or page the account listing.
#[derive(Debug, Clone)]
pub struct AuthQuery {
    address: String,
    public_key: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
    sort: Option<AuthSort>,
}

impl AuthQuery {
    pub fn for_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            public_key: None,
            limit: None,
            offset: None,
            sort: None,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_sort(mut self, sort: AuthSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("address", self.address.clone())];
        if let Some(public_key) = &self.public_key {
            pairs.push(("publicKey", public_key.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}

/// Lookup of an account's token balances, optionally narrowed to one token.
#[derive(Debug, Clone)]
pub struct BalanceQuery {
    address: String,
    token_id: Option<String>,
}

impl BalanceQuery {
    pub fn for_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token_id: None,
        }
    }

    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("address", self.address.clone())];
        if let Some(token_id) = &self.token_id {
            pairs.push(("tokenID", token_id.clone()));
        }
        pairs
    }
}

/// Filter over the transaction index.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    transaction_id: Option<String>,
    module_command: Option<String>,
    sender_address: Option<String>,
    recipient_address: Option<String>,
    block_id: Option<String>,
    nonce: Option<u64>,
    amount: Option<RangeFilter>,
    timestamp: Option<RangeFilter>,
    height: Option<RangeFilter>,
    include_pending: bool,
    limit: Option<u32>,
    offset: Option<u32>,
    sort: Option<TransactionSort>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token transfers sent by one account, newest first.
    pub fn transfers_from(sender_address: impl Into<String>) -> Self {
        Self::new()
            .with_sender_address(sender_address)
            .with_module_command(MODULE_COMMAND_TRANSFER)
            .with_sort(TransactionSort::TimestampDesc)
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_module_command(mut self, module_command: impl Into<String>) -> Self {
        self.module_command = Some(module_command.into());
        self
    }

    pub fn with_sender_address(mut self, address: impl Into<String>) -> Self {
        self.sender_address = Some(address.into());
        self
    }

    pub fn with_recipient_address(mut self, address: impl Into<String>) -> Self {
        self.recipient_address = Some(address.into());
        self
    }

    pub fn with_block_id(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    /// Filter by nonce. Only meaningful together with a sender address.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_amount(mut self, range: RangeFilter) -> Self {
        self.amount = Some(range);
        self
    }

    pub fn with_timestamp(mut self, range: RangeFilter) -> Self {
        self.timestamp = Some(range);
        self
    }

    pub fn with_height(mut self, range: RangeFilter) -> Self {
        self.height = Some(range);
        self
    }

    /// Also return transactions still in the pool.
    pub fn including_pending(mut self) -> Self {
        self.include_pending = true;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_sort(mut self, sort: TransactionSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.transaction_id {
            pairs.push(("transactionID", id.clone()));
        }
        if let Some(module_command) = &self.module_command {
            pairs.push(("moduleCommand", module_command.clone()));
        }
        if let Some(address) = &self.sender_address {
            pairs.push(("senderAddress", address.clone()));
        }
        if let Some(address) = &self.recipient_address {
            pairs.push(("recipientAddress", address.clone()));
        }
        // The transaction index spells this one with a capital D, unlike
        // the block index.
        if let Some(block_id) = &self.block_id {
            pairs.push(("blockID", block_id.clone()));
        }
        if let Some(nonce) = self.nonce {
            pairs.push(("nonce", nonce.to_string()));
        }
        if let Some(range) = self.amount {
            pairs.push(("amount", range.render()));
        }
        if let Some(range) = self.timestamp {
            pairs.push(("timestamp", range.render()));
        }
        if let Some(range) = self.height {
            pairs.push(("height", range.render()));
        }
        if self.include_pending {
            pairs.push(("includePending", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}

/// Filter over the block index.
#[derive(Debug, Clone, Default)]
pub struct BlockQuery {
    block_id: Option<String>,
    generator_address: Option<String>,
    height: Option<RangeFilter>,
    timestamp: Option<RangeFilter>,
    limit: Option<u32>,
    offset: Option<u32>,
    sort: Option<BlockSort>,
}

impl BlockQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain tip: the single newest block.
    pub fn latest() -> Self {
        Self::new().with_sort(BlockSort::HeightDesc).with_limit(1)
    }

    pub fn with_block_id(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    pub fn with_generator_address(mut self, address: impl Into<String>) -> Self {
        self.generator_address = Some(address.into());
        self
    }

    pub fn with_height(mut self, range: RangeFilter) -> Self {
        self.height = Some(range);
        self
    }

    pub fn with_timestamp(mut self, range: RangeFilter) -> Self {
        self.timestamp = Some(range);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_sort(mut self, sort: BlockSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(block_id) = &self.block_id {
            pairs.push(("blockId", block_id.clone()));
        }
        if let Some(address) = &self.generator_address {
            pairs.push(("generatorAddress", address.clone()));
        }
        if let Some(range) = self.height {
            pairs.push(("height", range.render()));
        }
        if let Some(range) = self.timestamp {
            pairs.push(("timestamp", range.render()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}
