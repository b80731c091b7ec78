// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-address transaction sequence tracking.
//!
//! The tracker hands out nonces for locally built transactions. It only
//! ever moves forward: seeding adopts a remote value when it is greater
//! than the held one, and [`NonceTracker::next`] is an atomic
//! read-and-increment, so concurrent builders on the same address can never
//! receive the same nonce. A consumed nonce is not returned on a failed
//! broadcast; the transaction may have reached the network before the
//! failure was observed, and reusing its nonce would conflict with it.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Tracks the next unused nonce per account address.
#[derive(Debug, Default)]
pub struct NonceTracker {
    counters: Mutex<HashMap<String, u64>>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a remotely reported nonce, but only if it is greater than the
    /// held value. An address never seen before starts from the remote
    /// value; a remote value at or below the held one leaves it unchanged.
    pub async fn seed(&self, address: &str, remote_nonce: u64) {
        let mut counters = self.counters.lock().await;
        let held = counters.entry(address.to_string()).or_insert(0);
        if remote_nonce > *held {
            *held = remote_nonce;
        }
    }

    /// Return the current nonce for `address` and advance it by one, as a
    /// single indivisible step. Unseeded addresses start at zero.
    pub async fn next(&self, address: &str) -> u64 {
        let mut counters = self.counters.lock().await;
        let held = counters.entry(address.to_string()).or_insert(0);
        let nonce = *held;
        *held += 1;
        nonce
    }

    /// The nonce the next call to [`NonceTracker::next`] would return.
    pub async fn peek(&self, address: &str) -> u64 {
        self.counters
            .lock()
            .await
            .get(address)
            .copied()
            .unwrap_or(0)
    }
}
