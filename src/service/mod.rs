// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lisk Service integration: typed queries, response types, and the
//! rotating HTTP client.

pub mod client;
pub mod queries;
pub mod types;

pub use client::ServiceClient;
