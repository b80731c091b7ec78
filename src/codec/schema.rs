// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative wire schemas and the dynamic values they describe.
//!
//! A [`Schema`] is pure data: an identifier plus field descriptors declared
//! in ascending tag order. The codec walks the descriptors to produce
//! canonical bytes; nothing here performs encoding itself.
//!
//! Transactions use two layered schemas: command parameters are encoded with
//! their own schema first, then embedded as an opaque `params` bytes field
//! inside the envelope.

use std::collections::BTreeMap;

/// Field wire kinds supported by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Varint, at most 32 bits of value
    U32,
    /// Varint, full 64-bit range
    U64,
    /// Length-prefixed byte string
    Bytes,
    /// Length-prefixed UTF-8 string
    Text,
    /// Length-prefixed nested object with its own schema
    Object(&'static Schema),
    /// Repeated length-prefixed byte strings, one key per item
    BytesList,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::Bytes => "bytes",
            FieldKind::Text => "string",
            FieldKind::Object(_) => "object",
            FieldKind::BytesList => "bytes list",
        }
    }
}

/// One field of a schema.
///
/// `min_len`/`max_len` bound the byte length of `Bytes` and `Text` fields
/// and of each item of a `BytesList`; they are ignored for integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub tag: u32,
    pub kind: FieldKind,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

/// An immutable wire schema.
///
/// Invariant: `fields` are declared in strictly ascending tag order, so
/// iterating the slice is already the canonical encoding order.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub id: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field_by_tag(&self, tag: u32) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.tag == tag)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether the declared field order satisfies the ascending-tag invariant.
    pub fn is_canonical(&self) -> bool {
        self.fields
            .windows(2)
            .all(|pair| pair[0].tag < pair[1].tag)
    }
}

/// A dynamic value matching some [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U32(u32),
    U64(u64),
    Bytes(Vec<u8>),
    Text(String),
    Object(ValueMap),
    BytesList(Vec<Vec<u8>>),
}

/// Field name to value mapping the codec consumes and produces.
pub type ValueMap = BTreeMap<&'static str, Value>;

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "string",
            Value::Object(_) => "object",
            Value::BytesList(_) => "bytes list",
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes_list(&self) -> Option<&[Vec<u8>]> {
        match self {
            Value::BytesList(items) => Some(items),
            _ => None,
        }
    }
}

/// Transaction envelope schema.
///
/// `params` carries the command parameters pre-encoded with their own
/// schema; `signatures` is empty in the unsigned form that gets signed.
pub static TRANSACTION_SCHEMA: Schema = Schema {
    id: "transaction",
    fields: &[
        FieldSpec {
            name: "module",
            tag: 1,
            kind: FieldKind::Text,
            min_len: Some(1),
            max_len: Some(32),
        },
        FieldSpec {
            name: "command",
            tag: 2,
            kind: FieldKind::Text,
            min_len: Some(1),
            max_len: Some(32),
        },
        FieldSpec {
            name: "nonce",
            tag: 3,
            kind: FieldKind::U64,
            min_len: None,
            max_len: None,
        },
        FieldSpec {
            name: "fee",
            tag: 4,
            kind: FieldKind::U64,
            min_len: None,
            max_len: None,
        },
        FieldSpec {
            name: "senderPublicKey",
            tag: 5,
            kind: FieldKind::Bytes,
            min_len: Some(32),
            max_len: Some(32),
        },
        FieldSpec {
            name: "params",
            tag: 6,
            kind: FieldKind::Bytes,
            min_len: None,
            max_len: None,
        },
        FieldSpec {
            name: "signatures",
            tag: 7,
            kind: FieldKind::BytesList,
            min_len: Some(64),
            max_len: Some(64),
        },
    ],
};

/// Token transfer parameters schema.
pub static TRANSFER_PARAMS_SCHEMA: Schema = Schema {
    id: "token/transfer",
    fields: &[
        FieldSpec {
            name: "tokenID",
            tag: 1,
            kind: FieldKind::Bytes,
            min_len: Some(8),
            max_len: Some(8),
        },
        FieldSpec {
            name: "amount",
            tag: 2,
            kind: FieldKind::U64,
            min_len: None,
            max_len: None,
        },
        FieldSpec {
            name: "recipientAddress",
            tag: 3,
            kind: FieldKind::Bytes,
            min_len: Some(20),
            max_len: Some(20),
        },
        FieldSpec {
            name: "data",
            tag: 4,
            kind: FieldKind::Text,
            min_len: Some(0),
            max_len: Some(64),
        },
    ],
};
