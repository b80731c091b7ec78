// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical schema-driven codec for the transaction wire format.
//!
//! This module provides functionality for:
//! - Encoding a value map to canonical bytes, walking the schema's fields
//!   in ascending tag order regardless of how the caller assembled the map
//! - Decoding wire bytes back to a value map, rejecting anything a canonical
//!   encoder could not have produced
//!
//! Canonical output matters because signatures cover the encoded bytes: two
//! encodings of the same logical transaction must be byte-identical.

pub mod schema;
mod wire;

use crate::error::AdapterError;

pub use schema::{FieldKind, FieldSpec, Schema, Value, ValueMap};
pub use schema::{TRANSACTION_SCHEMA, TRANSFER_PARAMS_SCHEMA};

fn violation(schema: &Schema, reason: impl Into<String>) -> AdapterError {
    AdapterError::SchemaViolation {
        schema: schema.id,
        reason: reason.into(),
    }
}

/// Encode `value` with `schema` into canonical wire bytes.
///
/// Every schema field must be present in the map; a `BytesList` may be
/// empty, which encodes to nothing. Fields the schema does not know are
/// rejected rather than silently dropped.
pub fn encode(schema: &Schema, value: &ValueMap) -> Result<Vec<u8>, AdapterError> {
    debug_assert!(schema.is_canonical());

    for name in value.keys() {
        if schema.field_by_name(name).is_none() {
            return Err(violation(schema, format!("unknown field `{name}`")));
        }
    }

    let mut out = Vec::new();
    for field in schema.fields {
        let entry = value
            .get(field.name)
            .ok_or_else(|| violation(schema, format!("missing required field `{}`", field.name)))?;
        encode_field(schema, field, entry, &mut out)?;
    }
    Ok(out)
}

fn encode_field(
    schema: &Schema,
    field: &FieldSpec,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), AdapterError> {
    match (field.kind, value) {
        (FieldKind::U32, Value::U32(n)) => {
            wire::write_key(out, field.tag, wire::WIRE_VARINT);
            wire::write_uvarint(out, u64::from(*n));
        }
        (FieldKind::U64, Value::U64(n)) => {
            wire::write_key(out, field.tag, wire::WIRE_VARINT);
            wire::write_uvarint(out, *n);
        }
        (FieldKind::Bytes, Value::Bytes(bytes)) => {
            check_len(schema, field, bytes.len())?;
            wire::write_key(out, field.tag, wire::WIRE_BYTES);
            wire::write_length_prefixed(out, bytes);
        }
        (FieldKind::Text, Value::Text(text)) => {
            check_len(schema, field, text.len())?;
            wire::write_key(out, field.tag, wire::WIRE_BYTES);
            wire::write_length_prefixed(out, text.as_bytes());
        }
        (FieldKind::Object(nested), Value::Object(map)) => {
            let inner = encode(nested, map)?;
            wire::write_key(out, field.tag, wire::WIRE_BYTES);
            wire::write_length_prefixed(out, &inner);
        }
        (FieldKind::BytesList, Value::BytesList(items)) => {
            for item in items {
                check_len(schema, field, item.len())?;
                wire::write_key(out, field.tag, wire::WIRE_BYTES);
                wire::write_length_prefixed(out, item);
            }
        }
        (kind, other) => {
            return Err(violation(
                schema,
                format!(
                    "field `{}` expects {} but got {}",
                    field.name,
                    kind.label(),
                    other.kind_name()
                ),
            ));
        }
    }
    Ok(())
}

fn check_len(schema: &Schema, field: &FieldSpec, len: usize) -> Result<(), AdapterError> {
    if let Some(min) = field.min_len {
        if len < min {
            return Err(violation(
                schema,
                format!("field `{}` is {len} bytes, minimum is {min}", field.name),
            ));
        }
    }
    if let Some(max) = field.max_len {
        if len > max {
            return Err(violation(
                schema,
                format!("field `{}` is {len} bytes, maximum is {max}", field.name),
            ));
        }
    }
    Ok(())
}

/// Decode canonical wire bytes with `schema`.
///
/// Exact inverse of [`encode`]: out-of-order or duplicate fields, unknown
/// tags, length-bound violations, and malformed varints are all rejected,
/// so `decode(encode(v)) == v` and re-encoding a decoded map reproduces the
/// input bytes.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<ValueMap, AdapterError> {
    debug_assert!(schema.is_canonical());

    let mut out = ValueMap::new();
    let mut pos = 0usize;
    let mut last_tag = 0u32;
    while pos < bytes.len() {
        let (tag, wire_type) =
            wire::read_key(bytes, &mut pos).map_err(|reason| violation(schema, reason))?;
        let field = schema
            .field_by_tag(tag)
            .ok_or_else(|| violation(schema, format!("unknown field tag {tag}")))?;
        if tag < last_tag {
            return Err(violation(
                schema,
                format!("field `{}` out of canonical order", field.name),
            ));
        }
        if tag == last_tag && !matches!(field.kind, FieldKind::BytesList) {
            return Err(violation(schema, format!("duplicate field `{}`", field.name)));
        }
        last_tag = tag;
        decode_field(schema, field, wire_type, bytes, &mut pos, &mut out)?;
    }

    for field in schema.fields {
        if !out.contains_key(field.name) {
            if matches!(field.kind, FieldKind::BytesList) {
                out.insert(field.name, Value::BytesList(Vec::new()));
            } else {
                return Err(violation(
                    schema,
                    format!("missing required field `{}`", field.name),
                ));
            }
        }
    }
    Ok(out)
}

fn decode_field(
    schema: &Schema,
    field: &FieldSpec,
    wire_type: u8,
    bytes: &[u8],
    pos: &mut usize,
    out: &mut ValueMap,
) -> Result<(), AdapterError> {
    let expected = match field.kind {
        FieldKind::U32 | FieldKind::U64 => wire::WIRE_VARINT,
        _ => wire::WIRE_BYTES,
    };
    if wire_type != expected {
        return Err(violation(
            schema,
            format!(
                "field `{}` has wire type {wire_type}, expected {expected}",
                field.name
            ),
        ));
    }

    match field.kind {
        FieldKind::U32 => {
            let raw = wire::read_uvarint(bytes, pos).map_err(|reason| violation(schema, reason))?;
            let value = u32::try_from(raw).map_err(|_| {
                violation(
                    schema,
                    format!("field `{}` value {raw} overflows u32", field.name),
                )
            })?;
            out.insert(field.name, Value::U32(value));
        }
        FieldKind::U64 => {
            let value =
                wire::read_uvarint(bytes, pos).map_err(|reason| violation(schema, reason))?;
            out.insert(field.name, Value::U64(value));
        }
        FieldKind::Bytes => {
            let payload = wire::read_length_prefixed(bytes, pos)
                .map_err(|reason| violation(schema, reason))?;
            check_len(schema, field, payload.len())?;
            out.insert(field.name, Value::Bytes(payload.to_vec()));
        }
        FieldKind::Text => {
            let payload = wire::read_length_prefixed(bytes, pos)
                .map_err(|reason| violation(schema, reason))?;
            check_len(schema, field, payload.len())?;
            let text = std::str::from_utf8(payload).map_err(|_| {
                violation(schema, format!("field `{}` is not valid UTF-8", field.name))
            })?;
            out.insert(field.name, Value::Text(text.to_string()));
        }
        FieldKind::Object(nested) => {
            let payload = wire::read_length_prefixed(bytes, pos)
                .map_err(|reason| violation(schema, reason))?;
            let map = decode(nested, payload)?;
            out.insert(field.name, Value::Object(map));
        }
        FieldKind::BytesList => {
            let payload = wire::read_length_prefixed(bytes, pos)
                .map_err(|reason| violation(schema, reason))?;
            check_len(schema, field, payload.len())?;
            match out.get_mut(field.name) {
                Some(Value::BytesList(items)) => items.push(payload.to_vec()),
                _ => {
                    out.insert(field.name, Value::BytesList(vec![payload.to_vec()]));
                }
            }
        }
    }
    Ok(())
}
