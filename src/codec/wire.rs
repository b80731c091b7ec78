// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Low-level wire primitives: LEB128 varints and field keys.
//!
//! A field key packs `(tag << 3) | wire_type` into a single varint. Only the
//! two wire types the protocol uses are defined here: `0` for varints and `2`
//! for length-delimited payloads.

/// Wire type for varint-encoded integers.
pub(crate) const WIRE_VARINT: u8 = 0;

/// Wire type for length-delimited payloads (bytes, strings, nested objects).
pub(crate) const WIRE_BYTES: u8 = 2;

/// Largest tag number a key can carry.
const MAX_TAG: u64 = (u32::MAX >> 3) as u64;

/// A u64 varint never exceeds ten bytes.
const MAX_VARINT_BYTES: usize = 10;

pub(crate) fn write_uvarint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Read a varint at `*pos`, advancing `*pos` past it.
///
/// Rejects truncated input, values that overflow u64, and non-minimal
/// encodings (a multi-byte varint ending in a zero byte), so that every
/// value has exactly one accepted byte representation.
pub(crate) fn read_uvarint(buf: &[u8], pos: &mut usize) -> Result<u64, String> {
    let mut result: u64 = 0;
    let mut index = 0usize;
    loop {
        if index >= MAX_VARINT_BYTES {
            return Err("varint exceeds 10 bytes".to_string());
        }
        let Some(&byte) = buf.get(*pos + index) else {
            return Err("varint ends past the end of input".to_string());
        };
        if index == MAX_VARINT_BYTES - 1 && byte > 0x01 {
            return Err("varint overflows u64".to_string());
        }
        result |= u64::from(byte & 0x7f) << (7 * index as u32);
        index += 1;
        if byte & 0x80 == 0 {
            if byte == 0 && index > 1 {
                return Err("varint has a redundant trailing zero byte".to_string());
            }
            *pos += index;
            return Ok(result);
        }
    }
}

pub(crate) fn write_key(out: &mut Vec<u8>, tag: u32, wire_type: u8) {
    write_uvarint(out, (u64::from(tag) << 3) | u64::from(wire_type));
}

/// Read a field key, returning `(tag, wire_type)`.
pub(crate) fn read_key(buf: &[u8], pos: &mut usize) -> Result<(u32, u8), String> {
    let key = read_uvarint(buf, pos)?;
    let tag = key >> 3;
    if tag == 0 || tag > MAX_TAG {
        return Err(format!("field tag {tag} out of range"));
    }
    Ok((tag as u32, (key & 0x07) as u8))
}

pub(crate) fn write_length_prefixed(out: &mut Vec<u8>, payload: &[u8]) {
    write_uvarint(out, payload.len() as u64);
    out.extend_from_slice(payload);
}

/// Read a length-prefixed payload, advancing `*pos` past it.
pub(crate) fn read_length_prefixed<'a>(buf: &'a [u8], pos: &mut usize) -> Result<&'a [u8], String> {
    let declared = read_uvarint(buf, pos)?;
    let len = usize::try_from(declared).map_err(|_| "length prefix overflows usize".to_string())?;
    let end = pos
        .checked_add(len)
        .filter(|&end| end <= buf.len())
        .ok_or_else(|| {
            format!(
                "length prefix {len} exceeds the {} remaining bytes",
                buf.len() - *pos
            )
        })?;
    let payload = &buf[*pos..end];
    *pos = end;
    Ok(payload)
}
