//! Canonical encoding for block digests and the payload codec.
//!
//! The digest pre-image of a block follows RFC 8949 Core Deterministic
//! Encoding:
//! - Integer map keys, written in ascending order
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 seconds)
//!
//! The canonical encoding is critical: it ensures that the same logical
//! block produces identical bytes (and thus an identical hash) no matter
//! who computes it.
//!
//! Payload bodies take a different path: a [`BlockBody`] is serialized
//! with CBOR and stored hex-encoded, so "decoding the payload" is an
//! explicit, fallible operation separate from reading the block.

use crate::block::BlockBody;
use crate::error::{CoreError, DecodeError};
use crate::types::BlockHash;

/// Sealed-field keys. Keys 0-23 encode as single bytes in CBOR, and are
/// written in ascending order, so the map is canonical by construction.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const TIMESTAMP: u64 = 1;
    pub const PREV_HASH: u64 = 2;
    pub const BODY: u64 = 3;
}

/// Encode the digest pre-image of a block: a canonical CBOR map over
/// every sealed field except the hash itself.
pub fn sealed_fields_bytes(
    height: u64,
    timestamp: i64,
    previous_hash: Option<&BlockHash>,
    body: &str,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(body.len() + 64);

    // Map header: 4 entries
    encode_uint(&mut buf, 5, 4);

    // 0: height
    encode_uint(&mut buf, 0, keys::HEIGHT);
    encode_uint(&mut buf, 0, height);

    // 1: timestamp
    encode_uint(&mut buf, 0, keys::TIMESTAMP);
    encode_int(&mut buf, timestamp);

    // 2: previous_hash (null sentinel for the genesis block)
    encode_uint(&mut buf, 0, keys::PREV_HASH);
    match previous_hash {
        Some(hash) => encode_bytes(&mut buf, hash.as_bytes()),
        None => buf.push(0xf6),
    }

    // 3: body (already hex text, fixed at construction time)
    encode_uint(&mut buf, 0, keys::BODY);
    encode_text(&mut buf, body);

    buf
}

/// Serialize a payload and hex-encode it into a block's stored body form.
pub fn encode_body(body: &BlockBody) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(body, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
    Ok(hex::encode(buf))
}

/// Decode a stored body back into its structured payload.
pub fn decode_body(encoded: &str) -> Result<BlockBody, DecodeError> {
    let bytes = hex::decode(encoded)?;
    ciborium::from_reader(bytes.as_slice()).map_err(|e| DecodeError::Cbor(e.to_string()))
}

/// Encode a signed CBOR integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}
