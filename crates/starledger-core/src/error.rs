//! Error types for starledger core.

use thiserror::Error;

use crate::types::BlockHash;

/// Core errors for cryptographic and encoding operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("malformed signature encoding")]
    MalformedSignature,

    #[error("payload encoding error: {0}")]
    Encoding(String),
}

/// Failure to decode a block body from its stored encoded form.
///
/// Decoding is an explicit step distinct from reading the block; a sealed
/// block with an undecodable body is still a valid link in the chain.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("body is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("body is not a valid payload: {0}")]
    Cbor(String),
}

/// A sealed block whose recomputed digest disagrees with its stored hash.
///
/// Evidence of post-seal tampering with height, timestamp, previous hash,
/// or body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("block {height} hash mismatch: sealed {sealed}, computed {computed}")]
pub struct HashMismatch {
    /// Height of the offending block.
    pub height: u64,
    /// The hash stored at seal time.
    pub sealed: BlockHash,
    /// The digest over the block's current field values.
    pub computed: BlockHash,
}
