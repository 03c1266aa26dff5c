//! Block: one immutable, hash-sealed unit of the ledger.
//!
//! A block starts unsealed: the payload is encoded at construction, but
//! height, timestamp and previous hash belong to the ledger and are only
//! assigned at seal time. Sealing computes the hash; after that the block
//! never changes.

use serde::{Deserialize, Serialize};

use crate::canonical::{decode_body, encode_body, sealed_fields_bytes};
use crate::error::{CoreError, DecodeError, HashMismatch};
use crate::types::{BlockHash, WalletAddress};

/// The fixed marker carried by the genesis block.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// A registered star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    /// Right ascension, e.g. `"16h 29m 1.0s"`.
    pub ra: String,
    /// Declination, e.g. `"-26 deg 29' 24.9"`.
    pub dec: String,
    /// The owner's story for this star.
    pub story: String,
}

/// The structured payload of a star block: the full admission evidence.
///
/// Keeping message and signature alongside the star means the chain itself
/// records why the entry was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEntry {
    /// The wallet that proved ownership.
    pub address: WalletAddress,
    /// The challenge message the wallet signed.
    pub message: String,
    /// Hex-encoded Ed25519 signature over the message.
    pub signature: String,
    /// The star being registered.
    pub star: Star,
}

/// The decoded payload of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockBody {
    /// The fixed marker payload of block 0.
    Genesis {
        /// Always [`GENESIS_MARKER`].
        data: String,
    },
    /// A star registration admitted through the ownership protocol.
    Entry(StarEntry),
}

impl BlockBody {
    /// The genesis payload.
    pub fn genesis() -> Self {
        Self::Genesis {
            data: GENESIS_MARKER.to_string(),
        }
    }

    /// The star entry, if this is a registration payload.
    pub fn as_entry(&self) -> Option<&StarEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Genesis { .. } => None,
        }
    }
}

/// A block whose payload is fixed but whose position is not yet assigned.
///
/// Produced by [`UnsealedBlock::new`], consumed by [`UnsealedBlock::seal`].
/// There is no way back from sealed to unsealed.
#[derive(Debug, Clone)]
pub struct UnsealedBlock {
    body: String,
}

impl UnsealedBlock {
    /// Encode a payload into a block awaiting its position in the ledger.
    pub fn new(body: &BlockBody) -> Result<Self, CoreError> {
        Ok(Self {
            body: encode_body(body)?,
        })
    }

    /// The encoded body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Assign the positional fields and compute the hash.
    ///
    /// The hash is a Blake3 digest over the canonical bytes of every
    /// other field; it is never an input to its own computation. This is
    /// the point after which the block is immutable.
    pub fn seal(self, height: u64, timestamp: i64, previous_hash: Option<BlockHash>) -> Block {
        let digest = sealed_fields_bytes(height, timestamp, previous_hash.as_ref(), &self.body);
        Block {
            height,
            timestamp,
            previous_hash,
            body: self.body,
            hash: BlockHash::from_bytes(*blake3::hash(&digest).as_bytes()),
        }
    }
}

/// A sealed block.
///
/// Immutable once sealed; every field but `hash` is covered by `hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the ledger. 0 is the genesis block.
    pub height: u64,

    /// Seal time, Unix seconds.
    pub timestamp: i64,

    /// Hash of the block below, `None` for the genesis block.
    pub previous_hash: Option<BlockHash>,

    /// The encoded payload: hex of the CBOR-serialized [`BlockBody`].
    pub body: String,

    /// Blake3 digest over the other four fields at seal time.
    pub hash: BlockHash,
}

impl Block {
    /// Recompute the digest over the current field values.
    pub fn compute_hash(&self) -> BlockHash {
        let digest =
            sealed_fields_bytes(self.height, self.timestamp, self.previous_hash.as_ref(), &self.body);
        BlockHash::from_bytes(*blake3::hash(&digest).as_bytes())
    }

    /// Check the sealed hash against the current field values.
    ///
    /// Detects post-seal tampering with height, timestamp, previous hash
    /// or body; the mismatch carries both digests.
    pub fn validate(&self) -> Result<(), HashMismatch> {
        let computed = self.compute_hash();
        if computed == self.hash {
            Ok(())
        } else {
            Err(HashMismatch {
                height: self.height,
                sealed: self.hash,
                computed,
            })
        }
    }

    /// Decode the stored body back into its structured payload.
    pub fn decode_body(&self) -> Result<BlockBody, DecodeError> {
        decode_body(&self.body)
    }

    /// Whether this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash.is_none()
    }
}
