//! # Starledger Core
//!
//! Pure primitives for the starledger: blocks, the star-registration
//! payload model, and canonical encoding.
//!
//! This crate contains no clocks, no locking, no logging of state
//! transitions. It is pure computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable, hash-sealed unit of the ledger
//! - [`UnsealedBlock`] - A block whose positional fields are not yet set
//! - [`BlockBody`] - The decoded payload (genesis marker or star entry)
//! - [`BlockHash`] - Blake3 content digest of a sealed block
//! - [`WalletAddress`] - Hex form of an Ed25519 verifying key
//!
//! ## Canonicalization
//!
//! The digest pre-image of a block is deterministic CBOR. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod types;

pub use block::{Block, BlockBody, Star, StarEntry, UnsealedBlock, GENESIS_MARKER};
pub use canonical::{decode_body, encode_body, sealed_fields_bytes};
pub use crypto::{verify_message, Ed25519Signature, Keypair};
pub use error::{CoreError, DecodeError, HashMismatch};
pub use types::{BlockHash, WalletAddress};
