//! # Starledger
//!
//! A minimal private ledger: an append-only, hash-linked sequence of
//! blocks, plus the ownership-verification protocol that gates what may
//! be appended.
//!
//! The flow: a caller asks [`StarRegistry::issue_challenge`] for a
//! challenge string, signs it with their wallet's private key, and
//! submits the signed claim through [`StarRegistry::verify_and_admit`].
//! On success the payload is sealed into a [`Block`] and appended to the
//! [`Ledger`], which links it to the prior block and re-validates the
//! whole chain before acknowledging.
//!
//! Single-process, single-writer. No networking, no consensus, no
//! persistence.

pub mod clock;
pub mod error;
pub mod ledger;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppendError, RegistryError};
pub use ledger::{AppendOutcome, Ledger, ValidationIssue};
pub use registry::{RegistryConfig, StarRegistry, CHALLENGE_DOMAIN};

pub use starledger_core::{
    verify_message, Block, BlockBody, BlockHash, CoreError, DecodeError, Ed25519Signature,
    HashMismatch, Keypair, Star, StarEntry, UnsealedBlock, WalletAddress, GENESIS_MARKER,
};
