//! Cryptographic primitives for the starledger.
//!
//! Wraps Ed25519 message signing and verification with strong types. The
//! wallet that owns a star signs the ownership challenge with its private
//! key; the ledger side only ever sees the address (verifying key) and the
//! signature.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

use crate::error::CoreError;
use crate::types::WalletAddress;

/// A 64-byte Ed25519 signature.
///
/// Carried as raw bytes in memory; serialized as hex text inside payloads.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|_| CoreError::MalformedSignature)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CoreError::MalformedSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Verify that `signature` was produced over `message` by the holder of
/// `address`'s private key.
///
/// The address must parse back into an Ed25519 verifying key; an address
/// that does not is reported as [`CoreError::InvalidAddress`], distinct
/// from a well-formed key rejecting the signature.
pub fn verify_message(
    message: &str,
    address: &WalletAddress,
    signature: &Ed25519Signature,
) -> Result<(), CoreError> {
    let key_bytes = hex::decode(address.as_str())
        .map_err(|_| CoreError::InvalidAddress(address.as_str().to_string()))?;
    let key_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| CoreError::InvalidAddress(address.as_str().to_string()))?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|_| CoreError::InvalidAddress(address.as_str().to_string()))?;

    let sig = Signature::from_bytes(&signature.0);

    verifying_key
        .verify(message.as_bytes(), &sig)
        .map_err(|_| CoreError::InvalidSignature)
}

/// A wallet keypair, able to sign ownership challenges.
///
/// This wraps ed25519-dalek's SigningKey. The ledger never needs one; it
/// exists so callers (and tests) can play the wallet side of the protocol.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The wallet address of this keypair.
    pub fn address(&self) -> WalletAddress {
        WalletAddress::from_public_key(&self.signing_key.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &str) -> Ed25519Signature {
        let sig = self.signing_key.sign(message.as_bytes());
        Ed25519Signature(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.address())
    }
}
