//! Ownership-verification registry: the single gate through which
//! externally supplied star registrations enter the ledger.
//!
//! The protocol is challenge/response: [`StarRegistry::issue_challenge`]
//! hands out a timestamped message, the wallet signs it offline, and
//! [`StarRegistry::verify_and_admit`] checks the timing and the signature
//! before appending. The ledger itself trusts this gate and never judges
//! payloads.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use starledger_core::{
    verify_message, Block, BlockBody, Ed25519Signature, Star, StarEntry, WalletAddress,
};

use crate::clock::{Clock, SystemClock};
use crate::error::RegistryError;
use crate::ledger::Ledger;

/// Domain tag appended to every challenge, scoping signatures to this
/// registry.
pub const CHALLENGE_DOMAIN: &str = "starRegistry";

/// Configuration for the registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How old a challenge may be at submission time.
    pub max_challenge_age: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_challenge_age: Duration::from_secs(5 * 60),
        }
    }
}

/// The registry. Holds a handle to the ledger it feeds.
pub struct StarRegistry {
    ledger: Arc<Ledger>,
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
}

impl StarRegistry {
    /// Create a registry over the given ledger, on the system clock.
    pub fn new(ledger: Arc<Ledger>, config: RegistryConfig) -> Self {
        Self::with_clock(ledger, config, Arc::new(SystemClock))
    }

    /// Create a registry on the given clock.
    pub fn with_clock(ledger: Arc<Ledger>, config: RegistryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            config,
            clock,
        }
    }

    /// The ledger this registry feeds.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Build the challenge a wallet must sign to register a star.
    ///
    /// Format: `address:unix_seconds:starRegistry`. Pure in the ledger's
    /// terms; nothing is stored, the caller round-trips the string.
    pub fn issue_challenge(&self, address: &WalletAddress) -> String {
        format!("{}:{}:{}", address, self.clock.now_secs(), CHALLENGE_DOMAIN)
    }

    /// Verify a signed challenge and admit the star into the ledger.
    ///
    /// Checks run in order: challenge age first, then the signature; a
    /// stale challenge is rejected before any signature work. Either
    /// every check and the append succeed, or nothing is appended.
    pub fn verify_and_admit(
        &self,
        address: &WalletAddress,
        message: &str,
        signature_hex: &str,
        star: Star,
    ) -> Result<Block, RegistryError> {
        let issued_at = parse_issued_at(message)?;
        let elapsed = self.clock.now_secs() - issued_at;
        let window = self.config.max_challenge_age.as_secs() as i64;
        if elapsed > window {
            warn!(%address, elapsed, window, "rejecting expired challenge");
            return Err(RegistryError::ExpiredChallenge {
                elapsed_secs: elapsed,
                window_secs: window,
            });
        }

        let signature = Ed25519Signature::from_hex(signature_hex)
            .map_err(|_| RegistryError::InvalidSignature)?;
        verify_message(message, address, &signature).map_err(|_| {
            warn!(%address, "rejecting submission with bad signature");
            RegistryError::InvalidSignature
        })?;

        let entry = StarEntry {
            address: address.clone(),
            message: message.to_string(),
            signature: signature_hex.to_string(),
            star,
        };
        let outcome = self.ledger.append(&BlockBody::Entry(entry))?;
        info!(%address, height = outcome.block.height, "admitted star registration");
        Ok(outcome.block)
    }
}

/// Pull the issuance time out of the second colon-delimited field.
fn parse_issued_at(message: &str) -> Result<i64, RegistryError> {
    message
        .split(':')
        .nth(1)
        .and_then(|field| field.parse().ok())
        .ok_or(RegistryError::MalformedChallenge)
}
