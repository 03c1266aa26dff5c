//! Ledger: the ordered, append-only sequence of blocks.
//!
//! One writer at a time: every mutation runs under the write lock as a
//! single unit of work, so the sequence and its cached length can never
//! disagree. Readers share the read lock and always see a consistent
//! snapshot.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

use starledger_core::{
    Block, BlockBody, BlockHash, HashMismatch, Star, UnsealedBlock, WalletAddress,
};

use crate::clock::{Clock, SystemClock};
use crate::error::AppendError;

/// A ledger-consistency finding.
///
/// Findings are data, not control flow: validation reports them in block
/// order and never throws for a tampered block.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A block's recomputed digest disagrees with its sealed hash.
    #[error(transparent)]
    Tampered(#[from] HashMismatch),

    /// A block's previous-hash link does not match the block below it
    /// (or the genesis block carries a non-sentinel link).
    #[error("block {height} link mismatch: expected {expected:?}, stored {stored:?}")]
    BrokenLink {
        /// Height of the block whose link is wrong.
        height: u64,
        /// The hash of the block below (None for the genesis sentinel).
        expected: Option<BlockHash>,
        /// What the block actually stores.
        stored: Option<BlockHash>,
    },
}

/// What a successful append produced.
///
/// The full-chain validation that runs before the append is acknowledged
/// is surfaced here as a diagnostic; findings do not roll the append back.
#[derive(Debug, Clone)]
pub struct AppendOutcome {
    /// The sealed block, now the top of the ledger.
    pub block: Block,
    /// Consistency findings from re-validating the whole chain.
    pub findings: Vec<ValidationIssue>,
}

struct LedgerInner {
    /// Index equals height.
    blocks: Vec<Block>,
    /// Cached length; moves only together with `blocks`.
    len: u64,
}

/// The ledger. Created with a genesis block already in place; grows
/// monotonically through [`Ledger::append`] for the life of the process.
pub struct Ledger {
    inner: RwLock<LedgerInner>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Create a ledger on the system clock and append the genesis block.
    pub fn new() -> Result<Self, AppendError> {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a ledger on the given clock and append the genesis block.
    ///
    /// This is the only implicit append; every other block goes through
    /// [`Ledger::append`] explicitly.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Result<Self, AppendError> {
        let ledger = Self {
            inner: RwLock::new(LedgerInner {
                blocks: Vec::new(),
                len: 0,
            }),
            clock,
        };
        ledger.append(&BlockBody::genesis())?;
        Ok(ledger)
    }

    /// The single privileged write path.
    ///
    /// Seals the payload at the next height with the current wall time
    /// and a link to the top block, pushes it, and re-validates the whole
    /// chain before acknowledging. Payload legality is the caller's
    /// responsibility; the admission gate lives in
    /// [`crate::registry::StarRegistry`].
    pub fn append(&self, body: &BlockBody) -> Result<AppendOutcome, AppendError> {
        let unsealed = UnsealedBlock::new(body)?;

        let mut inner = self.inner.write().unwrap();

        let height = inner.blocks.len() as u64;
        let timestamp = self.clock.now_secs();
        let previous_hash = inner.blocks.last().map(|b| b.hash);

        let block = unsealed.seal(height, timestamp, previous_hash);
        debug!(height, hash = %block.hash, "sealed block");

        // Push and bump together, still under the write lock; a torn
        // update here would be an invariant violation.
        inner.blocks.push(block.clone());
        inner.len += 1;

        let findings = validate_blocks(&inner.blocks);
        if !findings.is_empty() {
            warn!(
                height,
                findings = findings.len(),
                "chain validation reported findings after append"
            );
        }

        Ok(AppendOutcome { block, findings })
    }

    /// Height of the top block. O(1) from the cached counter.
    ///
    /// A genesis-only ledger reports 0.
    pub fn height(&self) -> u64 {
        let inner = self.inner.read().unwrap();
        inner.len - 1
    }

    /// Number of blocks, genesis included. O(1).
    pub fn len(&self) -> u64 {
        self.inner.read().unwrap().len
    }

    /// A ledger is never empty once constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Look up the unique block with the given hash.
    ///
    /// Linear scan; hashes are unique by construction.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<Block> {
        let inner = self.inner.read().unwrap();
        inner.blocks.iter().find(|b| b.hash == *hash).cloned()
    }

    /// Look up the block at the given height.
    pub fn block_by_height(&self, height: u64) -> Option<Block> {
        let inner = self.inner.read().unwrap();
        inner.blocks.get(height as usize).cloned()
    }

    /// All stars registered to the given wallet address.
    ///
    /// Scans every non-genesis block, decodes its payload and filters on
    /// the embedded address. A block whose body fails to decode is
    /// skipped with a warning; it never aborts the rest of the scan.
    pub fn stars_by_address(&self, address: &WalletAddress) -> Vec<Star> {
        let inner = self.inner.read().unwrap();

        let mut stars = Vec::new();
        for block in inner.blocks.iter().filter(|b| !b.is_genesis()) {
            match block.decode_body() {
                Ok(body) => {
                    if let Some(entry) = body.as_entry() {
                        if entry.address == *address {
                            stars.push(entry.star.clone());
                        }
                    }
                }
                Err(err) => {
                    warn!(height = block.height, %err, "skipping undecodable block body");
                }
            }
        }
        stars
    }

    /// Re-validate the whole chain.
    ///
    /// Checks every block's seal and every link, reporting findings in
    /// block order. Empty means the ledger is fully consistent.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let inner = self.inner.read().unwrap();
        validate_blocks(&inner.blocks)
    }
}

/// Per-block seal checks plus linkage, findings in block order.
fn validate_blocks(blocks: &[Block]) -> Vec<ValidationIssue> {
    let mut findings = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        if let Err(mismatch) = block.validate() {
            findings.push(ValidationIssue::Tampered(mismatch));
        }

        let expected = if i == 0 {
            None
        } else {
            Some(blocks[i - 1].hash)
        };
        if block.previous_hash != expected {
            findings.push(ValidationIssue::BrokenLink {
                height: block.height,
                expected,
                stored: block.previous_hash,
            });
        }
    }

    findings
}
