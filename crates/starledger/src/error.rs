//! Error types for the ledger and the ownership-verification registry.

use starledger_core::CoreError;
use thiserror::Error;

/// Errors from the privileged append path.
///
/// Append does not judge payload legality (that is the registry's job,
/// done before append is called); it only fails on lower-level trouble.
#[derive(Debug, Error)]
pub enum AppendError {
    /// The payload could not be serialized into its stored form.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] CoreError),
}

/// Errors from the ownership-verification registry.
///
/// All-or-nothing: any of these means nothing was appended.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The challenge message does not carry a parseable issuance time.
    #[error("challenge message is malformed")]
    MalformedChallenge,

    /// The challenge is older than the allowed window.
    #[error("challenge expired: issued {elapsed_secs}s ago, window is {window_secs}s")]
    ExpiredChallenge {
        /// Seconds between issuance and submission.
        elapsed_secs: i64,
        /// The configured maximum age.
        window_secs: i64,
    },

    /// The signature was not produced over this message by this address.
    #[error("signature does not match address")]
    InvalidSignature,

    /// The admission itself failed after verification passed.
    #[error(transparent)]
    Append(#[from] AppendError),
}
