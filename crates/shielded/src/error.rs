//! Errors returned by transaction assembly, proving, signing and decoding.

#![expect(clippy::module_name_repetitions, reason = "TransactionError is the crate's error")]

use core::result;

use thiserror::Error;

use crate::asset::AssetIdentifier;

/// Errors produced while assembling, building, decoding or verifying a
/// transaction.
///
/// Every error is returned synchronously to the immediate caller. None are
/// transient: retrying with the same inputs reproduces the same error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// A field is malformed or exceeds its bound.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The native asset was used where only custom assets are allowed.
    #[error("invalid asset: {0}")]
    InvalidAsset(&'static str),

    /// The authentication path does not lead to the claimed root.
    #[error("witness does not match the commitment tree root")]
    InvalidWitness,

    /// Some asset has a non-zero net value that no change output covers.
    ///
    /// `surplus` is `inputs - outputs`: positive when value would be left
    /// unclaimed, negative when outputs exceed inputs.
    #[error("unbalanced transaction: asset {asset} has net value {surplus}")]
    UnbalancedTransaction {
        /// The asset whose balance is non-zero.
        asset: AssetIdentifier,
        /// Net value left over after outputs, burns and fee.
        surplus: i128,
    },

    /// The same note commitment is spent twice in one transaction.
    #[error("note spent twice in the same transaction")]
    DoubleSpend,

    /// `build` was called without any action.
    #[error("transaction has no actions")]
    EmptyTransaction,

    /// The operation is not allowed in the builder's current state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Unknown transaction version byte.
    #[error("unsupported transaction version {0}")]
    InvalidVersion(u8),

    /// Bytes could not be decoded.
    #[error("malformed encoding: {0}")]
    Malformed(&'static str),

    /// An action proof does not verify against its public statement.
    #[error("proof verification failed")]
    InvalidProof,

    /// A spend, mint or binding signature does not verify.
    #[error("signature verification failed")]
    InvalidSignature,

    /// An encrypted note could not be opened with the supplied key.
    #[error("note decryption failed")]
    DecryptionFailed,
}

/// Shorthand for results carrying a [`TransactionError`].
pub type Result<T, E = TransactionError> = result::Result<T, E>;
