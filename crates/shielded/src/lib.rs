//! # shielded
//!
//! Assembly, proving, signing and verification of multi-asset shielded
//! transactions.
//!
//! A transaction spends existing notes, creates new ones, and may mint or
//! burn custom assets. Amounts and assets stay hidden behind Pedersen value
//! commitments on Pallas; a RedPallas binding signature proves that every
//! asset balances, the fee included.
//!
//! ## Lifecycle
//!
//! [`ProposedTransaction`] → [`UnsignedTransaction`] → [`Transaction`]
//!
//! - [`ProposedTransaction`] collects spends, outputs, mints and burns,
//!   balances them per asset and sweeps surplus into change outputs.
//! - [`UnsignedTransaction`] holds one proof per action but no signatures.
//!   It needs only the [`ViewKey`] to produce.
//! - [`Transaction`] is signed with the spend authorizing key, serializes to
//!   a fixed wire format, and verifies from public data alone.
//!
//! ## Example
//!
//! ```
//! use rand::{SeedableRng as _, rngs::StdRng};
//! use shielded::{AssetIdentifier, CommitmentTree, Note, ProposedTransaction, SpendingKey, TransactionVersion};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let alice = SpendingKey::random(&mut rng);
//! let bob = SpendingKey::random(&mut rng).public_address();
//! let native = AssetIdentifier::native();
//!
//! let received = Note::new(alice.public_address(), 42, b"", native, bob, &mut rng)?;
//! let mut tree = CommitmentTree::new();
//! let position = tree.append(&received.commitment())?;
//! let witness = tree.witness(position).ok_or(shielded::TransactionError::InvalidWitness)?;
//!
//! let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
//! proposed.spend(received, witness)?;
//! proposed.output(Note::new(bob, 40, b"thanks", native, alice.public_address(), &mut rng)?)?;
//! let transaction = proposed.build(
//!     &alice.spend_authorizing_key(),
//!     &alice.view_key(),
//!     &alice.outgoing_view_key(),
//!     1,
//!     Some(alice.public_address()),
//!     &mut rng,
//! )?;
//!
//! transaction.verify()?;
//! assert_eq!(transaction.outputs().len(), 2, "payment and change");
//! # Ok::<(), shielded::TransactionError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::pub_use, reason = "exporting items for consumers")]

extern crate alloc;

pub mod asset;
pub mod builder;
pub mod constants;
pub mod description;
pub mod keys;
pub mod merkle_note;
pub mod note;
pub mod proof;
pub mod transaction;
pub mod value;
pub mod witness;

mod error;
mod hash;
mod wire;

pub use asset::{Asset, AssetIdentifier};
pub use builder::{BuilderState, ProposedTransaction};
pub use error::{Result, TransactionError};
pub use keys::{
    IncomingViewKey, OutgoingViewKey, PublicAddress, SpendAuthorizingKey, SpendingKey, ViewKey,
};
pub use merkle_note::MerkleNote;
pub use note::{Memo, Note, NoteCommitment, Nullifier};
pub use proof::Proof;
pub use transaction::{SigHash, Transaction, TransactionVersion, UnsignedTransaction};
pub use witness::{CommitmentTree, MerkleHash, Witness};
