//! Action descriptions: the public, serialized form of each action.
//!
//! | Action | Proof | Authorization | Value effect |
//! | ------ | ----- | ------------- | ------------ |
//! | [`SpendDescription`]  | yes | `rk` signature | `+cv` |
//! | [`OutputDescription`] | yes | none           | `-cv` |
//! | [`MintDescription`]   | yes | `rk` signature | `+[v]V_asset` |
//! | [`BurnDescription`]   | no  | none           | `-[v]V_asset` |
//!
//! Spends and mints are parameterized by their authorization state. Proving
//! yields an `Unauthorized` description; signing the transaction's
//! [`SigHash`](crate::transaction::SigHash) with `rsk` turns it into an
//! authorized one. Only authorized descriptions serialize into a
//! transaction.
//!
//! Each `*Builder` holds the private data for one action and proves it. The
//! caller supplies every random value so that proving is a pure function and
//! can run in parallel.

mod burn;
mod mint;
mod output;
mod spend;

pub use burn::BurnDescription;
pub use mint::{MintBuilder, MintDescription};
pub use output::{OutputBuilder, OutputDescription};
pub use spend::{SpendBuilder, SpendDescription};

/// Authorization state of a proved but not yet signed spend or mint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unauthorized;
