//! Signature types that bridge private (sign) and public (verify) keys.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use reddsa::orchard::{Binding, SpendAuth};

/// A spend authorization signature (RedPallas over SpendAuth).
///
/// Carried by every spend and mint description. Produced with the
/// transaction's randomized signing key `rsk = ask + alpha`.
#[derive(Clone, Copy, Debug)]
pub struct SpendAuthSignature(pub(crate) reddsa::Signature<SpendAuth>);

impl From<[u8; 64]> for SpendAuthSignature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(reddsa::Signature::<SpendAuth>::from(bytes))
    }
}

impl From<SpendAuthSignature> for [u8; 64] {
    fn from(sig: SpendAuthSignature) -> Self {
        <[u8; 64]>::from(sig.0)
    }
}

impl PartialEq for SpendAuthSignature {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 64]>::from(*self) == <[u8; 64]>::from(*other)
    }
}

impl Eq for SpendAuthSignature {}

/// A binding signature (RedPallas over the Binding group).
///
/// Proves the signer knew the opening `bsk` of the Pedersen commitment `bvk`
/// to value 0. By the binding property of the commitment scheme it is
/// infeasible to find another opening to a non-zero value, so every asset's
/// value balance is enforced without revealing any amount.
#[derive(Clone, Copy, Debug)]
pub struct BindingSignature(pub(crate) reddsa::Signature<Binding>);

impl From<[u8; 64]> for BindingSignature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes.into())
    }
}

impl From<BindingSignature> for [u8; 64] {
    fn from(sig: BindingSignature) -> Self {
        sig.0.into()
    }
}

impl PartialEq for BindingSignature {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 64]>::from(*self) == <[u8; 64]>::from(*other)
    }
}

impl Eq for BindingSignature {}
