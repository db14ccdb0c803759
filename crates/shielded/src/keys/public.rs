//! Public (verification) keys.

use group::GroupEncoding as _;
use pasta_curves::pallas;
use reddsa::orchard::{Binding, SpendAuth};

use super::{
    randomizer::SpendAuthRandomizer,
    signature::{BindingSignature, SpendAuthSignature},
};
use crate::error::{Result, TransactionError};

/// The spend validating key `ak = [ask]G`, the long-lived public
/// counterpart of [`SpendAuthorizingKey`](super::SpendAuthorizingKey).
///
/// `ak` cannot verify signatures directly. Each transaction randomizes it
/// into a [`RandomizedVerificationKey`] so that transactions from the same
/// wallet are unlinkable.
#[derive(Clone, Copy, Debug)]
pub struct SpendValidatingKey(pub(super) reddsa::VerificationKey<SpendAuth>);

impl SpendValidatingKey {
    /// Derive the per-transaction verification key `rk = ak + [alpha]G`.
    #[must_use]
    pub fn randomize(&self, alpha: &SpendAuthRandomizer) -> RandomizedVerificationKey {
        RandomizedVerificationKey(self.0.randomize(alpha.inner()))
    }

    /// The compressed encoding of `ak`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.into()
    }
}

impl TryFrom<[u8; 32]> for SpendValidatingKey {
    type Error = TransactionError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        reddsa::VerificationKey::<SpendAuth>::try_from(bytes)
            .map(Self)
            .map_err(|_err| TransactionError::InvalidArgument("invalid spend validating key"))
    }
}

impl PartialEq for SpendValidatingKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for SpendValidatingKey {}

/// Randomized verification key `rk = ak + [alpha]G`.
///
/// Published once per transaction; verifies every spend and mint
/// authorization signature in it.
#[derive(Clone, Copy, Debug)]
pub struct RandomizedVerificationKey(pub(super) reddsa::VerificationKey<SpendAuth>);

impl RandomizedVerificationKey {
    /// Verify a spend authorization signature over `msg`.
    pub fn verify(&self, msg: &[u8], sig: &SpendAuthSignature) -> Result<()> {
        self.0
            .verify(msg, &sig.0)
            .map_err(|_err| TransactionError::InvalidSignature)
    }

    /// The compressed encoding of `rk`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.into()
    }
}

impl TryFrom<[u8; 32]> for RandomizedVerificationKey {
    type Error = TransactionError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        reddsa::VerificationKey::<SpendAuth>::try_from(bytes)
            .map(Self)
            .map_err(|_err| TransactionError::Malformed("invalid randomized verification key"))
    }
}

impl PartialEq for RandomizedVerificationKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for RandomizedVerificationKey {}

/// Binding verification key `bvk`, derived by the verifier from public data.
///
/// ```text
/// bvk = sum(cv_spend) - sum(cv_output)
///     + sum([v_mint]V_asset) - sum([v_burn]V_asset) - [fee]V_native
/// ```
///
/// When every asset balances, the `V` components cancel and
/// `bvk = [bsk]R`, so a binding signature under `bvk` proves balance.
#[derive(Clone, Copy, Debug)]
pub struct BindingVerificationKey(pub(super) reddsa::VerificationKey<Binding>);

impl BindingVerificationKey {
    /// Wrap a curve point computed from value commitments.
    pub fn from_point(point: pallas::Point) -> Result<Self> {
        reddsa::VerificationKey::<Binding>::try_from(point.to_bytes())
            .map(Self)
            .map_err(|_err| TransactionError::Malformed("invalid binding verification key"))
    }

    /// Verify a binding signature over `msg`.
    pub fn verify(&self, msg: &[u8], sig: &BindingSignature) -> Result<()> {
        self.0
            .verify(msg, &sig.0)
            .map_err(|_err| TransactionError::InvalidSignature)
    }
}

impl PartialEq for BindingVerificationKey {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 32]>::from(self.0) == <[u8; 32]>::from(other.0)
    }
}

impl Eq for BindingVerificationKey {}
