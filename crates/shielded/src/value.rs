//! Value commitments and related types.
//!
//! A value commitment hides the amount and asset of an action:
//! `cv = [v]V_asset + [rcv]R` where `rcv` is the [`ValueCommitmentTrapdoor`]
//! and `V_asset` is [`AssetIdentifier::value_generator`].
//!
//! `R` is the RedPallas binding basepoint, so the sum of trapdoors is a
//! `reddsa::orchard::Binding` signing key for the sum of commitments
//! whenever the values cancel.

#![expect(clippy::from_over_into, reason = "restricted conversions")]
#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use core::ops;

use ff::Field as _;
use group::GroupEncoding as _;
use lazy_static::lazy_static;
use pasta_curves::{Fq, arithmetic::CurveExt as _, pallas};
use rand::{CryptoRng, RngCore};

use crate::{
    asset::AssetIdentifier,
    constants::VALUE_COMMITMENT_DOMAIN,
    error::{Result, TransactionError},
    wire::{self, ParseResult},
};

lazy_static! {
    /// `R = GroupHash("z.cash:Orchard-cv", "r")`.
    static ref VALUE_COMMITMENT_RANDOMNESS_BASE: pallas::Point =
        pallas::Point::hash_to_curve(VALUE_COMMITMENT_DOMAIN)(b"r");
}

/// `[value]V_asset`, the unblinded value component of a commitment.
pub(crate) fn value_component(asset_id: &AssetIdentifier, value: u64) -> pallas::Point {
    asset_id.value_generator() * Fq::from(value)
}

// =============================================================================
// Value commitment trapdoor (rcv)
// =============================================================================

/// Value commitment trapdoor `rcv`, the randomness in a Pedersen commitment.
///
/// Each spend and output gets a fresh trapdoor. The binding signing key is
/// the signed sum of all trapdoors in a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueCommitmentTrapdoor(Fq);

impl ValueCommitmentTrapdoor {
    /// Generate a fresh random trapdoor.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self(Fq::random(rng))
    }

    pub(crate) const fn inner(&self) -> &Fq {
        &self.0
    }

    /// Commit to `value` of `asset_id` under this trapdoor.
    #[must_use]
    pub fn commit(&self, asset_id: &AssetIdentifier, value: u64) -> ValueCommitment {
        ValueCommitment(
            value_component(asset_id, value) + *VALUE_COMMITMENT_RANDOMNESS_BASE * self.0,
        )
    }
}

impl From<Fq> for ValueCommitmentTrapdoor {
    fn from(rcv: Fq) -> Self {
        Self(rcv)
    }
}

impl Into<Fq> for ValueCommitmentTrapdoor {
    fn into(self) -> Fq {
        self.0
    }
}

impl ops::AddAssign<ValueCommitmentTrapdoor> for Fq {
    fn add_assign(&mut self, rhs: ValueCommitmentTrapdoor) {
        *self += &rhs.0;
    }
}

impl ops::SubAssign<ValueCommitmentTrapdoor> for Fq {
    fn sub_assign(&mut self, rhs: ValueCommitmentTrapdoor) {
        *self -= &rhs.0;
    }
}

// =============================================================================
// Value commitment (cv)
// =============================================================================

/// A value commitment `cv = [v]V_asset + [rcv]R`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueCommitment(pallas::Point);

impl ValueCommitment {
    /// Compressed point encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, bytes) = wire::array::<32>(input)?;
        match Self::try_from(bytes) {
            Ok(cv) => Ok((rem, cv)),
            Err(_err) => wire::reject(input),
        }
    }
}

impl TryFrom<[u8; 32]> for ValueCommitment {
    type Error = TransactionError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        Option::<pallas::Point>::from(pallas::Point::from_bytes(&bytes))
            .map(Self)
            .ok_or(TransactionError::Malformed("invalid value commitment"))
    }
}

impl Into<pallas::Point> for ValueCommitment {
    fn into(self) -> pallas::Point {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use group::Group as _;
    use rand::{SeedableRng as _, rngs::StdRng};
    use reddsa::{SigningKey, VerificationKey, orchard::Binding};

    use super::*;

    #[test]
    fn binding_basepoint_matches_reddsa() {
        // bvk = [bsk]R must be what reddsa derives for a Binding key.
        let bsk = Fq::from(5u64);
        let vk: [u8; 32] = VerificationKey::from(
            &SigningKey::<Binding>::try_from(ff::PrimeField::to_repr(&bsk)).unwrap(),
        )
        .into();
        assert_eq!(vk, (*VALUE_COMMITMENT_RANDOMNESS_BASE * bsk).to_bytes());
    }

    #[test]
    fn balanced_commitments_leave_only_randomness() {
        let mut rng = StdRng::seed_from_u64(0);
        let asset = AssetIdentifier::native();
        let rcv_in = ValueCommitmentTrapdoor::random(&mut rng);
        let rcv_out = ValueCommitmentTrapdoor::random(&mut rng);

        let cv_in: pallas::Point = rcv_in.commit(&asset, 42).into();
        let cv_out: pallas::Point = rcv_out.commit(&asset, 42).into();

        let mut bsk = Fq::ZERO;
        bsk += rcv_in;
        bsk -= rcv_out;
        assert_eq!(cv_in - cv_out, *VALUE_COMMITMENT_RANDOMNESS_BASE * bsk);
    }

    #[test]
    fn assets_do_not_cancel() {
        let rcv = ValueCommitmentTrapdoor::from(Fq::ZERO);
        let first: pallas::Point = rcv.commit(&AssetIdentifier::from([1u8; 32]), 7).into();
        let second: pallas::Point = rcv.commit(&AssetIdentifier::from([2u8; 32]), 7).into();
        assert!(
            !bool::from((first - second).is_identity()),
            "equal values of distinct assets must not cancel"
        );
    }
}
