#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use ff::Field as _;
use pasta_curves::Fq;
use rand::{CryptoRng, RngCore};

/// Per-transaction spend authorization randomizer `alpha`.
///
/// Used to derive:
/// - `rsk = ask + alpha` via
///   [`SpendAuthorizingKey::randomize`](super::SpendAuthorizingKey::randomize)
/// - `rk = ak + [alpha]G` via
///   [`SpendValidatingKey::randomize`](super::SpendValidatingKey::randomize)
///
/// Each transaction gets a fresh `alpha`, so `rk` is unlinkable to `ak`.
#[derive(Clone, Copy, Debug)]
pub struct SpendAuthRandomizer(Fq);

impl SpendAuthRandomizer {
    /// Sample a fresh randomizer.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self(Fq::random(rng))
    }

    pub(crate) const fn inner(&self) -> &Fq {
        &self.0
    }
}

impl From<Fq> for SpendAuthRandomizer {
    fn from(alpha: Fq) -> Self {
        Self(alpha)
    }
}
