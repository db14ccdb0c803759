//! Private (signing) keys.

use ff::{FromUniformBytes as _, PrimeField as _};
use pasta_curves::Fq;
use rand::{CryptoRng, RngCore};
use reddsa::orchard::{Binding, SpendAuth};

use super::{
    address::PublicAddress,
    public::{BindingVerificationKey, RandomizedVerificationKey, SpendValidatingKey},
    randomizer::SpendAuthRandomizer,
    signature::{BindingSignature, SpendAuthSignature},
    view::{IncomingViewKey, NullifierKey, OutgoingViewKey, ViewKey},
};
use crate::{
    constants::PrfExpand,
    error::{Result, TransactionError},
};

/// A spending key: raw 32-byte entropy.
///
/// The root key from which all other keys are derived. It must be kept
/// secret as it provides full spending authority.
#[derive(Clone, Copy, Debug)]
pub struct SpendingKey([u8; 32]);

impl From<[u8; 32]> for SpendingKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl SpendingKey {
    /// Sample a fresh spending key.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Derive `ask = ToScalar(PRF^expand_sk([0x00]))`.
    #[must_use]
    pub fn spend_authorizing_key(&self) -> SpendAuthorizingKey {
        let ask = Fq::from_uniform_bytes(&PrfExpand::ASK.with(&self.0));
        #[expect(clippy::expect_used, reason = "canonical scalar encoding always decodes")]
        SpendAuthorizingKey(
            reddsa::SigningKey::<SpendAuth>::try_from(ask.to_repr())
                .expect("ask is a canonical scalar"),
        )
    }

    /// Derive `nk = ToBase(PRF^expand_sk([0x01]))`.
    #[must_use]
    pub fn nullifier_key(&self) -> NullifierKey {
        NullifierKey::from_sk(&self.0)
    }

    /// Derive `ovk` from `PRF^expand_sk([0x02])`.
    #[must_use]
    pub fn outgoing_view_key(&self) -> OutgoingViewKey {
        OutgoingViewKey::from_sk(&self.0)
    }

    /// The full view key `(ak, nk)`.
    #[must_use]
    pub fn view_key(&self) -> ViewKey {
        ViewKey::new(
            self.spend_authorizing_key().validating_key(),
            self.nullifier_key(),
        )
    }

    /// The incoming view key `ivk = ToScalar(H(ak || nk))`.
    #[must_use]
    pub fn incoming_view_key(&self) -> IncomingViewKey {
        self.view_key().incoming_view_key()
    }

    /// The public address notes are sent to.
    #[must_use]
    pub fn public_address(&self) -> PublicAddress {
        self.view_key().public_address()
    }
}

/// The spend authorizing key `ask`: a long-lived signing key derived from
/// [`SpendingKey`].
///
/// `ask` cannot sign directly. It must first produce a per-transaction
/// [`RandomizedSigningKey`] via [`randomize`](Self::randomize).
#[derive(Clone, Copy, Debug)]
pub struct SpendAuthorizingKey(reddsa::SigningKey<SpendAuth>);

impl SpendAuthorizingKey {
    /// Derive the spend validating key `ak = [ask]G`.
    #[must_use]
    pub fn validating_key(&self) -> SpendValidatingKey {
        // [sk]G, not a trivial type conversion.
        SpendValidatingKey(reddsa::VerificationKey::from(&self.0))
    }

    /// Derive the per-transaction signing key `rsk = ask + alpha`.
    #[must_use]
    pub fn randomize(&self, alpha: &SpendAuthRandomizer) -> RandomizedSigningKey {
        RandomizedSigningKey(self.0.randomize(alpha.inner()))
    }
}

/// Randomized signing key `rsk = ask + alpha`, ephemeral.
///
/// The only key type that signs spend and mint authorizations.
#[derive(Clone, Copy, Debug)]
pub struct RandomizedSigningKey(reddsa::SigningKey<SpendAuth>);

impl RandomizedSigningKey {
    /// Sign `msg` with this randomized key.
    pub fn sign(&self, rng: &mut (impl RngCore + CryptoRng), msg: &[u8]) -> SpendAuthSignature {
        SpendAuthSignature(self.0.sign(rng, msg))
    }

    /// The matching verification key `rk = [rsk]G`.
    #[must_use]
    pub fn verification_key(&self) -> RandomizedVerificationKey {
        RandomizedVerificationKey(reddsa::VerificationKey::from(&self.0))
    }
}

/// Binding signing key `bsk = sum(rcv_spend) - sum(rcv_output)`.
///
/// The signer knows every trapdoor because they built every value
/// commitment; `bsk` is the discrete log of `bvk` with respect to `R`
/// exactly when the transaction balances.
#[derive(Clone, Copy, Debug)]
pub struct BindingSigningKey(reddsa::SigningKey<Binding>);

impl BindingSigningKey {
    /// Sign the transaction hash.
    pub fn sign(&self, rng: &mut (impl RngCore + CryptoRng), msg: &[u8]) -> BindingSignature {
        BindingSignature(self.0.sign(rng, msg))
    }

    /// `bvk = [bsk]R`, used for the signer-side consistency check.
    #[must_use]
    pub fn verification_key(&self) -> BindingVerificationKey {
        // [bsk]R for the Binding parameterization.
        BindingVerificationKey(reddsa::VerificationKey::from(&self.0))
    }
}

impl TryFrom<Fq> for BindingSigningKey {
    type Error = TransactionError;

    fn try_from(bsk: Fq) -> Result<Self> {
        reddsa::SigningKey::<Binding>::try_from(bsk.to_repr())
            .map(Self)
            .map_err(|_err| TransactionError::InvalidState("trapdoor sum is not a signing key"))
    }
}
