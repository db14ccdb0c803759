//! Viewing keys: NullifierKey, OutgoingViewKey, IncomingViewKey, ViewKey.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use ff::{FromUniformBytes as _, PrimeField as _};
use pasta_curves::{Fp, Fq};

use super::{address::PublicAddress, public::SpendValidatingKey};
use crate::{
    constants::{IVK_PERSONALIZATION, PrfExpand},
    hash::blake2b_512,
};

/// The nullifier deriving key `nk`.
///
/// Lets its holder compute the nullifier of any note owned by the wallet and
/// so observe when funds are spent. `nk` alone does NOT confer spend
/// authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullifierKey(Fp);

impl NullifierKey {
    /// Derive `nk` from raw spending key bytes.
    pub(super) fn from_sk(sk: &[u8; 32]) -> Self {
        Self(Fp::from_uniform_bytes(&PrfExpand::NK.with(sk)))
    }

    /// Canonical little-endian encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_repr()
    }
}

/// The outgoing view key `ovk`.
///
/// Encrypts, for the sender, the key material of every output the sender
/// creates, so a wallet can later recover what it sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutgoingViewKey([u8; 32]);

impl OutgoingViewKey {
    /// Derive `ovk` from raw spending key bytes.
    pub(super) fn from_sk(sk: &[u8; 32]) -> Self {
        let expanded = PrfExpand::OVK.with(sk);
        let mut ovk = [0u8; 32];
        for (dst, src) in ovk.iter_mut().zip(expanded.iter()) {
            *dst = *src;
        }
        Self(ovk)
    }

    /// Raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for OutgoingViewKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The incoming view key `ivk = ToScalar(BLAKE2b-512(ak || nk))`.
///
/// The public address is `[ivk]G_pk`; `ivk` decrypts every note sent to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncomingViewKey(Fq);

impl IncomingViewKey {
    pub(crate) const fn inner(&self) -> &Fq {
        &self.0
    }

    /// The address this key receives notes at.
    #[must_use]
    pub fn public_address(&self) -> PublicAddress {
        PublicAddress::from_incoming_view_key(self)
    }

    /// Canonical little-endian encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_repr()
    }
}

/// The full view key `(ak, nk)`.
///
/// Enough to recognise incoming notes, derive their nullifiers and build
/// proofs, but not to sign: signing needs `ask`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewKey {
    ak: SpendValidatingKey,
    nk: NullifierKey,
}

impl ViewKey {
    /// Combine a validating key and a nullifier key.
    #[must_use]
    pub const fn new(ak: SpendValidatingKey, nk: NullifierKey) -> Self {
        Self { ak, nk }
    }

    /// The spend validating key `ak`.
    #[must_use]
    pub const fn authorizing_key(&self) -> &SpendValidatingKey {
        &self.ak
    }

    /// The nullifier deriving key `nk`.
    #[must_use]
    pub const fn nullifier_key(&self) -> &NullifierKey {
        &self.nk
    }

    /// Derive `ivk`.
    #[must_use]
    pub fn incoming_view_key(&self) -> IncomingViewKey {
        let digest = blake2b_512(
            IVK_PERSONALIZATION,
            &[&self.ak.to_bytes(), &self.nk.to_bytes()],
        );
        IncomingViewKey(Fq::from_uniform_bytes(&digest))
    }

    /// The address notes for this key are sent to.
    #[must_use]
    pub fn public_address(&self) -> PublicAddress {
        self.incoming_view_key().public_address()
    }
}
