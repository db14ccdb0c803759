//! Public addresses.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use core::fmt;

use group::{Group as _, GroupEncoding as _};
use lazy_static::lazy_static;
use pasta_curves::{arithmetic::CurveExt as _, pallas};

use super::view::IncomingViewKey;
use crate::{
    constants::PUBLIC_KEY_DOMAIN,
    error::{Result, TransactionError},
};

lazy_static! {
    /// `G_pk`, the generator public addresses are multiples of.
    pub(crate) static ref PUBLIC_KEY_GENERATOR: pallas::Point =
        pallas::Point::hash_to_curve(PUBLIC_KEY_DOMAIN)(b"G");
}

/// A public address `pk = [ivk]G_pk`.
///
/// Notes are sent to an address; the matching [`IncomingViewKey`] decrypts
/// them. Encoded as a compressed Pallas point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "[u8; 32]", try_from = "[u8; 32]"))]
pub struct PublicAddress(pallas::Point);

impl PublicAddress {
    /// Parse an encoded address.
    ///
    /// Fails with [`TransactionError::InvalidArgument`] when the bytes are
    /// not a canonical point encoding or encode the identity.
    pub fn new(bytes: &[u8; 32]) -> Result<Self> {
        Option::<pallas::Point>::from(pallas::Point::from_bytes(bytes))
            .filter(|point| !bool::from(point.is_identity()))
            .map(Self)
            .ok_or(TransactionError::InvalidArgument("invalid public address"))
    }

    pub(super) fn from_incoming_view_key(ivk: &IncomingViewKey) -> Self {
        Self(*PUBLIC_KEY_GENERATOR * ivk.inner())
    }

    /// The address of the protocol itself, `G_pk`.
    ///
    /// Nobody knows its discrete log, so nothing sent here is spendable.
    pub(crate) fn generator() -> Self {
        Self(*PUBLIC_KEY_GENERATOR)
    }

    pub(crate) const fn point(&self) -> &pallas::Point {
        &self.0
    }

    /// Compressed point encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

impl From<PublicAddress> for [u8; 32] {
    fn from(address: PublicAddress) -> Self {
        address.to_bytes()
    }
}

impl TryFrom<[u8; 32]> for PublicAddress {
    type Error = TransactionError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        Self::new(&bytes)
    }
}

impl fmt::Display for PublicAddress {
    #[expect(clippy::min_ident_chars, reason = "trait parameter name")]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}
