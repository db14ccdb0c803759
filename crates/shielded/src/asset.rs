//! Assets and asset identifiers.
//!
//! Every note carries an [`AssetIdentifier`]. Custom assets are described by
//! an [`Asset`]: the creator's address, a name, free-form metadata and a
//! nonce. The identifier is a BLAKE2b-256 digest of all four, so anyone can
//! recompute it from a mint description.
//!
//! The native asset is special: its identifier is the fixed
//! [`NATIVE_ASSET`] constant, it is never derived, and it cannot be minted
//! or burned.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use core::fmt;

use nom::{number::complete::le_u8, sequence::tuple};
use pasta_curves::{arithmetic::CurveExt as _, pallas};

use crate::{
    constants::{
        ASSET_ID_LENGTH, ASSET_ID_PERSONALIZATION, ASSET_METADATA_LENGTH, ASSET_NAME_LENGTH,
        ASSET_VALUE_DOMAIN, NATIVE_ASSET,
    },
    error::{Result, TransactionError},
    hash::blake2b_256,
    keys::PublicAddress,
    wire::{self, ParseResult},
};

/// A 32-byte asset identifier.
///
/// Ordered bytewise; the builder visits assets in ascending identifier order
/// when it sweeps change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetIdentifier([u8; ASSET_ID_LENGTH]);

impl AssetIdentifier {
    /// The reserved identifier of the native asset.
    #[must_use]
    pub const fn native() -> Self {
        Self(NATIVE_ASSET)
    }

    /// Whether this is the native asset.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_ASSET
    }

    /// The value-commitment base point `V_asset` for this asset.
    ///
    /// Distinct assets get independent generators, so a value commitment
    /// hides which asset it carries and amounts of different assets cannot
    /// cancel each other in the binding check.
    #[must_use]
    pub fn value_generator(&self) -> pallas::Point {
        pallas::Point::hash_to_curve(ASSET_VALUE_DOMAIN)(&self.0)
    }

    /// Raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ASSET_ID_LENGTH] {
        &self.0
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, bytes) = wire::array::<ASSET_ID_LENGTH>(input)?;
        Ok((rem, Self(bytes)))
    }
}

impl From<[u8; ASSET_ID_LENGTH]> for AssetIdentifier {
    fn from(bytes: [u8; ASSET_ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<AssetIdentifier> for [u8; ASSET_ID_LENGTH] {
    fn from(id: AssetIdentifier) -> Self {
        id.0
    }
}

impl fmt::Display for AssetIdentifier {
    #[expect(clippy::min_ident_chars, reason = "trait parameter name")]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A custom asset descriptor.
///
/// Immutable once constructed; `id` is always the digest of the other
/// fields (except for [`Asset::native`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
    creator: PublicAddress,
    name: [u8; ASSET_NAME_LENGTH],
    metadata: [u8; ASSET_METADATA_LENGTH],
    nonce: u8,
    id: AssetIdentifier,
}

impl Asset {
    /// Describe a new asset created by `creator`.
    ///
    /// The name must be 1 to 32 bytes and the metadata at most 96 bytes.
    /// Both are zero-padded and so may not contain NUL bytes. The nonce
    /// starts at 0 and is bumped only if a derivation lands on the reserved
    /// native identifier.
    pub fn new(creator: PublicAddress, name: &str, metadata: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(TransactionError::InvalidArgument("asset name is empty"));
        }
        if name.contains('\0') || metadata.contains('\0') {
            return Err(TransactionError::InvalidArgument("asset text contains NUL"));
        }
        let padded_name = pad::<ASSET_NAME_LENGTH>(name.as_bytes())
            .ok_or(TransactionError::InvalidArgument("asset name too long"))?;
        let padded_metadata = pad::<ASSET_METADATA_LENGTH>(metadata.as_bytes())
            .ok_or(TransactionError::InvalidArgument("asset metadata too long"))?;

        (0..=u8::MAX)
            .map(|nonce| Self::from_parts(creator, padded_name, padded_metadata, nonce))
            .find(|asset| !asset.id.is_native())
            .ok_or(TransactionError::InvalidAsset("no usable nonce"))
    }

    /// Reassemble an asset from its encoded fields and derive its id.
    #[must_use]
    pub fn from_parts(
        creator: PublicAddress,
        name: [u8; ASSET_NAME_LENGTH],
        metadata: [u8; ASSET_METADATA_LENGTH],
        nonce: u8,
    ) -> Self {
        let id = AssetIdentifier(blake2b_256(
            ASSET_ID_PERSONALIZATION,
            &[&creator.to_bytes(), &name, &metadata, &[nonce]],
        ));
        Self {
            creator,
            name,
            metadata,
            nonce,
            id,
        }
    }

    /// The reserved native asset descriptor.
    ///
    /// Its creator is the address generator, which nobody controls, and its
    /// id is [`NATIVE_ASSET`] rather than a derived digest.
    #[must_use]
    pub fn native() -> Self {
        let mut name = [0u8; ASSET_NAME_LENGTH];
        for (dst, src) in name.iter_mut().zip(b"native") {
            *dst = *src;
        }
        Self {
            creator: PublicAddress::generator(),
            name,
            metadata: [0u8; ASSET_METADATA_LENGTH],
            nonce: 0,
            id: AssetIdentifier::native(),
        }
    }

    /// The asset identifier.
    #[must_use]
    pub const fn id(&self) -> AssetIdentifier {
        self.id
    }

    /// The creator's address.
    #[must_use]
    pub const fn creator(&self) -> &PublicAddress {
        &self.creator
    }

    /// The zero-padded name.
    #[must_use]
    pub const fn name(&self) -> &[u8; ASSET_NAME_LENGTH] {
        &self.name
    }

    /// The zero-padded metadata.
    #[must_use]
    pub const fn metadata(&self) -> &[u8; ASSET_METADATA_LENGTH] {
        &self.metadata
    }

    /// The derivation nonce.
    #[must_use]
    pub const fn nonce(&self) -> u8 {
        self.nonce
    }

    /// Append `creator ‖ name ‖ metadata ‖ nonce`.
    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.creator.to_bytes());
        out.extend_from_slice(&self.name);
        out.extend_from_slice(&self.metadata);
        out.push(self.nonce);
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, (creator_bytes, name, metadata, nonce)) = tuple((
            wire::array::<32>,
            wire::array::<ASSET_NAME_LENGTH>,
            wire::array::<ASSET_METADATA_LENGTH>,
            le_u8,
        ))(input)?;
        let Ok(creator) = PublicAddress::new(&creator_bytes) else {
            return wire::reject(input);
        };
        Ok((rem, Self::from_parts(creator, name, metadata, nonce)))
    }
}

/// Zero-pad `bytes` to `N`, or `None` if it does not fit.
fn pad<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    if bytes.len() > N {
        return None;
    }
    let mut out = [0u8; N];
    for (dst, src) in out.iter_mut().zip(bytes) {
        *dst = *src;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{constants::ASSET_LEN, keys::SpendingKey};

    fn creator() -> PublicAddress {
        SpendingKey::from([1u8; 32]).public_address()
    }

    #[test]
    fn native_asset_is_reserved() {
        let native = Asset::native();
        assert_eq!(native.id(), AssetIdentifier::native());
        assert!(native.id().is_native());
        assert_eq!(native.id().as_bytes(), &NATIVE_ASSET);
    }

    #[test]
    fn name_and_metadata_bounds() {
        assert_eq!(
            Asset::new(creator(), "", "meta"),
            Err(TransactionError::InvalidArgument("asset name is empty"))
        );
        assert_eq!(
            Asset::new(creator(), &"n".repeat(33), ""),
            Err(TransactionError::InvalidArgument("asset name too long"))
        );
        assert_eq!(
            Asset::new(creator(), "Testcoin", &"m".repeat(97)),
            Err(TransactionError::InvalidArgument("asset metadata too long"))
        );
        Asset::new(creator(), &"n".repeat(32), &"m".repeat(96)).unwrap();
    }

    #[test]
    fn trailing_nul_does_not_alias_a_shorter_name() {
        assert_eq!(
            Asset::new(creator(), "a\0", ""),
            Err(TransactionError::InvalidArgument("asset text contains NUL"))
        );
        assert_eq!(
            Asset::new(creator(), "a", "meta\0"),
            Err(TransactionError::InvalidArgument("asset text contains NUL"))
        );
        let short = Asset::new(creator(), "a", "").unwrap();
        let longer = Asset::new(creator(), "a.", "").unwrap();
        assert_ne!(short.id(), longer.id());
    }

    #[test]
    fn encoding_roundtrips() {
        let asset = Asset::new(creator(), "Testcoin", "A really cool coin").unwrap();
        let mut bytes = Vec::new();
        asset.write(&mut bytes);
        assert_eq!(bytes.len(), ASSET_LEN);
        let decoded = wire::finish(&bytes, "asset", Asset::parse).unwrap();
        assert_eq!(decoded, asset);
        assert_eq!(decoded.id(), asset.id());
    }

    #[test]
    fn each_field_changes_the_id() {
        let base = Asset::from_parts(creator(), [1u8; 32], [2u8; 96], 0);
        let other_creator = SpendingKey::from([9u8; 32]).public_address();
        assert_ne!(
            base.id(),
            Asset::from_parts(other_creator, [1u8; 32], [2u8; 96], 0).id()
        );
        assert_ne!(
            base.id(),
            Asset::from_parts(creator(), [3u8; 32], [2u8; 96], 0).id()
        );
        assert_ne!(
            base.id(),
            Asset::from_parts(creator(), [1u8; 32], [3u8; 96], 0).id()
        );
        assert_ne!(
            base.id(),
            Asset::from_parts(creator(), [1u8; 32], [2u8; 96], 1).id()
        );
    }

    proptest! {
        #[test]
        fn id_is_deterministic(name in "[a-zA-Z0-9]{1,32}", metadata in "[ -~]{0,96}") {
            let first = Asset::new(creator(), &name, &metadata).unwrap();
            let second = Asset::new(creator(), &name, &metadata).unwrap();
            prop_assert_eq!(first.id(), second.id());
            prop_assert!(!first.id().is_native());
        }

        #[test]
        fn distinct_names_give_distinct_ids(left in "[a-z]{1,32}", right in "[a-z]{1,32}") {
            prop_assume!(left != right);
            let first = Asset::new(creator(), &left, "").unwrap();
            let second = Asset::new(creator(), &right, "").unwrap();
            prop_assert_ne!(first.id(), second.id());
        }
    }
}
