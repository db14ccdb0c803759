//! Burn descriptions.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use nom::{number::complete::le_u64, sequence::tuple};

use crate::{
    asset::AssetIdentifier,
    constants::MAX_VALUE,
    error::{Result, TransactionError},
    wire::ParseResult,
};

/// Destroys `value` units of a custom asset.
///
/// Burns are public: no proof, no signature. The burned value leaves the
/// balance as `-[v]V_asset`, so spends of that asset must cover it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnDescription {
    asset_id: AssetIdentifier,
    value: u64,
}

impl BurnDescription {
    /// Burn `value` units of `asset_id`.
    ///
    /// The native asset cannot be burned ([`TransactionError::InvalidAsset`])
    /// and `value` must be in `1..=MAX_VALUE`
    /// ([`TransactionError::InvalidArgument`]).
    pub fn new(asset_id: AssetIdentifier, value: u64) -> Result<Self> {
        let burn = Self { asset_id, value };
        burn.verify()?;
        Ok(burn)
    }

    /// Recheck the rules of [`new`](Self::new) on a decoded burn.
    pub fn verify(&self) -> Result<()> {
        if self.asset_id.is_native() {
            return Err(TransactionError::InvalidAsset("cannot burn the native asset"));
        }
        if self.value == 0 || self.value > MAX_VALUE {
            return Err(TransactionError::InvalidArgument("burn value out of range"));
        }
        Ok(())
    }

    /// The burned asset.
    #[must_use]
    pub const fn asset_id(&self) -> AssetIdentifier {
        self.asset_id
    }

    /// The burned amount.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.asset_id.as_bytes());
        out.extend_from_slice(&self.value.to_le_bytes());
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, (asset_id, value)) = tuple((AssetIdentifier::parse, le_u64))(input)?;
        Ok((rem, Self { asset_id, value }))
    }
}
