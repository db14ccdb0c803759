//! Mint descriptions.
//!
//! A mint creates `value` new units of a custom asset. The minted value
//! enters the transaction's balance as `+[v]V_asset` and must leave it
//! through outputs of that asset (or the builder's change sweep).
//!
//! Minting rights depend on the transaction version:
//!
//! - **V1**: only the asset's creator may mint.
//! - **V2**: the description names the current owner (the signer) and may
//!   hand ownership to a new address.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use ff::PrimeField as _;
use nom::{
    combinator::map,
    number::complete::{le_u8, le_u64},
    sequence::tuple,
};
use rand::{CryptoRng, RngCore};
use tracing::trace;

use super::Unauthorized;
use crate::{
    asset::Asset,
    constants::MAX_VALUE,
    error::{Result, TransactionError},
    keys::{
        PublicAddress, RandomizedSigningKey, RandomizedVerificationKey, SpendAuthRandomizer,
        SpendAuthSignature, ViewKey,
    },
    proof::{Circuit, Proof, ProofBlind},
    transaction::{SigHash, TransactionVersion},
    wire::{self, ParseResult},
};

/// New supply of a custom asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintBuilder {
    asset: Asset,
    value: u64,
    transfer_ownership_to: Option<PublicAddress>,
}

impl MintBuilder {
    /// Mint `value` units of `asset`.
    ///
    /// The native asset cannot be minted ([`TransactionError::InvalidAsset`])
    /// and `value` must be in `1..=MAX_VALUE`
    /// ([`TransactionError::InvalidArgument`]).
    pub fn new(asset: Asset, value: u64) -> Result<Self> {
        check_mint(&asset, value)?;
        Ok(Self {
            asset,
            value,
            transfer_ownership_to: None,
        })
    }

    /// Also hand ownership of the asset to `new_owner`.
    #[must_use]
    pub const fn transfer_ownership_to(self, new_owner: PublicAddress) -> Self {
        Self {
            transfer_ownership_to: Some(new_owner),
            ..self
        }
    }

    /// The asset being minted.
    #[must_use]
    pub const fn asset(&self) -> &Asset {
        &self.asset
    }

    /// The minted amount.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Prove the mint for a transaction of `version` signed by `view_key`.
    pub fn prove(
        &self,
        version: TransactionVersion,
        view_key: &ViewKey,
        alpha: &SpendAuthRandomizer,
        rk: &RandomizedVerificationKey,
        blind: &ProofBlind,
    ) -> Result<MintDescription<Unauthorized>> {
        let owner = view_key.public_address();
        if !version.has_mint_ownership() {
            if *self.asset.creator() != owner {
                return Err(TransactionError::InvalidArgument(
                    "only the asset creator can mint",
                ));
            }
            if self.transfer_ownership_to.is_some() {
                return Err(TransactionError::InvalidArgument(
                    "ownership transfer requires version 2",
                ));
            }
        }
        if view_key.authorizing_key().randomize(alpha) != *rk {
            return Err(TransactionError::InvalidArgument(
                "randomized key does not match the view key",
            ));
        }

        let mut private = Vec::new();
        private.extend_from_slice(&view_key.authorizing_key().to_bytes());
        private.extend_from_slice(&view_key.nullifier_key().to_bytes());
        private.extend_from_slice(&alpha.inner().to_repr());

        let statement = statement(
            rk,
            &self.asset,
            self.value,
            &owner,
            self.transfer_ownership_to.as_ref(),
        );
        let proof = Proof::create(Circuit::Mint, &statement, &private, blind);
        trace!(asset = %self.asset.id(), value = self.value, "proved mint");
        Ok(MintDescription {
            proof,
            asset: self.asset,
            value: self.value,
            owner,
            transfer_ownership_to: self.transfer_ownership_to,
            authorization: Unauthorized,
        })
    }
}

/// A proved mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintDescription<A = SpendAuthSignature> {
    proof: Proof,
    asset: Asset,
    value: u64,
    owner: PublicAddress,
    transfer_ownership_to: Option<PublicAddress>,
    authorization: A,
}

impl<A> MintDescription<A> {
    /// The mint proof.
    #[must_use]
    pub const fn proof(&self) -> &Proof {
        &self.proof
    }

    /// The asset being minted.
    #[must_use]
    pub const fn asset(&self) -> &Asset {
        &self.asset
    }

    /// The minted amount.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// The asset owner authorizing the mint.
    #[must_use]
    pub const fn owner(&self) -> &PublicAddress {
        &self.owner
    }

    /// The new owner, if this mint transfers ownership.
    #[must_use]
    pub const fn transfer_ownership_to(&self) -> Option<&PublicAddress> {
        self.transfer_ownership_to.as_ref()
    }

    /// Everything but the signature, in the layout of `version`.
    pub(crate) fn write_unsigned(&self, version: TransactionVersion, out: &mut Vec<u8>) {
        out.extend_from_slice(self.proof.as_bytes());
        self.asset.write(out);
        out.extend_from_slice(&self.value.to_le_bytes());
        if version.has_mint_ownership() {
            out.extend_from_slice(&self.owner.to_bytes());
            write_transfer(out, self.transfer_ownership_to.as_ref());
        }
    }

    /// Check the proof and the minting rules of `version`.
    ///
    /// A decoded mint of the native asset or of a value outside
    /// `1..=MAX_VALUE` fails like [`MintBuilder::new`] would.
    pub fn verify_proof(
        &self,
        version: TransactionVersion,
        rk: &RandomizedVerificationKey,
    ) -> Result<()> {
        check_mint(&self.asset, self.value)?;
        if !version.has_mint_ownership() && *self.asset.creator() != self.owner {
            return Err(TransactionError::InvalidProof);
        }
        let statement = statement(
            rk,
            &self.asset,
            self.value,
            &self.owner,
            self.transfer_ownership_to.as_ref(),
        );
        self.proof.verify(Circuit::Mint, &statement)
    }
}

impl MintDescription<Unauthorized> {
    /// Authorize with the transaction's randomized signing key.
    pub fn sign(
        self,
        rsk: &RandomizedSigningKey,
        sighash: &SigHash,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> MintDescription {
        MintDescription {
            proof: self.proof,
            asset: self.asset,
            value: self.value,
            owner: self.owner,
            transfer_ownership_to: self.transfer_ownership_to,
            authorization: rsk.sign(rng, sighash.as_bytes()),
        }
    }
}

impl MintDescription {
    /// The mint authorization signature.
    #[must_use]
    pub const fn signature(&self) -> &SpendAuthSignature {
        &self.authorization
    }

    /// Check the authorization signature over `sighash`.
    pub fn verify_signature(
        &self,
        rk: &RandomizedVerificationKey,
        sighash: &SigHash,
    ) -> Result<()> {
        rk.verify(sighash.as_bytes(), &self.authorization)
    }

    pub(crate) fn write(&self, version: TransactionVersion, out: &mut Vec<u8>) {
        self.write_unsigned(version, out);
        out.extend_from_slice(&<[u8; 64]>::from(self.authorization));
    }

    pub(crate) fn parse(version: TransactionVersion, input: &[u8]) -> ParseResult<'_, Self> {
        let (after_value, (proof, asset, value)) =
            tuple((Proof::parse, Asset::parse, le_u64))(input)?;
        let (after_owner, (owner, transfer_ownership_to)) = if version.has_mint_ownership() {
            tuple((parse_address, parse_transfer))(after_value)?
        } else {
            (after_value, (*asset.creator(), None))
        };
        let (rem, signature) = wire::array::<64>(after_owner)?;
        Ok((
            rem,
            Self {
                proof,
                asset,
                value,
                owner,
                transfer_ownership_to,
                authorization: SpendAuthSignature::from(signature),
            },
        ))
    }
}

/// Public inputs: `rk ‖ asset ‖ value ‖ owner ‖ transfer`.
fn statement(
    rk: &RandomizedVerificationKey,
    asset: &Asset,
    value: u64,
    owner: &PublicAddress,
    new_owner: Option<&PublicAddress>,
) -> Vec<u8> {
    let mut statement = rk.to_bytes().to_vec();
    asset.write(&mut statement);
    statement.extend_from_slice(&value.to_le_bytes());
    statement.extend_from_slice(&owner.to_bytes());
    write_transfer(&mut statement, new_owner);
    statement
}

/// The native asset is never minted, and a mint creates `1..=MAX_VALUE`.
fn check_mint(asset: &Asset, value: u64) -> Result<()> {
    if asset.id().is_native() {
        return Err(TransactionError::InvalidAsset("cannot mint the native asset"));
    }
    if value == 0 || value > MAX_VALUE {
        return Err(TransactionError::InvalidArgument("mint value out of range"));
    }
    Ok(())
}

fn write_transfer(out: &mut Vec<u8>, transfer: Option<&PublicAddress>) {
    match transfer {
        Some(new_owner) => {
            out.push(1);
            out.extend_from_slice(&new_owner.to_bytes());
        }
        None => out.push(0),
    }
}

fn parse_transfer(input: &[u8]) -> ParseResult<'_, Option<PublicAddress>> {
    let (rem, flag) = le_u8(input)?;
    match flag {
        0 => Ok((rem, None)),
        1 => map(parse_address, Some)(rem),
        _ => wire::reject(input),
    }
}

fn parse_address(input: &[u8]) -> ParseResult<'_, PublicAddress> {
    let (rem, bytes) = wire::array::<32>(input)?;
    match PublicAddress::new(&bytes) {
        Ok(address) => Ok((rem, address)),
        Err(_err) => wire::reject(input),
    }
}
