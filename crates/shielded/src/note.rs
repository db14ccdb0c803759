//! Notes, note commitments and nullifiers.
//!
//! ## Note Structure
//!
//! | Field      | Type                | Description                         |
//! | ---------- | ------------------- | ----------------------------------- |
//! | `owner`    | [`PublicAddress`]   | Recipient, the only party able to spend |
//! | `value`    | `u64`               | Amount, at most [`MAX_VALUE`]       |
//! | `memo`     | [`Memo`]            | 32 bytes of free-form data          |
//! | `asset_id` | [`AssetIdentifier`] | Which asset the value is in         |
//! | `sender`   | [`PublicAddress`]   | Creator of the note                 |
//! | `rcm`      | [`NoteCommitmentTrapdoor`] | Commitment randomness        |
//!
//! ## Note Commitment
//!
//! `cm = ToBase(BLAKE2b-512(owner || value || memo || asset_id || sender || rcm))`
//!
//! The commitment is the leaf appended to the note commitment tree.
//!
//! ## Nullifier
//!
//! `nf = BLAKE2b-256(nk || cm || position)`
//!
//! Only the holder of `nk` can link a nullifier to its note, and the tree
//! position makes two notes with equal commitments nullify differently.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use ff::{Field as _, FromUniformBytes as _, PrimeField as _};
use nom::{number::complete::le_u64, sequence::tuple};
use pasta_curves::{Fp, Fq};
use rand::{CryptoRng, RngCore};

use crate::{
    asset::AssetIdentifier,
    constants::{
        ASSET_ID_LENGTH, MAX_VALUE, MEMO_SIZE, NOTE_COMMITMENT_PERSONALIZATION,
        NOTE_PLAINTEXT_SIZE, NULLIFIER_PERSONALIZATION, PUBLIC_ADDRESS_SIZE, SCALAR_SIZE,
    },
    error::{Result, TransactionError},
    hash::{blake2b_256, blake2b_512},
    keys::{NullifierKey, PublicAddress},
    wire::{self, ParseResult},
};

/// A 32-byte, zero-padded memo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Memo([u8; MEMO_SIZE]);

impl Memo {
    /// Pad `bytes` into a memo; more than 32 bytes is
    /// [`TransactionError::InvalidArgument`].
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MEMO_SIZE {
            return Err(TransactionError::InvalidArgument("memo too long"));
        }
        let mut memo = [0u8; MEMO_SIZE];
        for (dst, src) in memo.iter_mut().zip(bytes) {
            *dst = *src;
        }
        Ok(Self(memo))
    }

    /// Raw memo bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MEMO_SIZE] {
        &self.0
    }
}

impl From<[u8; MEMO_SIZE]> for Memo {
    fn from(bytes: [u8; MEMO_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Note commitment trapdoor `rcm`: randomness that blinds the commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteCommitmentTrapdoor(Fq);

impl NoteCommitmentTrapdoor {
    /// Sample a fresh trapdoor.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self(Fq::random(rng))
    }
}

impl From<Fq> for NoteCommitmentTrapdoor {
    fn from(rcm: Fq) -> Self {
        Self(rcm)
    }
}

/// A note commitment `cm`, the tree leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteCommitment(Fp);

impl NoteCommitment {
    /// Canonical encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_repr()
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, bytes) = wire::array::<32>(input)?;
        match Self::try_from(bytes) {
            Ok(cm) => Ok((rem, cm)),
            Err(_err) => wire::reject(input),
        }
    }
}

impl TryFrom<[u8; 32]> for NoteCommitment {
    type Error = TransactionError;

    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        Option::<Fp>::from(Fp::from_repr(bytes))
            .map(Self)
            .ok_or(TransactionError::Malformed("non-canonical note commitment"))
    }
}

/// A nullifier: the public tag revealed when a note is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nullifier([u8; 32]);

impl Nullifier {
    /// Raw nullifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Nullifier {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A note: a discrete amount of one asset owned by one address.
///
/// Created by outputs, consumed by spends. Immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    owner: PublicAddress,
    value: u64,
    memo: Memo,
    asset_id: AssetIdentifier,
    sender: PublicAddress,
    rcm: NoteCommitmentTrapdoor,
}

impl Note {
    /// Create a note with fresh commitment randomness.
    ///
    /// Fails with [`TransactionError::InvalidArgument`] if `value` exceeds
    /// [`MAX_VALUE`] or `memo` is longer than 32 bytes.
    pub fn new(
        owner: PublicAddress,
        value: u64,
        memo: &[u8],
        asset_id: AssetIdentifier,
        sender: PublicAddress,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Self> {
        Self::from_parts(
            owner,
            value,
            Memo::new(memo)?,
            asset_id,
            sender,
            NoteCommitmentTrapdoor::random(rng),
        )
    }

    /// Create a note with explicit randomness.
    pub fn from_parts(
        owner: PublicAddress,
        value: u64,
        memo: Memo,
        asset_id: AssetIdentifier,
        sender: PublicAddress,
        rcm: NoteCommitmentTrapdoor,
    ) -> Result<Self> {
        if value > MAX_VALUE {
            return Err(TransactionError::InvalidArgument("note value exceeds maximum"));
        }
        Ok(Self {
            owner,
            value,
            memo,
            asset_id,
            sender,
            rcm,
        })
    }

    /// The recipient.
    #[must_use]
    pub const fn owner(&self) -> &PublicAddress {
        &self.owner
    }

    /// The amount.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// The memo.
    #[must_use]
    pub const fn memo(&self) -> &Memo {
        &self.memo
    }

    /// The asset the value is denominated in.
    #[must_use]
    pub const fn asset_id(&self) -> AssetIdentifier {
        self.asset_id
    }

    /// The note's creator.
    #[must_use]
    pub const fn sender(&self) -> &PublicAddress {
        &self.sender
    }

    /// Computes the note commitment `cm` over every field.
    #[must_use]
    pub fn commitment(&self) -> NoteCommitment {
        let digest = blake2b_512(
            NOTE_COMMITMENT_PERSONALIZATION,
            &[
                &self.owner.to_bytes(),
                &self.value.to_le_bytes(),
                self.memo.as_bytes(),
                self.asset_id.as_bytes(),
                &self.sender.to_bytes(),
                &self.rcm.0.to_repr(),
            ],
        );
        NoteCommitment(Fp::from_uniform_bytes(&digest))
    }

    /// Derives the nullifier of this note at tree `position`.
    #[must_use]
    pub fn nullifier(&self, nk: &NullifierKey, position: u32) -> Nullifier {
        Nullifier(blake2b_256(
            NULLIFIER_PERSONALIZATION,
            &[
                &nk.to_bytes(),
                &self.commitment().to_bytes(),
                &position.to_le_bytes(),
            ],
        ))
    }

    /// Encode everything but the owner: `rcm ‖ memo ‖ value ‖ asset ‖ sender`.
    pub(crate) fn to_plaintext(&self) -> [u8; NOTE_PLAINTEXT_SIZE] {
        let mut out = Vec::with_capacity(NOTE_PLAINTEXT_SIZE);
        out.extend_from_slice(&self.rcm.0.to_repr());
        out.extend_from_slice(self.memo.as_bytes());
        out.extend_from_slice(&self.value.to_le_bytes());
        out.extend_from_slice(self.asset_id.as_bytes());
        out.extend_from_slice(&self.sender.to_bytes());
        let mut plaintext = [0u8; NOTE_PLAINTEXT_SIZE];
        plaintext.copy_from_slice(&out);
        plaintext
    }

    /// Inverse of [`to_plaintext`](Self::to_plaintext) for a known owner.
    pub(crate) fn from_plaintext(owner: PublicAddress, plaintext: &[u8]) -> Result<Self> {
        wire::finish(plaintext, "note plaintext", |input| {
            let (rem, (rcm_bytes, memo, value, asset_id, sender_bytes)) = tuple((
                wire::array::<SCALAR_SIZE>,
                wire::array::<MEMO_SIZE>,
                le_u64,
                wire::array::<ASSET_ID_LENGTH>,
                wire::array::<PUBLIC_ADDRESS_SIZE>,
            ))(input)?;
            let (Some(rcm), Ok(sender)) = (
                Option::<Fq>::from(Fq::from_repr(rcm_bytes)),
                PublicAddress::new(&sender_bytes),
            ) else {
                return wire::reject(input);
            };
            match Self::from_parts(
                owner,
                value,
                Memo(memo),
                AssetIdentifier::from(asset_id),
                sender,
                NoteCommitmentTrapdoor(rcm),
            ) {
                Ok(note) => Ok((rem, note)),
                Err(_err) => wire::reject(input),
            }
        })
    }
}
