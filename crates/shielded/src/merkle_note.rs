//! Encrypted output notes.
//!
//! An output publishes a [`MerkleNote`]: the value commitment, the note
//! commitment (the future tree leaf) and the note itself encrypted twice
//! over:
//!
//! ```text
//! cv ‖ cm ‖ epk ‖ ChaCha20Poly1305(k_note, plaintext) ‖ ChaCha20Poly1305(k_out, owner ‖ esk)
//! ```
//!
//! - `k_note = BLAKE2b-256("Shielded_NoteKey", [esk]pk ‖ epk)`. The owner
//!   computes the same shared point as `[ivk]epk`, because `pk = [ivk]G_pk`
//!   and `epk = [esk]G_pk`.
//! - `k_out = BLAKE2b-256("Shielded_OutKey_", ovk ‖ cv ‖ cm ‖ epk)` lets the
//!   sender recover `owner ‖ esk`, and from those the note.
//!
//! Both keys are single-use (a fresh `esk` per output), so the nonce is
//! fixed at zero.

use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce,
    aead::{Aead as _, KeyInit as _},
};
use ff::{Field as _, PrimeField as _};
use group::GroupEncoding as _;
use nom::sequence::tuple;
use pasta_curves::{Fq, pallas};
use rand::{CryptoRng, RngCore};

use crate::{
    constants::{
        ENCRYPTED_NOTE_SIZE, MERKLE_NOTE_SIZE, NOTE_ENCRYPTION_KEY_SIZE,
        NOTE_KEY_PERSONALIZATION, OUTGOING_KEY_PERSONALIZATION, PUBLIC_ADDRESS_SIZE, SCALAR_SIZE,
    },
    error::{Result, TransactionError},
    hash::blake2b_256,
    keys::{IncomingViewKey, OutgoingViewKey, PublicAddress},
    note::{Note, NoteCommitment},
    value::ValueCommitment,
    wire::{self, ParseResult},
};

/// Ephemeral secret key `esk`, fresh per output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EphemeralSecretKey(Fq);

impl EphemeralSecretKey {
    /// Sample a fresh key.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self(Fq::random(rng))
    }

    /// `epk = [esk]G_pk`.
    #[must_use]
    pub fn public_key(&self) -> pallas::Point {
        *PublicAddress::generator().point() * self.0
    }

    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        self.0.to_repr()
    }

    fn shared_secret(&self, owner: &PublicAddress) -> pallas::Point {
        *owner.point() * self.0
    }
}

impl From<Fq> for EphemeralSecretKey {
    fn from(esk: Fq) -> Self {
        Self(esk)
    }
}

/// An output's public note data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MerkleNote {
    value_commitment: ValueCommitment,
    note_commitment: NoteCommitment,
    ephemeral_public_key: pallas::Point,
    encrypted_note: [u8; ENCRYPTED_NOTE_SIZE],
    note_encryption_keys: [u8; NOTE_ENCRYPTION_KEY_SIZE],
}

impl MerkleNote {
    /// Encrypt `note` to its owner and to the sender's `ovk`.
    pub fn new(
        note: &Note,
        value_commitment: ValueCommitment,
        esk: &EphemeralSecretKey,
        ovk: &OutgoingViewKey,
    ) -> Result<Self> {
        let note_commitment = note.commitment();
        let epk = esk.public_key();

        let note_key = note_key(&esk.shared_secret(note.owner()), &epk);
        let encrypted_note = seal::<ENCRYPTED_NOTE_SIZE>(&note_key, &note.to_plaintext())?;

        let out_key = outgoing_key(ovk, &value_commitment, &note_commitment, &epk);
        let mut key_plaintext = Vec::with_capacity(PUBLIC_ADDRESS_SIZE + SCALAR_SIZE);
        key_plaintext.extend_from_slice(&note.owner().to_bytes());
        key_plaintext.extend_from_slice(&esk.to_bytes());
        let note_encryption_keys = seal::<NOTE_ENCRYPTION_KEY_SIZE>(&out_key, &key_plaintext)?;

        Ok(Self {
            value_commitment,
            note_commitment,
            ephemeral_public_key: epk,
            encrypted_note,
            note_encryption_keys,
        })
    }

    /// The value commitment `cv`.
    #[must_use]
    pub const fn value_commitment(&self) -> &ValueCommitment {
        &self.value_commitment
    }

    /// The note commitment `cm`, appended to the tree once mined.
    #[must_use]
    pub const fn note_commitment(&self) -> &NoteCommitment {
        &self.note_commitment
    }

    /// The ephemeral public key `epk`.
    #[must_use]
    pub fn ephemeral_public_key(&self) -> [u8; 32] {
        self.ephemeral_public_key.to_bytes()
    }

    /// Open the note with the owner's incoming view key.
    pub fn decrypt_for_owner(&self, ivk: &IncomingViewKey) -> Result<Note> {
        let shared = self.ephemeral_public_key * ivk.inner();
        let key = note_key(&shared, &self.ephemeral_public_key);
        let plaintext = open(&key, &self.encrypted_note)?;
        let note = Note::from_plaintext(ivk.public_address(), &plaintext)
            .map_err(|_err| TransactionError::DecryptionFailed)?;
        self.check(&note)?;
        Ok(note)
    }

    /// Open the note with the sender's outgoing view key.
    pub fn decrypt_for_spender(&self, ovk: &OutgoingViewKey) -> Result<Note> {
        let out_key = outgoing_key(
            ovk,
            &self.value_commitment,
            &self.note_commitment,
            &self.ephemeral_public_key,
        );
        let keys = open(&out_key, &self.note_encryption_keys)?;
        let (owner_bytes, esk_bytes) = wire::finish(&keys, "note keys", |input| {
            tuple((
                wire::array::<PUBLIC_ADDRESS_SIZE>,
                wire::array::<SCALAR_SIZE>,
            ))(input)
        })
        .map_err(|_err| TransactionError::DecryptionFailed)?;
        let owner =
            PublicAddress::new(&owner_bytes).map_err(|_err| TransactionError::DecryptionFailed)?;
        let esk = Option::<Fq>::from(Fq::from_repr(esk_bytes))
            .map(EphemeralSecretKey)
            .ok_or(TransactionError::DecryptionFailed)?;

        let key = note_key(&esk.shared_secret(&owner), &self.ephemeral_public_key);
        let plaintext = open(&key, &self.encrypted_note)?;
        let note = Note::from_plaintext(owner, &plaintext)
            .map_err(|_err| TransactionError::DecryptionFailed)?;
        self.check(&note)?;
        Ok(note)
    }

    fn check(&self, note: &Note) -> Result<()> {
        if note.commitment() == self.note_commitment {
            Ok(())
        } else {
            Err(TransactionError::DecryptionFailed)
        }
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value_commitment.to_bytes());
        out.extend_from_slice(&self.note_commitment.to_bytes());
        out.extend_from_slice(&self.ephemeral_public_key.to_bytes());
        out.extend_from_slice(&self.encrypted_note);
        out.extend_from_slice(&self.note_encryption_keys);
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (
            rem,
            (value_commitment, note_commitment, epk_bytes, encrypted_note, note_encryption_keys),
        ) = tuple((
            ValueCommitment::parse,
            NoteCommitment::parse,
            wire::array::<32>,
            wire::array::<ENCRYPTED_NOTE_SIZE>,
            wire::array::<NOTE_ENCRYPTION_KEY_SIZE>,
        ))(input)?;
        let Some(ephemeral_public_key) =
            Option::<pallas::Point>::from(pallas::Point::from_bytes(&epk_bytes))
        else {
            return wire::reject(input);
        };
        Ok((
            rem,
            Self {
                value_commitment,
                note_commitment,
                ephemeral_public_key,
                encrypted_note,
                note_encryption_keys,
            },
        ))
    }

    /// Encoded size.
    pub const SIZE: usize = MERKLE_NOTE_SIZE;
}

fn note_key(shared: &pallas::Point, epk: &pallas::Point) -> [u8; 32] {
    blake2b_256(
        NOTE_KEY_PERSONALIZATION,
        &[&shared.to_bytes(), &epk.to_bytes()],
    )
}

fn outgoing_key(
    ovk: &OutgoingViewKey,
    cv: &ValueCommitment,
    cm: &NoteCommitment,
    epk: &pallas::Point,
) -> [u8; 32] {
    blake2b_256(
        OUTGOING_KEY_PERSONALIZATION,
        &[ovk.as_bytes(), &cv.to_bytes(), &cm.to_bytes(), &epk.to_bytes()],
    )
}

fn seal<const N: usize>(key: &[u8; 32], plaintext: &[u8]) -> Result<[u8; N]> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let ciphertext = cipher
        .encrypt(&Nonce::default(), plaintext)
        .map_err(|_err| TransactionError::InvalidState("note encryption failed"))?;
    <[u8; N]>::try_from(ciphertext)
        .map_err(|_err| TransactionError::InvalidState("unexpected ciphertext length"))
}

fn open(key: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(&Nonce::default(), ciphertext)
        .map_err(|_err| TransactionError::DecryptionFailed)
}
