//! Spend descriptions.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use ff::PrimeField as _;
use nom::{number::complete::le_u32, sequence::tuple};
use rand::{CryptoRng, RngCore};
use tracing::trace;

use super::Unauthorized;
use crate::{
    error::{Result, TransactionError},
    keys::{
        RandomizedSigningKey, RandomizedVerificationKey, SpendAuthRandomizer, SpendAuthSignature,
        ViewKey,
    },
    note::{Note, Nullifier},
    proof::{Circuit, Proof, ProofBlind},
    transaction::SigHash,
    value::{ValueCommitment, ValueCommitmentTrapdoor},
    wire::{self, ParseResult},
    witness::{MerkleHash, Witness},
};

/// A note to spend together with its inclusion witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendBuilder {
    note: Note,
    witness: Witness,
}

impl SpendBuilder {
    /// Pair a note with its witness, checking the witness first.
    ///
    /// Fails with [`TransactionError::InvalidWitness`] when the path does
    /// not lead from the note's commitment to the witness root.
    pub fn new(note: Note, witness: Witness) -> Result<Self> {
        witness.verify(&note.commitment())?;
        Ok(Self { note, witness })
    }

    /// The note being spent.
    #[must_use]
    pub const fn note(&self) -> &Note {
        &self.note
    }

    /// Its inclusion witness.
    #[must_use]
    pub const fn witness(&self) -> &Witness {
        &self.witness
    }

    /// Prove the spend.
    ///
    /// Checks natively that the witness holds, that `view_key` owns the
    /// note and that `rk` is `ak` randomized by `alpha`, then proves.
    pub fn prove(
        &self,
        view_key: &ViewKey,
        alpha: &SpendAuthRandomizer,
        rk: &RandomizedVerificationKey,
        rcv: &ValueCommitmentTrapdoor,
        blind: &ProofBlind,
    ) -> Result<SpendDescription<Unauthorized>> {
        self.witness.verify(&self.note.commitment())?;
        if *self.note.owner() != view_key.public_address() {
            return Err(TransactionError::InvalidArgument(
                "spent note is not owned by the view key",
            ));
        }
        if view_key.authorizing_key().randomize(alpha) != *rk {
            return Err(TransactionError::InvalidArgument(
                "randomized key does not match the view key",
            ));
        }

        let value_commitment = rcv.commit(&self.note.asset_id(), self.note.value());
        let root_hash = *self.witness.root();
        let tree_size = self.witness.tree_size();
        let nullifier = self
            .note
            .nullifier(view_key.nullifier_key(), self.witness.position());

        let mut statement = rk.to_bytes().to_vec();
        write_public(&mut statement, &value_commitment, &root_hash, tree_size, &nullifier);

        let mut private = Vec::new();
        private.extend_from_slice(&self.note.owner().to_bytes());
        private.extend_from_slice(&self.note.to_plaintext());
        private.extend_from_slice(&self.witness.position().to_le_bytes());
        for sibling in self.witness.auth_path() {
            private.extend_from_slice(sibling.as_bytes());
        }
        private.extend_from_slice(&view_key.authorizing_key().to_bytes());
        private.extend_from_slice(&view_key.nullifier_key().to_bytes());
        private.extend_from_slice(&alpha.inner().to_repr());
        private.extend_from_slice(&rcv.inner().to_repr());

        let proof = Proof::create(Circuit::Spend, &statement, &private, blind);
        trace!(position = self.witness.position(), "proved spend");
        Ok(SpendDescription {
            proof,
            value_commitment,
            root_hash,
            tree_size,
            nullifier,
            authorization: Unauthorized,
        })
    }
}

/// A proved spend.
///
/// `A` is [`Unauthorized`] until [`sign`](SpendDescription::sign) attaches
/// a [`SpendAuthSignature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpendDescription<A = SpendAuthSignature> {
    proof: Proof,
    value_commitment: ValueCommitment,
    root_hash: MerkleHash,
    tree_size: u32,
    nullifier: Nullifier,
    authorization: A,
}

impl<A> SpendDescription<A> {
    /// The spend proof.
    #[must_use]
    pub const fn proof(&self) -> &Proof {
        &self.proof
    }

    /// The value commitment `cv`.
    #[must_use]
    pub const fn value_commitment(&self) -> &ValueCommitment {
        &self.value_commitment
    }

    /// The anchor the note was proven against.
    #[must_use]
    pub const fn root_hash(&self) -> &MerkleHash {
        &self.root_hash
    }

    /// Tree size at the anchor.
    #[must_use]
    pub const fn tree_size(&self) -> u32 {
        self.tree_size
    }

    /// The revealed nullifier.
    #[must_use]
    pub const fn nullifier(&self) -> &Nullifier {
        &self.nullifier
    }

    /// Everything but the signature; what the sighash commits to.
    pub(crate) fn write_unsigned(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.proof.as_bytes());
        write_public(
            out,
            &self.value_commitment,
            &self.root_hash,
            self.tree_size,
            &self.nullifier,
        );
    }

    /// Check the proof against `rk` and the public fields.
    pub fn verify_proof(&self, rk: &RandomizedVerificationKey) -> Result<()> {
        let mut statement = rk.to_bytes().to_vec();
        write_public(
            &mut statement,
            &self.value_commitment,
            &self.root_hash,
            self.tree_size,
            &self.nullifier,
        );
        self.proof.verify(Circuit::Spend, &statement)
    }
}

impl SpendDescription<Unauthorized> {
    /// Authorize with the transaction's randomized signing key.
    pub fn sign(
        self,
        rsk: &RandomizedSigningKey,
        sighash: &SigHash,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> SpendDescription {
        SpendDescription {
            proof: self.proof,
            value_commitment: self.value_commitment,
            root_hash: self.root_hash,
            tree_size: self.tree_size,
            nullifier: self.nullifier,
            authorization: rsk.sign(rng, sighash.as_bytes()),
        }
    }
}

impl SpendDescription {
    /// The spend authorization signature.
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

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        self.write_unsigned(out);
        out.extend_from_slice(&<[u8; 64]>::from(self.authorization));
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, (proof, value_commitment, root_hash, tree_size, nullifier, signature)) =
            tuple((
                Proof::parse,
                ValueCommitment::parse,
                MerkleHash::parse,
                le_u32,
                wire::array::<32>,
                wire::array::<64>,
            ))(input)?;
        Ok((
            rem,
            Self {
                proof,
                value_commitment,
                root_hash,
                tree_size,
                nullifier: Nullifier::from(nullifier),
                authorization: SpendAuthSignature::from(signature),
            },
        ))
    }
}

/// `cv ‖ anchor ‖ tree_size ‖ nf`: the spend's public inputs after `rk`.
fn write_public(
    out: &mut Vec<u8>,
    value_commitment: &ValueCommitment,
    root_hash: &MerkleHash,
    tree_size: u32,
    nullifier: &Nullifier,
) {
    out.extend_from_slice(&value_commitment.to_bytes());
    out.extend_from_slice(root_hash.as_bytes());
    out.extend_from_slice(&tree_size.to_le_bytes());
    out.extend_from_slice(nullifier.as_bytes());
}
