//! Output descriptions.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use ff::PrimeField as _;
use nom::sequence::tuple;
use tracing::trace;

use crate::{
    error::Result,
    keys::OutgoingViewKey,
    merkle_note::{EphemeralSecretKey, MerkleNote},
    note::Note,
    proof::{Circuit, Proof, ProofBlind},
    value::ValueCommitmentTrapdoor,
    wire::ParseResult,
};

/// A note to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputBuilder {
    note: Note,
    is_change: bool,
}

impl OutputBuilder {
    /// Output `note` to its owner.
    #[must_use]
    pub const fn new(note: Note) -> Self {
        Self {
            note,
            is_change: false,
        }
    }

    /// A change output swept in by the builder.
    pub(crate) const fn change(note: Note) -> Self {
        Self {
            note,
            is_change: true,
        }
    }

    /// The note being created.
    #[must_use]
    pub const fn note(&self) -> &Note {
        &self.note
    }

    /// Whether the builder added this output as change.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        self.is_change
    }

    /// Encrypt the note and prove the output.
    ///
    /// The proof covers `cv ‖ cm ‖ epk` and the opening of all three.
    pub fn prove(
        &self,
        ovk: &OutgoingViewKey,
        rcv: &ValueCommitmentTrapdoor,
        esk: &EphemeralSecretKey,
        blind: &ProofBlind,
    ) -> Result<OutputDescription> {
        let value_commitment = rcv.commit(&self.note.asset_id(), self.note.value());
        let merkle_note = MerkleNote::new(&self.note, value_commitment, esk, ovk)?;

        let mut private = Vec::new();
        private.extend_from_slice(&self.note.owner().to_bytes());
        private.extend_from_slice(&self.note.to_plaintext());
        private.extend_from_slice(&rcv.inner().to_repr());
        private.extend_from_slice(&esk.to_bytes());

        let proof = Proof::create(
            Circuit::Output,
            &statement(&merkle_note),
            &private,
            blind,
        );
        trace!(value = self.note.value(), change = self.is_change, "proved output");
        Ok(OutputDescription { proof, merkle_note })
    }
}

/// A proved output. Outputs carry no signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputDescription {
    proof: Proof,
    merkle_note: MerkleNote,
}

impl OutputDescription {
    /// The output proof.
    #[must_use]
    pub const fn proof(&self) -> &Proof {
        &self.proof
    }

    /// The encrypted note.
    #[must_use]
    pub const fn merkle_note(&self) -> &MerkleNote {
        &self.merkle_note
    }

    /// Check the proof against the public note data.
    pub fn verify_proof(&self) -> Result<()> {
        self.proof
            .verify(Circuit::Output, &statement(&self.merkle_note))
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.proof.as_bytes());
        self.merkle_note.write(out);
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, (proof, merkle_note)) = tuple((Proof::parse, MerkleNote::parse))(input)?;
        Ok((rem, Self { proof, merkle_note }))
    }
}

/// `cv ‖ cm ‖ epk`.
fn statement(merkle_note: &MerkleNote) -> Vec<u8> {
    let mut statement = Vec::with_capacity(96);
    statement.extend_from_slice(&merkle_note.value_commitment().to_bytes());
    statement.extend_from_slice(&merkle_note.note_commitment().to_bytes());
    statement.extend_from_slice(&merkle_note.ephemeral_public_key());
    statement
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{
        asset::AssetIdentifier,
        constants::{OUTPUT_SIZE, PROOF_SIZE},
        error::TransactionError,
        keys::SpendingKey, wire,
    };

    #[test]
    fn prove_verify_and_decrypt() {
        let mut rng = StdRng::seed_from_u64(0);
        let sender = SpendingKey::random(&mut rng);
        let receiver = SpendingKey::random(&mut rng);
        let note = Note::new(
            receiver.public_address(),
            40,
            b"",
            AssetIdentifier::native(),
            sender.public_address(),
            &mut rng,
        )
        .unwrap();

        let description = OutputBuilder::new(note)
            .prove(
                &sender.outgoing_view_key(),
                &ValueCommitmentTrapdoor::random(&mut rng),
                &EphemeralSecretKey::random(&mut rng),
                &ProofBlind::random(&mut rng),
            )
            .unwrap();
        description.verify_proof().unwrap();
        assert_eq!(
            description
                .merkle_note()
                .decrypt_for_owner(&receiver.incoming_view_key())
                .unwrap(),
            note
        );

        let mut bytes = Vec::new();
        description.write(&mut bytes);
        assert_eq!(bytes.len(), OUTPUT_SIZE);
        let decoded = wire::finish(&bytes, "output", OutputDescription::parse).unwrap();
        assert_eq!(decoded, description);

        // A modified cv either fails to decode or fails the proof.
        let mut tampered = bytes.clone();
        tampered[PROOF_SIZE] ^= 0x01;
        if let Ok(modified) = wire::finish(&tampered, "output", OutputDescription::parse) {
            assert_eq!(modified.verify_proof(), Err(TransactionError::InvalidProof));
        }
    }
}
