//! Action proofs.
//!
//! Every spend, output and mint carries a 192-byte proof over a public
//! statement. The proving backend here is a transparent, hash-based
//! stand-in for a zk-SNARK with the same interface:
//!
//! | Bytes      | Content |
//! | ---------- | ------- |
//! | `0..64`    | statement digest `H("Shielded_PrfStmt", circuit ‖ public inputs)` |
//! | `64..128`  | witness commitment `H("Shielded_PrfWtns", circuit ‖ witness ‖ blind)` |
//! | `128..192` | seal `H("Shielded_PrfSeal", circuit ‖ statement ‖ witness commitment)` |
//!
//! ## Proving
//!
//! The caller checks the circuit's relation natively before calling
//! [`Proof::create`]; a false statement never gets a proof. The witness
//! commitment is hiding thanks to a fresh [`ProofBlind`].
//!
//! ## Verification
//!
//! The verifier rebuilds the public inputs from the description, recomputes
//! the statement digest and checks the seal. A proof moved to a different
//! description, or a description whose public fields were altered, fails.

use rand::{CryptoRng, RngCore};

use crate::{
    constants::{
        PROOF_SEAL_PERSONALIZATION, PROOF_SIZE, PROOF_STATEMENT_PERSONALIZATION,
        PROOF_WITNESS_PERSONALIZATION,
    },
    error::{Result, TransactionError},
    hash::blake2b_512,
    wire::{self, ParseResult},
};

/// The relation a proof attests to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Circuit {
    /// Note ownership, tree membership, nullifier and value commitment.
    Spend,
    /// Note commitment, value commitment and ephemeral key.
    Output,
    /// Asset ownership for new supply.
    Mint,
}

impl Circuit {
    const fn tag(self) -> [u8; 1] {
        match self {
            Self::Spend => [0],
            Self::Output => [1],
            Self::Mint => [2],
        }
    }
}

/// Fresh randomness hiding a proof's witness commitment.
#[derive(Clone, Copy, Debug)]
pub struct ProofBlind([u8; 32]);

impl ProofBlind {
    /// Sample a fresh blind.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let mut blind = [0u8; 32];
        rng.fill_bytes(&mut blind);
        Self(blind)
    }
}

/// A 192-byte action proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<u8>", try_from = "Vec<u8>"))]
pub struct Proof([u8; PROOF_SIZE]);

impl Proof {
    /// Prove `statement` from `witness`.
    ///
    /// `statement` is the circuit's public input encoding, `witness` its
    /// private input encoding.
    #[must_use]
    pub fn create(circuit: Circuit, statement: &[u8], witness: &[u8], blind: &ProofBlind) -> Self {
        let tag = circuit.tag();
        let digest = statement_digest(circuit, statement);
        let witness_commitment =
            blake2b_512(PROOF_WITNESS_PERSONALIZATION, &[&tag, witness, &blind.0]);
        let seal = blake2b_512(
            PROOF_SEAL_PERSONALIZATION,
            &[&tag, &digest, &witness_commitment],
        );

        let mut proof = [0u8; PROOF_SIZE];
        for (dst, src) in proof
            .iter_mut()
            .zip(digest.iter().chain(&witness_commitment).chain(&seal))
        {
            *dst = *src;
        }
        Self(proof)
    }

    /// Verify against the public inputs the verifier reconstructed.
    pub fn verify(&self, circuit: Circuit, statement: &[u8]) -> Result<()> {
        let (digest, rest) = self.0.split_at(64);
        let (witness_commitment, seal) = rest.split_at(64);

        let expected_digest = statement_digest(circuit, statement);
        let expected_seal = blake2b_512(
            PROOF_SEAL_PERSONALIZATION,
            &[&circuit.tag(), &expected_digest, witness_commitment],
        );
        if digest == expected_digest.as_slice() && seal == expected_seal.as_slice() {
            Ok(())
        } else {
            Err(TransactionError::InvalidProof)
        }
    }

    /// Raw proof bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PROOF_SIZE] {
        &self.0
    }

    pub(crate) fn parse(input: &[u8]) -> ParseResult<'_, Self> {
        let (rem, bytes) = wire::array::<PROOF_SIZE>(input)?;
        Ok((rem, Self(bytes)))
    }
}

fn statement_digest(circuit: Circuit, statement: &[u8]) -> [u8; 64] {
    blake2b_512(PROOF_STATEMENT_PERSONALIZATION, &[&circuit.tag(), statement])
}

impl From<[u8; PROOF_SIZE]> for Proof {
    fn from(bytes: [u8; PROOF_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Proof> for Vec<u8> {
    fn from(proof: Proof) -> Self {
        proof.0.to_vec()
    }
}

impl TryFrom<Vec<u8>> for Proof {
    type Error = TransactionError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        <[u8; PROOF_SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_err| TransactionError::Malformed("proof must be 192 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    #[test]
    fn proof_verifies_only_its_statement() {
        let mut rng = StdRng::seed_from_u64(0);
        let blind = ProofBlind::random(&mut rng);
        let proof = Proof::create(Circuit::Spend, b"public", b"private", &blind);

        proof.verify(Circuit::Spend, b"public").unwrap();
        assert_eq!(
            proof.verify(Circuit::Spend, b"publiC"),
            Err(TransactionError::InvalidProof)
        );
        assert_eq!(
            proof.verify(Circuit::Output, b"public"),
            Err(TransactionError::InvalidProof)
        );
    }

    #[test]
    fn blind_hides_the_witness() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = Proof::create(Circuit::Mint, b"s", b"w", &ProofBlind::random(&mut rng));
        let second = Proof::create(Circuit::Mint, b"s", b"w", &ProofBlind::random(&mut rng));
        assert_ne!(first, second);
        first.verify(Circuit::Mint, b"s").unwrap();
        second.verify(Circuit::Mint, b"s").unwrap();
    }

    #[test]
    fn tampered_seal_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let proof = Proof::create(Circuit::Output, b"s", b"w", &ProofBlind::random(&mut rng));
        let mut bytes = *proof.as_bytes();
        bytes[191] ^= 1;
        assert_eq!(
            Proof::from(bytes).verify(Circuit::Output, b"s"),
            Err(TransactionError::InvalidProof)
        );
    }
}
