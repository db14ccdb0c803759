//! Transactions: proved, signed and serialized.
//!
//! ## Wire format
//!
//! All integers little endian.
//!
//! | Field | Size |
//! | ----- | ---- |
//! | version | 1 |
//! | spend, output, mint, burn counts | 8 each |
//! | fee (signed) | 8 |
//! | expiration | 4 |
//! | randomized public key `rk` | 32 |
//! | spends | 356 each |
//! | outputs | 520 each |
//! | mints | version dependent |
//! | burns | 40 each |
//! | binding signature | 64 |
//!
//! ## Signature hash
//!
//! Spend, mint and binding signatures all sign one digest:
//!
//! ```text
//! sighash = BLAKE2b-256("Shielded_SigHash",
//!     sig_version ‖ version ‖ expiration ‖ fee ‖ rk
//!     ‖ spends ‖ outputs ‖ mints ‖ burns)
//! ```
//!
//! where spends and mints are encoded without their signatures.
//!
//! ## Binding
//!
//! The verifier derives
//!
//! ```text
//! bvk = Σcv_spend - Σcv_output + Σ[v]V_mint - Σ[v]V_burn - [fee]V_native
//! ```
//!
//! which equals `[bsk]R` exactly when every asset balances, and checks the
//! binding signature under it.

#![expect(clippy::module_name_repetitions, reason = "protocol type names")]

use alloc::collections::BTreeSet;

use group::Group as _;
use nom::{
    multi::count,
    number::complete::{le_i64, le_u8, le_u32, le_u64},
    sequence::tuple,
};
use pasta_curves::pallas;
use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

use crate::{
    asset::AssetIdentifier,
    constants::{
        BURN_SIZE, MAX_VALUE, OUTPUT_SIZE, SIGHASH_PERSONALIZATION, SPEND_SIZE,
        TRANSACTION_SIGNATURE_VERSION,
    },
    description::{
        BurnDescription, MintDescription, OutputDescription, SpendDescription, Unauthorized,
    },
    error::{Result, TransactionError},
    hash::blake2b_256,
    keys::{
        BindingSignature, BindingSigningKey, BindingVerificationKey, RandomizedVerificationKey,
        SpendAuthRandomizer, SpendAuthorizingKey,
    },
    value::value_component,
    wire::{self, ParseResult},
};

/// Transaction format version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionVersion {
    /// Mints are authorized by the asset creator.
    V1,
    /// Mints carry the asset owner and an optional ownership transfer.
    #[default]
    V2,
}

impl TransactionVersion {
    /// The version new transactions are built with.
    pub const LATEST: Self = Self::V2;

    /// Whether mint descriptions carry an owner and ownership transfer.
    #[must_use]
    pub const fn has_mint_ownership(self) -> bool {
        matches!(self, Self::V2)
    }

    /// The wire byte.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

impl TryFrom<u8> for TransactionVersion {
    type Error = TransactionError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(TransactionError::InvalidVersion(other)),
        }
    }
}

/// A BLAKE2b-256 hash of the transaction's signed fields.
///
/// All signatures (spend, mint and binding) sign this same digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SigHash([u8; 32]);

impl SigHash {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for SigHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[expect(clippy::from_over_into, reason = "restrict conversion")]
impl Into<[u8; 32]> for SigHash {
    fn into(self) -> [u8; 32] {
        self.0
    }
}

/// Fields shared by unsigned and signed transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Header {
    version: TransactionVersion,
    fee: u64,
    expiration: u32,
    randomized_public_key: RandomizedVerificationKey,
}

impl Header {
    fn write_counts(&self, out: &mut Vec<u8>, counts: [usize; 4]) {
        out.push(self.version.to_u8());
        for len in counts {
            out.extend_from_slice(&u64::try_from(len).unwrap_or(u64::MAX).to_le_bytes());
        }
        out.extend_from_slice(&self.fee.to_le_bytes());
        out.extend_from_slice(&self.expiration.to_le_bytes());
        out.extend_from_slice(&self.randomized_public_key.to_bytes());
    }
}

/// Hash everything a signature commits to.
fn sighash<S, M>(
    header: &Header,
    spends: &[SpendDescription<S>],
    outputs: &[OutputDescription],
    mints: &[MintDescription<M>],
    burns: &[BurnDescription],
) -> SigHash {
    let mut preimage = vec![TRANSACTION_SIGNATURE_VERSION, header.version.to_u8()];
    preimage.extend_from_slice(&header.expiration.to_le_bytes());
    preimage.extend_from_slice(&header.fee.to_le_bytes());
    preimage.extend_from_slice(&header.randomized_public_key.to_bytes());
    for spend in spends {
        spend.write_unsigned(&mut preimage);
    }
    for output in outputs {
        output.write(&mut preimage);
    }
    for mint in mints {
        mint.write_unsigned(header.version, &mut preimage);
    }
    for burn in burns {
        burn.write(&mut preimage);
    }
    SigHash(blake2b_256(SIGHASH_PERSONALIZATION, &[&preimage]))
}

/// Derive `bvk` from public data.
fn binding_verification_key<S, M>(
    fee: u64,
    spends: &[SpendDescription<S>],
    outputs: &[OutputDescription],
    mints: &[MintDescription<M>],
    burns: &[BurnDescription],
) -> Result<BindingVerificationKey> {
    let mut bvk = pallas::Point::identity();
    for spend in spends {
        let cv: pallas::Point = (*spend.value_commitment()).into();
        bvk += cv;
    }
    for output in outputs {
        let cv: pallas::Point = (*output.merkle_note().value_commitment()).into();
        bvk -= cv;
    }
    for mint in mints {
        bvk += value_component(&mint.asset().id(), mint.value());
    }
    for burn in burns {
        bvk -= value_component(&burn.asset_id(), burn.value());
    }
    bvk -= value_component(&AssetIdentifier::native(), fee);
    BindingVerificationKey::from_point(bvk)
}

/// A fully proved transaction awaiting its signatures.
///
/// Produced by
/// [`ProposedTransaction::build_unsigned`](crate::ProposedTransaction::build_unsigned).
/// Holds no spending authority: [`sign`](Self::sign) needs `ask`, which can
/// live on a separate signing device.
#[derive(Clone, Debug)]
pub struct UnsignedTransaction {
    header: Header,
    spends: Vec<SpendDescription<Unauthorized>>,
    outputs: Vec<OutputDescription>,
    mints: Vec<MintDescription<Unauthorized>>,
    burns: Vec<BurnDescription>,
    alpha: SpendAuthRandomizer,
    binding_signing_key: BindingSigningKey,
}

impl UnsignedTransaction {
    #[expect(clippy::too_many_arguments, reason = "assembled once by the builder")]
    pub(crate) const fn new(
        version: TransactionVersion,
        fee: u64,
        expiration: u32,
        randomized_public_key: RandomizedVerificationKey,
        spends: Vec<SpendDescription<Unauthorized>>,
        outputs: Vec<OutputDescription>,
        mints: Vec<MintDescription<Unauthorized>>,
        burns: Vec<BurnDescription>,
        alpha: SpendAuthRandomizer,
        binding_signing_key: BindingSigningKey,
    ) -> Self {
        Self {
            header: Header {
                version,
                fee,
                expiration,
                randomized_public_key,
            },
            spends,
            outputs,
            mints,
            burns,
            alpha,
            binding_signing_key,
        }
    }

    /// The digest every signature will sign.
    #[must_use]
    pub fn sighash(&self) -> SigHash {
        sighash(
            &self.header,
            &self.spends,
            &self.outputs,
            &self.mints,
            &self.burns,
        )
    }

    /// The transaction fee.
    #[must_use]
    pub const fn fee(&self) -> u64 {
        self.header.fee
    }

    /// The randomized public key `rk`.
    #[must_use]
    pub const fn randomized_public_key(&self) -> &RandomizedVerificationKey {
        &self.header.randomized_public_key
    }

    /// Proved spends.
    #[must_use]
    pub fn spends(&self) -> &[SpendDescription<Unauthorized>] {
        &self.spends
    }

    /// Proved outputs, change included.
    #[must_use]
    pub fn outputs(&self) -> &[OutputDescription] {
        &self.outputs
    }

    /// Proved mints.
    #[must_use]
    pub fn mints(&self) -> &[MintDescription<Unauthorized>] {
        &self.mints
    }

    /// Burns.
    #[must_use]
    pub fn burns(&self) -> &[BurnDescription] {
        &self.burns
    }

    /// Sign every spend and mint with `rsk = ask + alpha` and the whole
    /// transaction with `bsk`.
    ///
    /// Fails with [`TransactionError::InvalidArgument`] if `ask` is not the
    /// key the transaction was proved for.
    pub fn sign(
        self,
        spend_auth_key: &SpendAuthorizingKey,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Transaction> {
        let rsk = spend_auth_key.randomize(&self.alpha);
        if rsk.verification_key() != self.header.randomized_public_key {
            return Err(TransactionError::InvalidArgument(
                "spend authorizing key does not match the view key",
            ));
        }

        let bvk = binding_verification_key(
            self.header.fee,
            &self.spends,
            &self.outputs,
            &self.mints,
            &self.burns,
        )?;
        if bvk != self.binding_signing_key.verification_key() {
            return Err(TransactionError::InvalidState(
                "binding key does not match the value commitments",
            ));
        }

        let sighash = self.sighash();
        let spends = self
            .spends
            .into_iter()
            .map(|spend| spend.sign(&rsk, &sighash, rng))
            .collect();
        let mints = self
            .mints
            .into_iter()
            .map(|mint| mint.sign(&rsk, &sighash, rng))
            .collect();
        let binding_signature = self
            .binding_signing_key
            .sign(rng, sighash.as_bytes());
        debug!("signed transaction");

        Ok(Transaction {
            header: self.header,
            spends,
            outputs: self.outputs,
            mints,
            burns: self.burns,
            binding_signature,
        })
    }
}

/// A signed shielded transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<u8>", try_from = "Vec<u8>"))]
pub struct Transaction {
    header: Header,
    spends: Vec<SpendDescription>,
    outputs: Vec<OutputDescription>,
    mints: Vec<MintDescription>,
    burns: Vec<BurnDescription>,
    binding_signature: BindingSignature,
}

impl Transaction {
    /// The format version.
    #[must_use]
    pub const fn version(&self) -> TransactionVersion {
        self.header.version
    }

    /// The fee paid in the native asset.
    #[must_use]
    pub const fn fee(&self) -> u64 {
        self.header.fee
    }

    /// Block sequence after which the transaction is invalid; 0 for never.
    #[must_use]
    pub const fn expiration(&self) -> u32 {
        self.header.expiration
    }

    /// The randomized public key `rk`.
    #[must_use]
    pub const fn randomized_public_key(&self) -> &RandomizedVerificationKey {
        &self.header.randomized_public_key
    }

    /// Spends.
    #[must_use]
    pub fn spends(&self) -> &[SpendDescription] {
        &self.spends
    }

    /// Outputs.
    #[must_use]
    pub fn outputs(&self) -> &[OutputDescription] {
        &self.outputs
    }

    /// Mints.
    #[must_use]
    pub fn mints(&self) -> &[MintDescription] {
        &self.mints
    }

    /// Burns.
    #[must_use]
    pub fn burns(&self) -> &[BurnDescription] {
        &self.burns
    }

    /// The binding signature.
    #[must_use]
    pub const fn binding_signature(&self) -> &BindingSignature {
        &self.binding_signature
    }

    /// The signature hash.
    #[must_use]
    pub fn hash(&self) -> SigHash {
        sighash(
            &self.header,
            &self.spends,
            &self.outputs,
            &self.mints,
            &self.burns,
        )
    }

    /// Check every proof and signature using public data only.
    ///
    /// Rejects duplicate nullifiers with [`TransactionError::DoubleSpend`].
    /// Cross-transaction double spends are the ledger's concern. Burns and
    /// mints are held to the rules their builders enforce: native asset
    /// burns are [`TransactionError::InvalidAsset`], and a mint or burn
    /// value outside `1..=MAX_VALUE` is [`TransactionError::InvalidArgument`].
    pub fn verify(&self) -> Result<()> {
        if self.header.fee > MAX_VALUE {
            return Err(TransactionError::InvalidArgument("fee exceeds maximum"));
        }
        let mut nullifiers = BTreeSet::new();
        if !self
            .spends
            .iter()
            .all(|spend| nullifiers.insert(*spend.nullifier()))
        {
            return Err(TransactionError::DoubleSpend);
        }
        for burn in &self.burns {
            burn.verify()?;
        }

        let rk = &self.header.randomized_public_key;
        let version = self.header.version;
        for spend in &self.spends {
            spend.verify_proof(rk)?;
        }
        for output in &self.outputs {
            output.verify_proof()?;
        }
        for mint in &self.mints {
            mint.verify_proof(version, rk)?;
        }

        let sighash = self.hash();
        for spend in &self.spends {
            spend.verify_signature(rk, &sighash)?;
        }
        for mint in &self.mints {
            mint.verify_signature(rk, &sighash)?;
        }

        binding_verification_key(
            self.header.fee,
            &self.spends,
            &self.outputs,
            &self.mints,
            &self.burns,
        )?
        .verify(sighash.as_bytes(), &self.binding_signature)?;
        trace!(
            spends = self.spends.len(),
            outputs = self.outputs.len(),
            mints = self.mints.len(),
            burns = self.burns.len(),
            "verified transaction"
        );
        Ok(())
    }

    /// Serialize to the wire format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.header.write_counts(
            &mut out,
            [
                self.spends.len(),
                self.outputs.len(),
                self.mints.len(),
                self.burns.len(),
            ],
        );
        for spend in &self.spends {
            spend.write(&mut out);
        }
        for output in &self.outputs {
            output.write(&mut out);
        }
        for mint in &self.mints {
            mint.write(self.header.version, &mut out);
        }
        for burn in &self.burns {
            burn.write(&mut out);
        }
        out.extend_from_slice(&<[u8; 64]>::from(self.binding_signature));
        out
    }

    /// Parse the wire format.
    ///
    /// An unknown version byte is [`TransactionError::InvalidVersion`]; any
    /// other defect, including trailing bytes, is
    /// [`TransactionError::Malformed`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let version_byte = bytes
            .first()
            .copied()
            .ok_or(TransactionError::Malformed("empty transaction"))?;
        let version = TransactionVersion::try_from(version_byte)?;
        wire::finish(bytes, "transaction", |input| parse(version, input))
    }
}

/// Reject counts the remaining input cannot possibly hold.
fn checked_count(input: &[u8], declared: u64, min_size: usize) -> Option<usize> {
    let items = usize::try_from(declared).ok()?;
    (items.checked_mul(min_size)? <= input.len()).then_some(items)
}

fn parse(version: TransactionVersion, input: &[u8]) -> ParseResult<'_, Transaction> {
    let (
        body,
        (
            _version,
            declared_spends,
            declared_outputs,
            declared_mints,
            declared_burns,
            signed_fee,
            expiration,
            rk_bytes,
        ),
    ) = tuple((
        le_u8,
        le_u64,
        le_u64,
        le_u64,
        le_u64,
        le_i64,
        le_u32,
        wire::array::<32>,
    ))(input)?;

    let (Ok(fee), Ok(randomized_public_key)) = (
        u64::try_from(signed_fee),
        RandomizedVerificationKey::try_from(rk_bytes),
    ) else {
        return wire::reject(input);
    };
    let (Some(num_spends), Some(num_outputs), Some(num_mints), Some(num_burns)) = (
        checked_count(body, declared_spends, SPEND_SIZE),
        checked_count(body, declared_outputs, OUTPUT_SIZE),
        checked_count(body, declared_mints, 1),
        checked_count(body, declared_burns, BURN_SIZE),
    ) else {
        return wire::reject(input);
    };

    let (rem, (spends, outputs, mints, burns, binding_signature)) = tuple((
        count(SpendDescription::parse, num_spends),
        count(OutputDescription::parse, num_outputs),
        count(
            |mint_input| MintDescription::parse(version, mint_input),
            num_mints,
        ),
        count(BurnDescription::parse, num_burns),
        wire::array::<64>,
    ))(body)?;

    Ok((
        rem,
        Transaction {
            header: Header {
                version,
                fee,
                expiration,
                randomized_public_key,
            },
            spends,
            outputs,
            mints,
            burns,
            binding_signature: BindingSignature::from(binding_signature),
        },
    ))
}

impl From<Transaction> for Vec<u8> {
    fn from(transaction: Transaction) -> Self {
        transaction.to_bytes()
    }
}

impl TryFrom<Vec<u8>> for Transaction {
    type Error = TransactionError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{
        asset::Asset,
        builder::ProposedTransaction,
        constants::{ASSET_LEN, PROOF_SIZE},
        keys::SpendingKey,
        note::Note,
        witness::CommitmentTree,
    };

    /// Version, four counts, fee, expiration and `rk`.
    const HEADER_SIZE: usize = 1 + 4 * 8 + 8 + 4 + 32;

    /// Spend a 10 unit note into a 9 unit output with a fee of 1.
    fn payment(rng: &mut StdRng) -> Transaction {
        let sk = SpendingKey::random(rng);
        let owner = sk.public_address();
        let native = AssetIdentifier::native();
        let note = Note::new(owner, 10, b"", native, owner, rng).unwrap();
        let mut tree = CommitmentTree::new();
        let position = tree.append(&note.commitment()).unwrap();

        let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
        proposed.spend(note, tree.witness(position).unwrap()).unwrap();
        proposed
            .output(Note::new(owner, 9, b"", native, owner, rng).unwrap())
            .unwrap();
        proposed
            .build(
                &sk.spend_authorizing_key(),
                &sk.view_key(),
                &sk.outgoing_view_key(),
                1,
                None,
                rng,
            )
            .unwrap()
    }

    fn reencoded(transaction: &Transaction) -> Transaction {
        Transaction::from_bytes(&transaction.to_bytes()).unwrap()
    }

    #[test]
    fn version_bytes() {
        assert_eq!(TransactionVersion::try_from(1), Ok(TransactionVersion::V1));
        assert_eq!(TransactionVersion::try_from(2), Ok(TransactionVersion::V2));
        assert_eq!(
            TransactionVersion::try_from(3),
            Err(TransactionError::InvalidVersion(3))
        );
        assert_eq!(TransactionVersion::LATEST, TransactionVersion::default());
    }

    #[test]
    fn decoding_rejects_bad_headers() {
        assert_eq!(
            Transaction::from_bytes(&[]),
            Err(TransactionError::Malformed("empty transaction"))
        );
        assert_eq!(
            Transaction::from_bytes(&[9, 0, 0]),
            Err(TransactionError::InvalidVersion(9))
        );
        assert_eq!(
            Transaction::from_bytes(&[2, 0, 0]),
            Err(TransactionError::Malformed("transaction"))
        );
    }

    #[test]
    fn absurd_counts_are_rejected_without_allocating() {
        let mut bytes = vec![2u8];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8 * 3 + 8 + 4]);
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            Transaction::from_bytes(&bytes),
            Err(TransactionError::Malformed(_))
        ));
    }

    #[test]
    fn duplicated_spend_is_a_double_spend() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut transaction = payment(&mut rng);
        transaction.verify().unwrap();

        transaction.spends.push(transaction.spends[0]);
        assert_eq!(
            reencoded(&transaction).verify(),
            Err(TransactionError::DoubleSpend)
        );
    }

    #[test]
    fn decoded_burns_must_be_custom_and_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let transaction = payment(&mut rng);
        let custom = AssetIdentifier::from([3u8; 32]);

        for (asset_id, value, expected) in [
            (
                AssetIdentifier::native(),
                1,
                TransactionError::InvalidAsset("cannot burn the native asset"),
            ),
            (custom, 0, TransactionError::InvalidArgument("burn value out of range")),
            (
                custom,
                MAX_VALUE + 1,
                TransactionError::InvalidArgument("burn value out of range"),
            ),
        ] {
            let mut burn_bytes = asset_id.as_bytes().to_vec();
            burn_bytes.extend_from_slice(&value.to_le_bytes());
            let mut with_burn = transaction.clone();
            with_burn
                .burns
                .push(wire::finish(&burn_bytes, "burn", BurnDescription::parse).unwrap());
            assert_eq!(reencoded(&with_burn).verify(), Err(expected));
        }
    }

    #[test]
    fn decoded_mint_value_must_be_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let sk = SpendingKey::random(&mut rng);
        let owner = sk.public_address();
        let asset = Asset::new(owner, "Testcoin", "").unwrap();
        let mut proposed = ProposedTransaction::new(TransactionVersion::V2);
        proposed.mint(asset, 5).unwrap();
        proposed
            .output(Note::new(owner, 5, b"", asset.id(), owner, &mut rng).unwrap())
            .unwrap();
        let bytes = proposed
            .build(
                &sk.spend_authorizing_key(),
                &sk.view_key(),
                &sk.outgoing_view_key(),
                0,
                None,
                &mut rng,
            )
            .unwrap()
            .to_bytes();
        Transaction::from_bytes(&bytes).unwrap().verify().unwrap();

        let value_offset = HEADER_SIZE + OUTPUT_SIZE + PROOF_SIZE + ASSET_LEN;
        for value in [0, MAX_VALUE + 1] {
            let mut tampered = bytes.clone();
            tampered[value_offset..value_offset + 8].copy_from_slice(&value.to_le_bytes());
            assert_eq!(
                Transaction::from_bytes(&tampered).unwrap().verify(),
                Err(TransactionError::InvalidArgument("mint value out of range"))
            );
        }
    }
}
