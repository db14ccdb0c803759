//! Transaction assembly.
//!
//! A [`ProposedTransaction`] collects actions, then builds exactly once:
//!
//! ```mermaid
//! stateDiagram-v2
//!     [*] --> Empty
//!     Empty --> Accumulating: spend / output / mint / burn
//!     Accumulating --> Accumulating: spend / output / mint / burn
//!     Accumulating --> Built: build / build_unsigned
//! ```
//!
//! ## Build order
//!
//! 1. Balance: per asset, `surplus = spends + mints - outputs - burns`
//!    (minus the fee for the native asset). Positive surplus is swept into
//!    change outputs when a change address is given.
//! 2. Randomness: every trapdoor and blind is drawn from the caller's RNG,
//!    in action order, so a seeded RNG reproduces the transaction.
//! 3. Prove: one proof per spend, output and mint, in parallel.
//! 4. Sign: spend and mint authorizations with `rsk = ask + alpha`, then the
//!    binding signature with `bsk = Σrcv_spend - Σrcv_output`.
//!
//! Steps 1 to 3 are [`build_unsigned`](ProposedTransaction::build_unsigned);
//! step 4 is [`UnsignedTransaction::sign`].

#![expect(clippy::module_name_repetitions, reason = "BuilderState names the builder's state")]

use alloc::collections::BTreeMap;

use ff::Field as _;
use pasta_curves::Fq;
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    asset::{Asset, AssetIdentifier},
    constants::MAX_VALUE,
    description::{BurnDescription, MintBuilder, OutputBuilder, SpendBuilder},
    error::{Result, TransactionError},
    keys::{
        BindingSigningKey, OutgoingViewKey, PublicAddress, SpendAuthRandomizer,
        SpendAuthorizingKey, ViewKey,
    },
    merkle_note::EphemeralSecretKey,
    note::Note,
    proof::ProofBlind,
    transaction::{Transaction, TransactionVersion, UnsignedTransaction},
    value::ValueCommitmentTrapdoor,
    witness::Witness,
};

/// Where a [`ProposedTransaction`] is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuilderState {
    /// No action added yet.
    #[default]
    Empty,
    /// At least one action added.
    Accumulating,
    /// Built; the builder accepts nothing further.
    Built,
}

/// A transaction under construction.
#[derive(Clone, Debug, Default)]
pub struct ProposedTransaction {
    version: TransactionVersion,
    expiration: u32,
    state: BuilderState,
    spends: Vec<SpendBuilder>,
    outputs: Vec<OutputBuilder>,
    mints: Vec<MintBuilder>,
    burns: Vec<BurnDescription>,
}

impl ProposedTransaction {
    /// An empty transaction of `version`.
    #[must_use]
    pub fn new(version: TransactionVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// The transaction version.
    #[must_use]
    pub const fn version(&self) -> TransactionVersion {
        self.version
    }

    /// The lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BuilderState {
        self.state
    }

    /// The expiration sequence; 0 for none.
    #[must_use]
    pub const fn expiration(&self) -> u32 {
        self.expiration
    }

    /// Registered spends.
    #[must_use]
    pub fn spends(&self) -> &[SpendBuilder] {
        &self.spends
    }

    /// Registered outputs. Change outputs appear only in the built
    /// transaction.
    #[must_use]
    pub fn outputs(&self) -> &[OutputBuilder] {
        &self.outputs
    }

    /// Registered mints.
    #[must_use]
    pub fn mints(&self) -> &[MintBuilder] {
        &self.mints
    }

    /// Registered burns.
    #[must_use]
    pub fn burns(&self) -> &[BurnDescription] {
        &self.burns
    }

    fn accepting(&self) -> Result<()> {
        match self.state {
            BuilderState::Built => Err(TransactionError::InvalidState("transaction already built")),
            BuilderState::Empty | BuilderState::Accumulating => Ok(()),
        }
    }

    fn ready_to_build(&self) -> Result<()> {
        match self.state {
            BuilderState::Built => Err(TransactionError::InvalidState("transaction already built")),
            BuilderState::Empty => Err(TransactionError::EmptyTransaction),
            BuilderState::Accumulating => Ok(()),
        }
    }

    const fn accumulate(&mut self) {
        self.state = BuilderState::Accumulating;
    }

    /// Spend `note`, proven present in the tree by `witness`.
    ///
    /// Fails with [`TransactionError::InvalidWitness`] if the witness does
    /// not lead to its root, and [`TransactionError::DoubleSpend`] if the
    /// same note is already spent here.
    pub fn spend(&mut self, note: Note, witness: Witness) -> Result<()> {
        self.accepting()?;
        let commitment = note.commitment();
        if self
            .spends
            .iter()
            .any(|spend| spend.note().commitment() == commitment)
        {
            return Err(TransactionError::DoubleSpend);
        }
        self.spends.push(SpendBuilder::new(note, witness)?);
        self.accumulate();
        Ok(())
    }

    /// Create `note`.
    pub fn output(&mut self, note: Note) -> Result<()> {
        self.accepting()?;
        self.outputs.push(OutputBuilder::new(note));
        self.accumulate();
        Ok(())
    }

    /// Mint `value` new units of `asset`.
    pub fn mint(&mut self, asset: Asset, value: u64) -> Result<()> {
        self.accepting()?;
        self.mints.push(MintBuilder::new(asset, value)?);
        self.accumulate();
        Ok(())
    }

    /// Mint and hand ownership of `asset` to `new_owner`. Version 2 only.
    pub fn mint_with_transfer(
        &mut self,
        asset: Asset,
        value: u64,
        new_owner: PublicAddress,
    ) -> Result<()> {
        self.accepting()?;
        if !self.version.has_mint_ownership() {
            return Err(TransactionError::InvalidArgument(
                "ownership transfer requires version 2",
            ));
        }
        self.mints
            .push(MintBuilder::new(asset, value)?.transfer_ownership_to(new_owner));
        self.accumulate();
        Ok(())
    }

    /// Destroy `value` units of `asset_id`.
    pub fn burn(&mut self, asset_id: AssetIdentifier, value: u64) -> Result<()> {
        self.accepting()?;
        self.burns.push(BurnDescription::new(asset_id, value)?);
        self.accumulate();
        Ok(())
    }

    /// Make the transaction invalid after block `sequence`; 0 for never.
    pub fn set_expiration(&mut self, sequence: u32) -> Result<()> {
        self.accepting()?;
        self.expiration = sequence;
        Ok(())
    }

    /// Net value per asset: inputs minus outputs, burns and the fee.
    fn balances(&self, fee: u64) -> BTreeMap<AssetIdentifier, i128> {
        let mut balances = BTreeMap::new();
        balances.insert(AssetIdentifier::native(), -i128::from(fee));
        for spend in &self.spends {
            *balances.entry(spend.note().asset_id()).or_insert(0) +=
                i128::from(spend.note().value());
        }
        for mint in &self.mints {
            *balances.entry(mint.asset().id()).or_insert(0) += i128::from(mint.value());
        }
        for output in &self.outputs {
            *balances.entry(output.note().asset_id()).or_insert(0) -=
                i128::from(output.note().value());
        }
        for burn in &self.burns {
            *balances.entry(burn.asset_id()).or_insert(0) -= i128::from(burn.value());
        }
        balances
    }

    /// Balance every asset, adding change outputs for positive surplus.
    fn change_outputs(
        &self,
        fee: u64,
        sender: PublicAddress,
        change_address: Option<PublicAddress>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<OutputBuilder>> {
        let mut change = Vec::new();
        for (asset, surplus) in self.balances(fee) {
            if surplus == 0 {
                continue;
            }
            let unbalanced = TransactionError::UnbalancedTransaction { asset, surplus };
            let (Some(address), Ok(value)) = (change_address, u64::try_from(surplus)) else {
                return Err(unbalanced);
            };
            if value > MAX_VALUE {
                return Err(unbalanced);
            }
            debug!(%asset, value, "adding change output");
            change.push(OutputBuilder::change(Note::new(
                address, value, b"", asset, sender, rng,
            )?));
        }
        Ok(change)
    }

    /// Balance and prove every action without signing.
    ///
    /// The result carries no spending authority; pass it to
    /// [`UnsignedTransaction::sign`] with the matching `ask`.
    ///
    /// A failed build leaves the builder as it was. A successful one moves
    /// it to [`BuilderState::Built`].
    pub fn build_unsigned(
        &mut self,
        view_key: &ViewKey,
        ovk: &OutgoingViewKey,
        fee: u64,
        change_address: Option<PublicAddress>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<UnsignedTransaction> {
        self.ready_to_build()?;
        if fee > MAX_VALUE {
            return Err(TransactionError::InvalidArgument("fee exceeds maximum"));
        }

        let change = self.change_outputs(fee, view_key.public_address(), change_address, rng)?;
        let outputs: Vec<OutputBuilder> = self.outputs.iter().copied().chain(change).collect();
        debug!(
            spends = self.spends.len(),
            outputs = outputs.len(),
            mints = self.mints.len(),
            burns = self.burns.len(),
            fee,
            "balanced transaction"
        );

        let alpha = SpendAuthRandomizer::random(rng);
        let rk = view_key.authorizing_key().randomize(&alpha);
        let spend_randomness: Vec<_> = self
            .spends
            .iter()
            .map(|_spend| (ValueCommitmentTrapdoor::random(rng), ProofBlind::random(rng)))
            .collect();
        let output_randomness: Vec<_> = outputs
            .iter()
            .map(|_output| {
                (
                    ValueCommitmentTrapdoor::random(rng),
                    EphemeralSecretKey::random(rng),
                    ProofBlind::random(rng),
                )
            })
            .collect();
        let mint_blinds: Vec<_> = self.mints.iter().map(|_mint| ProofBlind::random(rng)).collect();

        let spends = self
            .spends
            .par_iter()
            .zip(&spend_randomness)
            .map(|(spend, &(rcv, blind))| spend.prove(view_key, &alpha, &rk, &rcv, &blind))
            .collect::<Result<Vec<_>>>()?;
        let proved_outputs = outputs
            .par_iter()
            .zip(&output_randomness)
            .map(|(output, &(rcv, esk, blind))| output.prove(ovk, &rcv, &esk, &blind))
            .collect::<Result<Vec<_>>>()?;
        let version = self.version;
        let mints = self
            .mints
            .par_iter()
            .zip(&mint_blinds)
            .map(|(mint, blind)| mint.prove(version, view_key, &alpha, &rk, blind))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            proofs = spends.len() + proved_outputs.len() + mints.len(),
            "proved transaction"
        );

        let mut bsk = Fq::ZERO;
        for &(rcv, _) in &spend_randomness {
            bsk += rcv;
        }
        for &(rcv, _, _) in &output_randomness {
            bsk -= rcv;
        }
        let binding_signing_key = BindingSigningKey::try_from(bsk)?;

        self.state = BuilderState::Built;
        trace!(expiration = self.expiration, "built unsigned transaction");
        Ok(UnsignedTransaction::new(
            self.version,
            fee,
            self.expiration,
            rk,
            spends,
            proved_outputs,
            mints,
            self.burns.clone(),
            alpha,
            binding_signing_key,
        ))
    }

    /// Balance, prove and sign.
    ///
    /// A built or empty builder fails as in
    /// [`build_unsigned`](Self::build_unsigned), before any key is looked
    /// at. Otherwise fails with [`TransactionError::InvalidArgument`] when
    /// `spend_auth_key` does not belong to `view_key`.
    pub fn build(
        &mut self,
        spend_auth_key: &SpendAuthorizingKey,
        view_key: &ViewKey,
        ovk: &OutgoingViewKey,
        fee: u64,
        change_address: Option<PublicAddress>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Transaction> {
        self.ready_to_build()?;
        if spend_auth_key.validating_key() != *view_key.authorizing_key() {
            return Err(TransactionError::InvalidArgument(
                "spend authorizing key does not match the view key",
            ));
        }
        self.build_unsigned(view_key, ovk, fee, change_address, rng)?
            .sign(spend_auth_key, rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{constants::PROOF_SIZE, keys::SpendingKey, witness::CommitmentTree};

    struct Wallet {
        sk: SpendingKey,
        tree: CommitmentTree,
    }

    impl Wallet {
        fn new(rng: &mut StdRng) -> Self {
            Self {
                sk: SpendingKey::random(rng),
                tree: CommitmentTree::new(),
            }
        }

        fn address(&self) -> PublicAddress {
            self.sk.public_address()
        }

        /// Receive `value` of `asset_id` and return the note with its witness.
        fn receive(
            &mut self,
            rng: &mut StdRng,
            value: u64,
            asset_id: AssetIdentifier,
        ) -> (Note, Witness) {
            let note = Note::new(self.address(), value, b"", asset_id, self.address(), rng).unwrap();
            let position = self.tree.append(&note.commitment()).unwrap();
            (note, self.tree.witness(position).unwrap())
        }

        fn build(
            &self,
            proposed: &mut ProposedTransaction,
            fee: u64,
            change: bool,
            rng: &mut StdRng,
        ) -> Result<Transaction> {
            proposed.build(
                &self.sk.spend_authorizing_key(),
                &self.sk.view_key(),
                &self.sk.outgoing_view_key(),
                fee,
                change.then(|| self.address()),
                rng,
            )
        }
    }

    fn pay_40(rng: &mut StdRng, wallet: &mut Wallet, recipient: PublicAddress) -> ProposedTransaction {
        let (note, witness) = wallet.receive(rng, 42, AssetIdentifier::native());
        let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
        proposed.spend(note, witness).unwrap();
        proposed
            .output(
                Note::new(
                    recipient,
                    40,
                    b"rent",
                    AssetIdentifier::native(),
                    wallet.address(),
                    rng,
                )
                .unwrap(),
            )
            .unwrap();
        proposed
    }

    #[test]
    fn surplus_becomes_change() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng);
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient.public_address());

        let transaction = wallet.build(&mut proposed, 1, true, &mut rng).unwrap();
        transaction.verify().unwrap();
        assert_eq!(transaction.outputs().len(), 2);

        let paid = transaction.outputs()[0]
            .merkle_note()
            .decrypt_for_owner(&recipient.incoming_view_key())
            .unwrap();
        assert_eq!(paid.value(), 40);
        assert_eq!(paid.memo().as_bytes()[..4], *b"rent");

        let change = transaction.outputs()[1]
            .merkle_note()
            .decrypt_for_owner(&wallet.sk.incoming_view_key())
            .unwrap();
        assert_eq!(change.value(), 1);
        assert_eq!(change.asset_id(), AssetIdentifier::native());
        assert_eq!(*change.sender(), wallet.address());

        // The sender can recover both notes with ovk.
        let recovered = transaction.outputs()[0]
            .merkle_note()
            .decrypt_for_spender(&wallet.sk.outgoing_view_key())
            .unwrap();
        assert_eq!(recovered, paid);
    }

    #[test]
    fn surplus_without_change_address_is_unbalanced() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);

        assert_eq!(
            wallet.build(&mut proposed, 1, false, &mut rng),
            Err(TransactionError::UnbalancedTransaction {
                asset: AssetIdentifier::native(),
                surplus: 1,
            })
        );
        // The failed build left the builder usable.
        assert_eq!(proposed.state(), BuilderState::Accumulating);
        wallet.build(&mut proposed, 2, false, &mut rng).unwrap();
    }

    #[test]
    fn overspending_is_unbalanced_even_with_change() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);

        assert_eq!(
            wallet.build(&mut proposed, 3, true, &mut rng),
            Err(TransactionError::UnbalancedTransaction {
                asset: AssetIdentifier::native(),
                surplus: -1,
            })
        );
    }

    #[test]
    fn minted_supply_balances_outputs() {
        let mut rng = StdRng::seed_from_u64(3);
        let wallet = Wallet::new(&mut rng);
        let asset = Asset::new(wallet.address(), "Testcoin", "A really cool coin").unwrap();

        let mut proposed = ProposedTransaction::new(TransactionVersion::V2);
        proposed.mint(asset, 5).unwrap();
        proposed
            .output(
                Note::new(wallet.address(), 5, b"", asset.id(), wallet.address(), &mut rng)
                    .unwrap(),
            )
            .unwrap();

        let transaction = wallet.build(&mut proposed, 0, false, &mut rng).unwrap();
        transaction.verify().unwrap();
        assert_eq!(transaction.mints().len(), 1);
        assert_eq!(transaction.mints()[0].value(), 5);
        assert_eq!(transaction.outputs().len(), 1);
    }

    #[test]
    fn mint_then_burn_in_v1() {
        let mut rng = StdRng::seed_from_u64(4);
        let wallet = Wallet::new(&mut rng);
        let asset = Asset::new(wallet.address(), "Burnable", "").unwrap();

        let mut proposed = ProposedTransaction::new(TransactionVersion::V1);
        proposed.mint(asset, 10).unwrap();
        proposed.burn(asset.id(), 6).unwrap();
        proposed
            .output(
                Note::new(wallet.address(), 4, b"", asset.id(), wallet.address(), &mut rng)
                    .unwrap(),
            )
            .unwrap();
        proposed.set_expiration(100).unwrap();

        let transaction = wallet.build(&mut proposed, 0, false, &mut rng).unwrap();
        transaction.verify().unwrap();
        assert_eq!(transaction.expiration(), 100);
        assert_eq!(
            Transaction::from_bytes(&transaction.to_bytes()).unwrap(),
            transaction
        );
    }

    #[test]
    fn native_asset_cannot_be_minted() {
        let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
        assert_eq!(
            proposed.mint(Asset::native(), 5),
            Err(TransactionError::InvalidAsset("cannot mint the native asset"))
        );
        assert_eq!(proposed.state(), BuilderState::Empty);
    }

    #[test]
    fn transfer_requires_v2() {
        let mut rng = StdRng::seed_from_u64(5);
        let wallet = Wallet::new(&mut rng);
        let asset = Asset::new(wallet.address(), "Testcoin", "").unwrap();
        let mut proposed = ProposedTransaction::new(TransactionVersion::V1);
        assert_eq!(
            proposed.mint_with_transfer(asset, 1, wallet.address()),
            Err(TransactionError::InvalidArgument(
                "ownership transfer requires version 2"
            ))
        );
    }

    #[test]
    fn empty_transaction_is_rejected() {
        let mut rng = StdRng::seed_from_u64(6);
        let wallet = Wallet::new(&mut rng);
        let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
        assert_eq!(
            wallet.build(&mut proposed, 0, true, &mut rng),
            Err(TransactionError::EmptyTransaction)
        );
    }

    #[test]
    fn double_spend_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut wallet = Wallet::new(&mut rng);
        let (note, witness) = wallet.receive(&mut rng, 10, AssetIdentifier::native());
        let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
        proposed.spend(note, witness.clone()).unwrap();
        assert_eq!(
            proposed.spend(note, witness),
            Err(TransactionError::DoubleSpend)
        );
    }

    #[test]
    fn stale_witness_is_rejected() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut wallet = Wallet::new(&mut rng);
        let (note, _) = wallet.receive(&mut rng, 10, AssetIdentifier::native());
        let (_, other_witness) = wallet.receive(&mut rng, 11, AssetIdentifier::native());
        let mut proposed = ProposedTransaction::new(TransactionVersion::LATEST);
        assert_eq!(
            proposed.spend(note, other_witness),
            Err(TransactionError::InvalidWitness)
        );
    }

    #[test]
    fn build_is_terminal() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);

        let first = wallet.build(&mut proposed, 1, true, &mut rng).unwrap();
        assert_eq!(proposed.state(), BuilderState::Built);
        assert_eq!(
            wallet.build(&mut proposed, 1, true, &mut rng),
            Err(TransactionError::InvalidState("transaction already built"))
        );
        assert_eq!(
            proposed.set_expiration(5),
            Err(TransactionError::InvalidState("transaction already built"))
        );
        first.verify().unwrap();
        assert_eq!(first.outputs().len(), 2);
    }

    #[test]
    fn rebuilding_reports_state_before_keys() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);
        wallet.build(&mut proposed, 1, true, &mut rng).unwrap();

        let stranger = SpendingKey::random(&mut rng);
        assert_eq!(
            proposed.build(
                &stranger.spend_authorizing_key(),
                &wallet.sk.view_key(),
                &wallet.sk.outgoing_view_key(),
                1,
                Some(wallet.address()),
                &mut rng,
            ),
            Err(TransactionError::InvalidState("transaction already built"))
        );

        let mut empty = ProposedTransaction::new(TransactionVersion::LATEST);
        assert_eq!(
            empty.build(
                &stranger.spend_authorizing_key(),
                &wallet.sk.view_key(),
                &wallet.sk.outgoing_view_key(),
                0,
                None,
                &mut rng,
            ),
            Err(TransactionError::EmptyTransaction)
        );
    }

    #[test]
    fn foreign_spend_key_is_rejected() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);
        let thief = SpendingKey::random(&mut rng);

        assert_eq!(
            proposed.build(
                &thief.spend_authorizing_key(),
                &wallet.sk.view_key(),
                &wallet.sk.outgoing_view_key(),
                1,
                Some(wallet.address()),
                &mut rng,
            ),
            Err(TransactionError::InvalidArgument(
                "spend authorizing key does not match the view key"
            ))
        );
        assert_eq!(proposed.state(), BuilderState::Accumulating);
    }

    #[test]
    fn fee_above_maximum_is_rejected() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);
        assert_eq!(
            wallet.build(&mut proposed, MAX_VALUE + 1, true, &mut rng),
            Err(TransactionError::InvalidArgument("fee exceeds maximum"))
        );
    }

    #[test]
    fn signing_can_happen_apart_from_proving() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);

        let unsigned = proposed
            .build_unsigned(
                &wallet.sk.view_key(),
                &wallet.sk.outgoing_view_key(),
                2,
                None,
                &mut rng,
            )
            .unwrap();
        let sighash = unsigned.sighash();
        let transaction = unsigned
            .sign(&wallet.sk.spend_authorizing_key(), &mut rng)
            .unwrap();
        assert_eq!(transaction.hash(), sighash);
        transaction.verify().unwrap();
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(13);
            let mut wallet = Wallet::new(&mut rng);
            let recipient = SpendingKey::random(&mut rng).public_address();
            let mut proposed = pay_40(&mut rng, &mut wallet, recipient);
            wallet
                .build(&mut proposed, 1, true, &mut rng)
                .unwrap()
                .to_bytes()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn wire_roundtrip_and_tampering() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut wallet = Wallet::new(&mut rng);
        let recipient = SpendingKey::random(&mut rng).public_address();
        let mut proposed = pay_40(&mut rng, &mut wallet, recipient);
        let transaction = wallet.build(&mut proposed, 1, true, &mut rng).unwrap();

        let bytes = transaction.to_bytes();
        let decoded = Transaction::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, transaction);
        assert_eq!(decoded.to_bytes(), bytes);
        assert_eq!(decoded.fee(), 1);
        assert_eq!(decoded.version(), TransactionVersion::LATEST);
        decoded.verify().unwrap();

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert_eq!(
            Transaction::from_bytes(&trailing),
            Err(TransactionError::Malformed("trailing bytes"))
        );

        // Raise the fee: the binding signature no longer matches.
        let fee_offset = 1 + 4 * 8;
        let mut higher_fee = bytes.clone();
        higher_fee[fee_offset] ^= 0x01;
        assert_eq!(
            Transaction::from_bytes(&higher_fee).unwrap().verify(),
            Err(TransactionError::InvalidSignature)
        );

        // Flip a byte of the first spend's nullifier: its proof fails.
        let nullifier_offset = fee_offset + 8 + 4 + 32 + PROOF_SIZE + 32 + 32 + 4;
        let mut other_nullifier = bytes;
        other_nullifier[nullifier_offset] ^= 0x01;
        assert_eq!(
            Transaction::from_bytes(&other_nullifier).unwrap().verify(),
            Err(TransactionError::InvalidProof)
        );
    }
}
