//! ## Key Hierarchy
//!
//! ```mermaid
//! flowchart TB
//!     sk[SpendingKey]
//!     ask[SpendAuthorizingKey ask]
//!     ak[SpendValidatingKey ak]
//!     nk[NullifierKey nk]
//!     ovk[OutgoingViewKey ovk]
//!     vk["ViewKey (ak, nk)"]
//!     ivk[IncomingViewKey ivk]
//!     pk[PublicAddress]
//!     sk --> ask & nk & ovk
//!     ask --> ak
//!     ak & nk --> vk
//!     vk --> ivk --> pk
//!     alpha["SpendAuthRandomizer alpha"]
//!     ask -- "+alpha" --> rsk[RandomizedSigningKey rsk]
//!     ak -- "+alpha" --> rk[RandomizedVerificationKey rk]
//! ```
//!
//! ### Private keys ([`private`])
//!
//! - `sk`: Root spending key (full authority)
//! - `ask`: Authorizes spends and mints (long-lived, cannot sign directly)
//! - `rsk = ask + alpha`: Per-transaction signing key
//! - `bsk = Σrcv_spend - Σrcv_output`: Binding signing key (per-transaction)
//!
//! ### Public keys ([`public`])
//!
//! - `ak`: Public counterpart of `ask`
//! - `rk = ak + [alpha]G`: Per-transaction verification key, published in
//!   the transaction header
//! - `bvk`: Binding verification key (derived from value commitments)
//!
//! ### Viewing keys
//!
//! - `nk`: Observes when funds are spent (nullifier derivation)
//! - `ivk`: Decrypts incoming notes; the address is `[ivk]G_pk`
//! - `ovk`: Recovers notes the wallet sent

pub mod private;
pub mod public;

mod address;
mod randomizer;
mod signature;
mod view;

pub use address::PublicAddress;
pub use private::{BindingSigningKey, RandomizedSigningKey, SpendAuthorizingKey, SpendingKey};
pub use public::{BindingVerificationKey, RandomizedVerificationKey, SpendValidatingKey};
pub use randomizer::SpendAuthRandomizer;
pub use signature::{BindingSignature, SpendAuthSignature};
pub use view::{IncomingViewKey, NullifierKey, OutgoingViewKey, ViewKey};

#[cfg(test)]
mod tests {
    use ff::Field as _;
    use pasta_curves::Fq;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::error::TransactionError;

    #[test]
    fn derivation_is_deterministic() {
        let sk = SpendingKey::from([7u8; 32]);
        assert_eq!(sk.view_key(), SpendingKey::from([7u8; 32]).view_key());
        assert_eq!(
            sk.public_address(),
            SpendingKey::from([7u8; 32]).public_address()
        );
        assert_ne!(
            sk.public_address(),
            SpendingKey::from([8u8; 32]).public_address()
        );
    }

    #[test]
    fn address_roundtrips_through_bytes() {
        let mut rng = StdRng::seed_from_u64(0);
        let address = SpendingKey::random(&mut rng).public_address();
        assert_eq!(PublicAddress::new(&address.to_bytes()).unwrap(), address);
    }

    #[test]
    fn identity_is_not_an_address() {
        assert_eq!(
            PublicAddress::new(&[0u8; 32]),
            Err(TransactionError::InvalidArgument("invalid public address"))
        );
    }

    /// The randomized keypair signs and verifies.
    /// ask.randomize(alpha).public == ak.randomize(alpha)
    #[test]
    fn randomized_keys_agree() {
        let mut rng = StdRng::seed_from_u64(1);
        let sk = SpendingKey::random(&mut rng);
        let ask = sk.spend_authorizing_key();
        let ak = ask.validating_key();
        let alpha = SpendAuthRandomizer::random(&mut rng);

        let rsk = ask.randomize(&alpha);
        let rk = ak.randomize(&alpha);
        assert_eq!(rsk.verification_key(), rk);

        let sig = rsk.sign(&mut rng, b"sighash");
        rk.verify(b"sighash", &sig).unwrap();
        assert_eq!(
            rk.verify(b"other", &sig),
            Err(TransactionError::InvalidSignature)
        );
        // `ak` alone must not verify a signature made under `rsk`.
        assert_eq!(
            RandomizedVerificationKey(ak.0).verify(b"sighash", &sig),
            Err(TransactionError::InvalidSignature)
        );
    }

    #[test]
    fn binding_key_signs_under_its_verification_key() {
        let mut rng = StdRng::seed_from_u64(2);
        let bsk = BindingSigningKey::try_from(Fq::random(&mut rng)).unwrap();
        let bvk = bsk.verification_key();
        let sig = bsk.sign(&mut rng, b"tx");
        bvk.verify(b"tx", &sig).unwrap();
    }

    #[test]
    fn view_key_separates_from_spend_key() {
        let sk = SpendingKey::from([3u8; 32]);
        let vk = sk.view_key();
        assert_eq!(
            *vk.authorizing_key(),
            sk.spend_authorizing_key().validating_key()
        );
        assert_eq!(*vk.nullifier_key(), sk.nullifier_key());
        assert_eq!(
            vk.incoming_view_key().public_address(),
            sk.public_address()
        );
    }
}
