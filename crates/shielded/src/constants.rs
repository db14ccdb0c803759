//! Protocol-wide constants, domain separators and personalizations.
//!
//! All BLAKE2b personalizations are exactly 16 bytes (the BLAKE2b
//! personal field width). Hash-to-curve domains are variable-length strings.

/// Identifier of the protocol's base currency.
///
/// The native asset is never minted or burned; it enters and leaves the
/// shielded pool only through spends, outputs and the fee.
pub const NATIVE_ASSET: [u8; ASSET_ID_LENGTH] = [
    81, 243, 58, 47, 20, 249, 39, 53, 229, 98, 220, 101, 138, 86, 57, 39, 157, 220, 163, 213, 7,
    154, 109, 18, 66, 178, 165, 136, 169, 203, 244, 76,
];

/// Largest value a note, mint, burn or fee may carry: `2^63 - 1`.
///
/// Bounded so that every amount also fits the signed fee field of the wire
/// format and per-asset sums cannot overflow `i128`.
pub const MAX_VALUE: u64 = 0x7fff_ffff_ffff_ffff;

/// Depth of the note commitment tree. A position is a `u32`, one bit per
/// level.
pub const TREE_DEPTH: usize = 32;

/// Encoded size of a public address (a compressed Pallas point).
pub const PUBLIC_ADDRESS_SIZE: usize = 32;
/// Size of an asset identifier.
pub const ASSET_ID_LENGTH: usize = 32;
/// Maximum (and padded) length of an asset name.
pub const ASSET_NAME_LENGTH: usize = 32;
/// Maximum (and padded) length of asset metadata.
pub const ASSET_METADATA_LENGTH: usize = 96;
/// Encoded asset: creator, name, metadata, nonce.
pub const ASSET_LEN: usize = PUBLIC_ADDRESS_SIZE + ASSET_NAME_LENGTH + ASSET_METADATA_LENGTH + 1;
/// Maximum (and padded) memo length.
pub const MEMO_SIZE: usize = 32;
/// Encoded scalar or field element.
pub const SCALAR_SIZE: usize = 32;
/// Encoded note value.
pub const AMOUNT_VALUE_SIZE: usize = 8;
/// Encoded RedPallas signature.
pub const SIGNATURE_SIZE: usize = 64;
/// Encoded action proof.
pub const PROOF_SIZE: usize = 192;
/// ChaCha20-Poly1305 authentication tag.
pub const MAC_SIZE: usize = 16;

/// Note plaintext carried in an output: `rcm ‖ memo ‖ value ‖ asset ‖ sender`.
pub const NOTE_PLAINTEXT_SIZE: usize =
    SCALAR_SIZE + MEMO_SIZE + AMOUNT_VALUE_SIZE + ASSET_ID_LENGTH + PUBLIC_ADDRESS_SIZE;
/// Encrypted note plaintext including its tag.
pub const ENCRYPTED_NOTE_SIZE: usize = NOTE_PLAINTEXT_SIZE + MAC_SIZE;
/// Sender-recoverable key material: `owner ‖ esk` plus tag.
pub const NOTE_ENCRYPTION_KEY_SIZE: usize = PUBLIC_ADDRESS_SIZE + SCALAR_SIZE + MAC_SIZE;
/// `cv ‖ cm ‖ epk ‖ encrypted note ‖ encrypted keys`.
pub const MERKLE_NOTE_SIZE: usize =
    32 + 32 + 32 + ENCRYPTED_NOTE_SIZE + NOTE_ENCRYPTION_KEY_SIZE;

/// `proof ‖ cv ‖ anchor ‖ tree_size ‖ nullifier ‖ sig`.
pub const SPEND_SIZE: usize = PROOF_SIZE + 32 + 32 + 4 + 32 + SIGNATURE_SIZE;
/// `proof ‖ merkle note`.
pub const OUTPUT_SIZE: usize = PROOF_SIZE + MERKLE_NOTE_SIZE;
/// `asset id ‖ value`.
pub const BURN_SIZE: usize = ASSET_ID_LENGTH + AMOUNT_VALUE_SIZE;

/// Version byte mixed into every transaction signature hash.
pub const TRANSACTION_SIGNATURE_VERSION: u8 = 0;

/// BLAKE2b-512 personalization for `PRF^expand`: child key expansion from a
/// spending key.
pub const PRF_EXPAND_PERSONALIZATION: &[u8; 16] = b"Shielded_Expand_";

/// BLAKE2b-512 personalization for `ivk = ToScalar(H(ak ‖ nk))`.
pub const IVK_PERSONALIZATION: &[u8; 16] = b"Shielded_IvkDerv";

/// BLAKE2b-256 personalization for asset identifiers.
pub const ASSET_ID_PERSONALIZATION: &[u8; 16] = b"Shielded_AssetId";

/// BLAKE2b-512 personalization for note commitments.
pub const NOTE_COMMITMENT_PERSONALIZATION: &[u8; 16] = b"Shielded_NoteCmt";

/// BLAKE2b-256 personalization for nullifiers.
pub const NULLIFIER_PERSONALIZATION: &[u8; 16] = b"Shielded_Nullify";

/// BLAKE2b-256 personalization for interior nodes of the commitment tree.
pub const MERKLE_NODE_PERSONALIZATION: &[u8; 16] = b"Shielded_MrklNod";

/// BLAKE2b-256 personalization for the transaction signature hash.
///
/// Spend, mint and binding signatures all sign this digest.
pub const SIGHASH_PERSONALIZATION: &[u8; 16] = b"Shielded_SigHash";

/// BLAKE2b-256 personalization for the receiver note encryption key.
pub const NOTE_KEY_PERSONALIZATION: &[u8; 16] = b"Shielded_NoteKey";

/// BLAKE2b-256 personalization for the sender (ovk) encryption key.
pub const OUTGOING_KEY_PERSONALIZATION: &[u8; 16] = b"Shielded_OutKey_";

/// BLAKE2b-512 personalization for proof statement digests.
pub const PROOF_STATEMENT_PERSONALIZATION: &[u8; 16] = b"Shielded_PrfStmt";

/// BLAKE2b-512 personalization for proof witness commitments.
pub const PROOF_WITNESS_PERSONALIZATION: &[u8; 16] = b"Shielded_PrfWtns";

/// BLAKE2b-512 personalization for proof seals.
pub const PROOF_SEAL_PERSONALIZATION: &[u8; 16] = b"Shielded_PrfSeal";

/// Domain for the value commitment randomness generator `R`.
///
/// Shared with Orchard so that `reddsa::orchard::Binding` (whose basepoint is
/// `GroupHash("z.cash:Orchard-cv", "r")`) verifies binding signatures.
pub const VALUE_COMMITMENT_DOMAIN: &str = "z.cash:Orchard-cv";

/// Domain for per-asset value generators `V_asset`.
pub const ASSET_VALUE_DOMAIN: &str = "shielded:asset-cv";

/// Domain for the public address generator.
pub const PUBLIC_KEY_DOMAIN: &str = "shielded:public-key";

/// Domain-separated key expansion from a spending key.
///
/// `PRF^expand_sk(t) = BLAKE2b-512("Shielded_Expand_", sk || t)`
#[derive(Clone, Copy, Debug)]
pub(crate) struct PrfExpand {
    domain_separator: u8,
}

impl PrfExpand {
    /// `[0x00]` -> `ask` (spend authorizing key, scalar field)
    pub(crate) const ASK: Self = Self {
        domain_separator: 0x00,
    };
    /// `[0x01]` -> `nk` (nullifier deriving key)
    pub(crate) const NK: Self = Self {
        domain_separator: 0x01,
    };
    /// `[0x02]` -> `ovk` (outgoing view key)
    pub(crate) const OVK: Self = Self {
        domain_separator: 0x02,
    };

    /// Evaluate the PRF.
    ///
    /// Returns 64 bytes suitable for unbiased reduction into either field
    /// via `FromUniformBytes`.
    pub(crate) fn with(self, sk: &[u8; 32]) -> [u8; 64] {
        *blake2b_simd::Params::new()
            .hash_length(64)
            .personal(PRF_EXPAND_PERSONALIZATION)
            .to_state()
            .update(sk)
            .update(&[self.domain_separator])
            .finalize()
            .as_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prf_expand_domain_separators_independent() {
        let sk = [0x42u8; 32];
        let ask = PrfExpand::ASK.with(&sk);
        let nk = PrfExpand::NK.with(&sk);
        let ovk = PrfExpand::OVK.with(&sk);
        assert_ne!(ask, nk, "ask and nk must differ");
        assert_ne!(ask, ovk, "ask and ovk must differ");
        assert_ne!(nk, ovk, "nk and ovk must differ");
    }

    #[test]
    fn wire_sizes_match_layout() {
        assert_eq!(ASSET_LEN, 161, "asset encoding");
        assert_eq!(MERKLE_NOTE_SIZE, 328, "merkle note encoding");
        assert_eq!(SPEND_SIZE, 356, "spend encoding");
        assert_eq!(OUTPUT_SIZE, 520, "output encoding");
    }
}
