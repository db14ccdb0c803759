//! Personalized BLAKE2b helpers shared by every derivation in the crate.

/// BLAKE2b-256 over the concatenation of `parts`.
pub(crate) fn blake2b_256(personal: &[u8; 16], parts: &[&[u8]]) -> [u8; 32] {
    let mut state = blake2b_simd::Params::new()
        .hash_length(32)
        .personal(personal)
        .to_state();
    for part in parts {
        state.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(state.finalize().as_bytes());
    out
}

/// BLAKE2b-512 over the concatenation of `parts`.
///
/// The 64-byte output is what `FromUniformBytes` wants for an unbiased
/// reduction into `Fp` or `Fq`.
pub(crate) fn blake2b_512(personal: &[u8; 16], parts: &[&[u8]]) -> [u8; 64] {
    let mut state = blake2b_simd::Params::new()
        .hash_length(64)
        .personal(personal)
        .to_state();
    for part in parts {
        state.update(part);
    }
    *state.finalize().as_array()
}
