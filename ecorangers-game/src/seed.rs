//! Deterministic seed derivation for the catalog and item streams.
//!
//! A single user-visible seed fans out into independent ChaCha20 streams, one
//! per domain tag, so that drawing extra items never perturbs catalog layout.

use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

pub(crate) const CATALOG_STREAM: &[u8] = b"catalog";
pub(crate) const ITEM_STREAM: &[u8] = b"items";

/// Derive a stream seed for `domain_tag` from a user seed via HMAC-SHA256.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        // HMAC accepts keys of any length.
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Construct the RNG stream for `domain_tag`.
#[must_use]
pub fn stream_rng(user_seed: u64, domain_tag: &[u8]) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(user_seed, domain_tag))
}

/// Draw a fresh seed from operating-system entropy.
#[must_use]
pub fn entropy_seed() -> u64 {
    ChaCha20Rng::from_entropy().next_u64()
}
