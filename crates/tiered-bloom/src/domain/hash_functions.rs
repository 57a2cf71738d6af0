//! Hash functions for Bloom filters
//!
//! One SHA-256 digest per item yields two 64-bit seeds; every slot index is
//! then derived from that pair with double hashing: `g(i) = h1 + i * h2 mod m`.
//! This behaves like k independent hash functions while hashing the item once.

use sha2::{Digest, Sha256};

/// Clears the top bit so both seeds stay in `[0, 2^63)`.
const SEED_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// Replacement for a zero second seed. Odd, so it never collapses the index
/// sequence onto a single slot.
pub const ZERO_SEED_REPLACEMENT: u64 = 0x1E37_79B9_7F4A_7C15;

/// Derive the double-hashing seed pair for an item.
///
/// The digest's first two 64-bit little-endian words become `h1` and `h2`,
/// each with its sign bit cleared. A zero `h2` is replaced by
/// [`ZERO_SEED_REPLACEMENT`].
pub fn hash_pair(item: &[u8]) -> (u64, u64) {
    let digest = Sha256::digest(item);

    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[0..8]);
    let h1 = u64::from_le_bytes(word) & SEED_MASK;
    word.copy_from_slice(&digest[8..16]);
    let mut h2 = u64::from_le_bytes(word) & SEED_MASK;

    if h2 == 0 {
        h2 = ZERO_SEED_REPLACEMENT;
    }
    (h1, h2)
}

/// Compute the slot selected by hash function `i`.
///
/// Evaluated in 128-bit arithmetic so `h1 + i * h2` never wraps.
///
/// # Panics
/// Panics if `slot_count` is zero.
#[inline]
pub fn slot_index(h1: u64, h2: u64, i: usize, slot_count: usize) -> usize {
    let combined = h1 as u128 + (i as u128) * (h2 as u128);
    (combined % slot_count as u128) as usize
}

/// Iterate the `k` slot indices for an item.
pub fn slot_indices(item: &[u8], k: usize, m: usize) -> impl Iterator<Item = usize> {
    let (h1, h2) = hash_pair(item);
    (0..k).map(move |i| slot_index(h1, h2, i, m))
}
