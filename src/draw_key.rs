//! Draw key: a fingerprint of an eligibility snapshot.
//!
//! The key is an optimistic concurrency token. It is issued with the
//! population a caller looks at and checked again against a freshly computed
//! population when the draw is committed.

use crate::eligibility::Eligible;
use sha2::{Digest, Sha256};

/// Keys fit in 53 bits so they survive a round trip through JSON numbers.
const KEY_MASK: u64 = (1 << 53) - 1;

/// Derive the key of an ordered population.
///
/// Every entry is hashed as a fixed width tuple of donor id, amount and the
/// bits of its weight, in population order.
pub fn derive_key(population: &[Eligible]) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update((population.len() as u64).to_be_bytes());
    for e in population {
        hasher.update(e.donor.to_be_bytes());
        hasher.update(e.amount.to_be_bytes());
        hasher.update(e.weight.to_bits().to_be_bytes());
    }
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) & KEY_MASK) as i64
}
