//! Commitment primitives (spec §4.1): seed hashing, commitment verification,
//! seed combination, and sub-seed derivation. All total, pure functions — no
//! failure mode exists for any of them.

use sha2::{Digest, Sha256};

/// SHA-256 over the decimal ASCII representation of `seed`, hex-encoded lowercase.
pub fn hash_seed(seed: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `seed` hashes to `commit_hash`. Comparison is a plain string
/// equality over two hex digests — both operands are public, non-secret
/// values (the seed itself is only revealed after the commitment is
/// published), so there is no timing side channel to defend against here.
pub fn verify_commitment(seed: u32, commit_hash: &str) -> bool {
    hash_seed(seed).eq_ignore_ascii_case(commit_hash)
}

/// XOR of two seeds, reduced to unsigned 32-bit.
pub fn combine_seeds(a: u32, b: u32) -> u32 {
    a ^ b
}

/// Deterministic string-mixed hash from a master seed and a label, matching
/// the reference implementation's signed 32-bit arithmetic bit-for-bit.
///
/// `hash = ((hash << 5) - hash + c)` per byte, wrapping at 32 bits, performed
/// on `i32` (the reference's native integer width) and reinterpreted as `u32`
/// on return.
pub fn derive_sub_seed(master: u32, label: &str) -> u32 {
    let mut hash = master as i32;
    for &c in label.as_bytes() {
        let shifted = hash.wrapping_shl(5);
        hash = shifted.wrapping_sub(hash).wrapping_add(c as i32);
    }
    hash as u32
}
