//! Commitment verification (spec §4.6). Independent of the replay — checks
//! only that the revealed seed(s) match their pre-published hashes and that
//! the combined seed, if present, is exactly the XOR of the two.

use crate::commitment::{combine_seeds, verify_commitment};
use crate::error::VerificationError;
use crate::schema::VerificationInput;

/// Outcome of checking commitments, independent of whether the replay itself
/// matches. `errors` mirrors exactly the failing checks, formatted via
/// `VerificationError`'s `Display`.
pub struct CommitmentVerdict {
    pub house_commitment_valid: bool,
    pub player_commitment_valid: Option<bool>,
    pub seed_combination_valid: Option<bool>,
    pub errors: Vec<String>,
}

pub fn verify_commitments(input: &VerificationInput) -> CommitmentVerdict {
    let mut errors = Vec::new();

    let house_commitment_valid = verify_commitment(input.house_seed, &input.house_commit_hash);
    if !house_commitment_valid {
        errors.push(VerificationError::HouseCommitmentMismatch.to_string());
    }

    let player_commitment_valid = match (input.player_seed, &input.player_commit_hash) {
        (Some(seed), Some(hash)) => {
            let valid = verify_commitment(seed, hash);
            if !valid {
                errors.push(VerificationError::PlayerCommitmentMismatch.to_string());
            }
            Some(valid)
        }
        _ => None,
    };

    let seed_combination_valid = match (input.player_seed, input.combined_seed) {
        (Some(player_seed), Some(combined_seed)) => {
            let valid = combine_seeds(input.house_seed, player_seed) == combined_seed;
            if !valid {
                errors.push(VerificationError::SeedCombinationMismatch.to_string());
            }
            Some(valid)
        }
        _ => None,
    };

    CommitmentVerdict {
        house_commitment_valid,
        player_commitment_valid,
        seed_combination_valid,
        errors,
    }
}
