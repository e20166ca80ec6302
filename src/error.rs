//! Error kinds accumulated by the core (spec §7). The core never panics or
//! short-circuits on these — they are data, pushed onto `VerificationResult`'s
//! `errors`/`warnings` lists. `InputMalformed` is the only variant that ever
//! escapes as a real `Result::Err`, and only at the JSON-loading boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerificationError {
    #[error("house commitment mismatch: seed does not hash to the published commitment")]
    HouseCommitmentMismatch,

    #[error("player commitment mismatch: seed does not hash to the published commitment")]
    PlayerCommitmentMismatch,

    #[error("seed combination mismatch: combinedSeed does not equal houseSeed XOR playerSeed")]
    SeedCombinationMismatch,

    #[error("action at tick {tick} had no effect — possibly invalid")]
    ActionNoEffect { tick: u64 },

    #[error("state mismatch on `{field}`: replayed {replayed}, expected {expected} (tolerance {tolerance})")]
    StateMismatch {
        field: &'static str,
        replayed: f64,
        expected: f64,
        tolerance: f64,
    },

    #[error("input malformed: {0}")]
    InputMalformed(String),
}
