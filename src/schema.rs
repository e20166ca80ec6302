//! Boundary types: the JSON-facing input/output schema (spec §3, §6) plus the
//! small enums shared by the game engine. `serde(rename_all = "camelCase")`
//! keeps the wire format camelCase while the Rust code stays snake_case,
//! matching the teacher's comfort with `serde_json` at its CLI boundary
//! (`cli.rs`'s `write_submission_receipt`) generalized to a full request/
//! response schema.

use serde::{Deserialize, Serialize};

use crate::game::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionDirection {
    Call,
    Put,
}

/// Session configuration (spec §3). `tick_rate_ms` and `seed` are stored and
/// round-tripped but never branched on inside the replay path — see DESIGN.md
/// open-question decisions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub initial_capital: f64,
    pub initial_price: f64,
    pub initial_house_bankroll: f64,
    pub tick_rate_ms: u64,
    pub seed: Option<u32>,
}

/// One player action (spec §4.5.2). Tagged by `type` on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PlayerAction {
    OpenPosition {
        direction: Direction,
        size_percent: f64,
        leverage: f64,
    },
    ClosePosition,
    BuyShield,
    BuyOption {
        direction: OptionDirection,
        premium: f64,
        multiplier: u32,
        duration_seconds: u64,
    },
    TriggerSimpleTurbo,
    Relever {
        target_leverage: f64,
    },
    AddEquity {
        additional_percent: f64,
    },
}

/// One entry in the revealed action log.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedAction {
    pub tick_number: u64,
    pub action: PlayerAction,
    pub timestamp: u64,
}

/// The subset of final-state fields the operator claims, to be checked
/// against the replayed state (spec §4.7).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedFinalState {
    pub capital: f64,
    pub tick_count: Option<u64>,
    pub total_profit: f64,
    pub total_losses: f64,
}

/// The full revealed session record (spec §6 input JSON schema).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationInput {
    pub house_seed: u32,
    pub house_commit_hash: String,
    pub player_seed: Option<u32>,
    pub player_commit_hash: Option<String>,
    pub combined_seed: Option<u32>,
    pub config: SessionConfig,
    pub action_log: Vec<LoggedAction>,
    pub expected_final_state: Option<ExpectedFinalState>,
}

/// Per-field differences found comparing the replayed state against the
/// operator's claimed final state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDifference {
    pub field: String,
    pub replayed: f64,
    pub expected: f64,
}

/// The verdict returned by `verify_session` (spec §6 output schema).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub house_commitment_valid: bool,
    pub player_commitment_valid: Option<bool>,
    pub seed_combination_valid: Option<bool>,
    pub replayed_state: GameState,
    pub ticks_processed: u64,
    pub actions_executed: usize,
    pub state_match: Option<bool>,
    pub state_differences: Vec<StateDifference>,
}
