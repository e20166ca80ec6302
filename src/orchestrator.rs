//! Replay orchestrator (spec §4.7): the only entry point a caller needs.
//! Ties together commitment verification and a fresh `GameEngine` replay,
//! producing a complete `VerificationResult`.

use crate::commitment_verifier::verify_commitments;
use crate::constants::STATE_MATCH_TOLERANCE;
use crate::error::VerificationError;
use crate::game::GameEngine;
use crate::schema::{LoggedAction, StateDifference, VerificationInput, VerificationResult};

fn determine_max_tick(input: &VerificationInput) -> u64 {
    if let Some(tick_count) = input.expected_final_state.as_ref().and_then(|e| e.tick_count) {
        return tick_count;
    }
    let last_action_tick = input.action_log.iter().map(|a| a.tick_number).max();
    match last_action_tick {
        Some(tick) => tick + 100,
        None => 1000,
    }
}

/// Independently replays a revealed session and certifies it against its
/// commitments and, if present, its claimed final state.
pub fn verify_session(input: &VerificationInput) -> VerificationResult {
    let commitment_verdict = verify_commitments(input);

    let seed = input.combined_seed.unwrap_or(input.house_seed);
    let mut engine = GameEngine::with_seed(&input.config, seed);

    let mut sorted_actions: Vec<&LoggedAction> = input.action_log.iter().collect();
    sorted_actions.sort_by_key(|a| (a.tick_number, a.timestamp));

    let expected_tick_count = input.expected_final_state.as_ref().and_then(|e| e.tick_count);
    let last_action_tick = sorted_actions.last().map(|a| a.tick_number).unwrap_or(0);
    let upper_bound = determine_max_tick(input);

    let mut warnings = Vec::new();
    let mut actions_executed = 0usize;
    let mut action_idx = 0usize;

    for t in 0..upper_bound {
        while action_idx < sorted_actions.len() && sorted_actions[action_idx].tick_number == t {
            let logged = sorted_actions[action_idx];
            let effective = engine.execute_action(&logged.action);
            if !effective {
                warnings.push(VerificationError::ActionNoEffect { tick: t }.to_string());
            }
            actions_executed += 1;
            action_idx += 1;
        }
        engine.process_tick();

        if expected_tick_count.is_none()
            && !sorted_actions.is_empty()
            && action_idx >= sorted_actions.len()
            && t >= last_action_tick + 10
        {
            break;
        }
    }

    let replayed_state = engine.get_state();

    let mut errors = commitment_verdict.errors.clone();
    let mut state_differences = Vec::new();
    let state_match = input.expected_final_state.as_ref().map(|expected| {
        let mut checks: Vec<(&'static str, f64, f64)> =
            vec![("capital", replayed_state.capital, expected.capital)];
        if let Some(expected_tick_count) = expected.tick_count {
            checks.push((
                "tick_count",
                replayed_state.tick_count as f64,
                expected_tick_count as f64,
            ));
        }
        checks.push(("total_profit", replayed_state.total_profit, expected.total_profit));
        checks.push(("total_losses", replayed_state.total_losses, expected.total_losses));

        let mut all_match = true;
        for (field, replayed, expected_value) in checks {
            if (replayed - expected_value).abs() > STATE_MATCH_TOLERANCE {
                all_match = false;
                errors.push(
                    VerificationError::StateMismatch {
                        field,
                        replayed,
                        expected: expected_value,
                        tolerance: STATE_MATCH_TOLERANCE,
                    }
                    .to_string(),
                );
                state_differences.push(StateDifference {
                    field: field.to_string(),
                    replayed,
                    expected: expected_value,
                });
            }
        }
        all_match
    });

    VerificationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
        house_commitment_valid: commitment_verdict.house_commitment_valid,
        player_commitment_valid: commitment_verdict.player_commitment_valid,
        seed_combination_valid: commitment_verdict.seed_combination_valid,
        ticks_processed: replayed_state.tick_count,
        replayed_state,
        actions_executed,
        state_match,
        state_differences,
    }
}
