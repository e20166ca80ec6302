//! Report rendering (spec §4.8): a plain-text summary of a
//! `VerificationResult`, in the same aligned `println!`-table idiom the
//! teacher's `cli.rs` uses for its strategy leaderboard.

use crate::schema::VerificationResult;

/// Render `result` as an aligned plain-text report.
pub fn render_text(result: &VerificationResult) -> String {
    let mut out = String::new();

    out.push_str(if result.valid {
        "=== VERIFICATION PASSED ===\n"
    } else {
        "=== VERIFICATION FAILED ===\n"
    });

    out.push_str(&format!(
        "house commitment:  {}\n",
        bool_label(result.house_commitment_valid)
    ));
    out.push_str(&format!(
        "player commitment: {}\n",
        option_bool_label(result.player_commitment_valid)
    ));
    out.push_str(&format!(
        "seed combination:  {}\n",
        option_bool_label(result.seed_combination_valid)
    ));

    out.push_str(&format!(
        "\nticks processed:   {:>10}\n",
        result.ticks_processed
    ));
    out.push_str(&format!(
        "actions executed:  {:>10}\n",
        result.actions_executed
    ));
    out.push_str(&format!(
        "final capital:     {:>14.4}\n",
        result.replayed_state.capital
    ));
    out.push_str(&format!(
        "total profit:      {:>14.4}\n",
        result.replayed_state.total_profit
    ));
    out.push_str(&format!(
        "total losses:      {:>14.4}\n",
        result.replayed_state.total_losses
    ));

    if let Some(state_match) = result.state_match {
        out.push_str(&format!("\nstate match:       {}\n", bool_label(state_match)));
        if !result.state_differences.is_empty() {
            out.push_str("differences:\n");
            for diff in &result.state_differences {
                out.push_str(&format!(
                    "  {:<16} replayed={:>14.4} expected={:>14.4}\n",
                    diff.field, diff.replayed, diff.expected
                ));
            }
        }
    }

    if !result.errors.is_empty() {
        out.push_str("\nerrors:\n");
        for error in &result.errors {
            out.push_str(&format!("  - {error}\n"));
        }
    }
    if !result.warnings.is_empty() {
        out.push_str("\nwarnings:\n");
        for warning in &result.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "OK"
    } else {
        "FAILED"
    }
}

fn option_bool_label(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "OK",
        Some(false) => "FAILED",
        None => "n/a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::price_engine::LayeredEngineState;

    fn sample_state() -> GameState {
        GameState {
            capital: 1234.5,
            current_price: 100.0,
            position: None,
            options: Vec::new(),
            simple_turbo: None,
            turbo_points: 0.0,
            house_bankroll: 10_000_000.0,
            shield_ticks_remaining: 0,
            layered_state: LayeredEngineState::new(100.0),
            tick_count: 50,
            total_profit: 234.5,
            total_losses: 0.0,
            total_volume_traded: 5000.0,
            liquidation_count: 0,
            trade_count: 2,
        }
    }

    #[test]
    fn passing_report_contains_ok_banner() {
        let result = VerificationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            house_commitment_valid: true,
            player_commitment_valid: None,
            seed_combination_valid: None,
            replayed_state: sample_state(),
            ticks_processed: 50,
            actions_executed: 2,
            state_match: None,
            state_differences: Vec::new(),
        };
        let text = render_text(&result);
        assert!(text.contains("VERIFICATION PASSED"));
        assert!(text.contains("house commitment:  OK"));
    }

    #[test]
    fn failing_report_lists_errors() {
        let result = VerificationResult {
            valid: false,
            errors: vec!["house commitment mismatch".to_string()],
            warnings: Vec::new(),
            house_commitment_valid: false,
            player_commitment_valid: None,
            seed_combination_valid: None,
            replayed_state: sample_state(),
            ticks_processed: 50,
            actions_executed: 2,
            state_match: None,
            state_differences: Vec::new(),
        };
        let text = render_text(&result);
        assert!(text.contains("VERIFICATION FAILED"));
        assert!(text.contains("house commitment mismatch"));
    }
}
