//! Pure position math (spec §4.4). Total functions — no panics on any input
//! from the replay path, only ordinary IEEE-754 numeric behavior (e.g. an
//! `entry_price` of zero yields an infinite/NaN P&L exactly as the reference
//! would, rather than being special-cased away).

use crate::schema::Direction;

/// Leveraged P&L in collateral terms.
pub fn leveraged_pnl(entry: f64, current: f64, dir: Direction, size: f64, leverage: f64) -> f64 {
    let direction_sign = match dir {
        Direction::Long => 1.0,
        Direction::Short => -1.0,
    };
    size * ((current - entry) / entry) * direction_sign * leverage
}

/// Equity remaining after P&L and accrued funding.
pub fn equity(size: f64, pnl: f64, cumulative_funding: f64) -> f64 {
    size + pnl - cumulative_funding
}

/// Whether a position with this equity is liquidated.
pub fn is_liquidated(equity: f64) -> bool {
    equity <= 0.0
}

/// The price at which equity first reaches zero, given current funding.
/// Solves `size + leveraged_pnl(entry, p, dir, size, lev) - funding = 0` for `p`.
pub fn dynamic_liquidation_price(
    entry: f64,
    dir: Direction,
    size: f64,
    leverage: f64,
    cumulative_funding: f64,
) -> f64 {
    let direction_sign = match dir {
        Direction::Long => 1.0,
        Direction::Short => -1.0,
    };
    // size + size * ((p - entry)/entry) * direction_sign * lev - funding = 0
    // (p - entry)/entry = (funding - size) / (size * direction_sign * lev)
    // p = entry * (1 + (funding - size) / (size * direction_sign * lev))
    entry * (1.0 + (cumulative_funding - size) / (size * direction_sign * leverage))
}

/// Notional divided by current equity.
pub fn effective_leverage(notional: f64, equity: f64) -> f64 {
    notional / equity
}

/// The price at which net P&L (after funding) is exactly zero.
pub fn breakeven_price(entry: f64, dir: Direction, size: f64, leverage: f64, cumulative_funding: f64) -> f64 {
    let direction_sign = match dir {
        Direction::Long => 1.0,
        Direction::Short => -1.0,
    };
    // leveraged_pnl(entry, p, dir, size, lev) = funding
    // size * ((p - entry)/entry) * direction_sign * lev = funding
    // p = entry + entry * funding / (size * direction_sign * lev)
    entry + entry * cumulative_funding / (size * direction_sign * leverage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leveraged_pnl_long_gain() {
        let pnl = leveraged_pnl(100.0, 110.0, Direction::Long, 1000.0, 10.0);
        assert!((pnl - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn leveraged_pnl_short_is_mirror_of_long() {
        let long = leveraged_pnl(100.0, 90.0, Direction::Long, 1000.0, 10.0);
        let short = leveraged_pnl(100.0, 90.0, Direction::Short, 1000.0, 10.0);
        assert!((long + short).abs() < 1e-9);
    }

    #[test]
    fn equity_and_liquidation_predicate_agree() {
        let eq = equity(1000.0, -1000.0, 0.0);
        assert_eq!(eq, 0.0);
        assert!(is_liquidated(eq));
        assert!(!is_liquidated(equity(1000.0, -999.0, 0.0)));
    }

    #[test]
    fn dynamic_liquidation_price_is_where_equity_hits_zero() {
        let entry = 100.0;
        let size = 1000.0;
        let leverage = 10.0;
        let funding = 0.0;
        let liq_price = dynamic_liquidation_price(entry, Direction::Long, size, leverage, funding);
        let pnl_at_liq = leveraged_pnl(entry, liq_price, Direction::Long, size, leverage);
        assert!((equity(size, pnl_at_liq, funding)).abs() < 1e-6);
    }

    #[test]
    fn breakeven_price_yields_zero_net_pnl() {
        let entry = 100.0;
        let size = 1000.0;
        let leverage = 10.0;
        let funding = 5.0;
        let be = breakeven_price(entry, Direction::Long, size, leverage, funding);
        let pnl_at_be = leveraged_pnl(entry, be, Direction::Long, size, leverage);
        assert!((pnl_at_be - funding).abs() < 1e-6);
    }

    #[test]
    fn effective_leverage_matches_notional_over_equity() {
        assert_eq!(effective_leverage(10_000.0, 1_000.0), 10.0);
    }
}
