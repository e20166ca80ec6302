//! Protocol-wide constants. Must match the operator's implementation bit-for-bit —
//! these are not tunables, they are part of the replay contract.

/// Entry/exit spread, charged as a fraction of notional.
pub const SPREAD_RATE: f64 = 0.005;

/// Funding rate per hour, spread evenly across `TICKS_PER_HOUR` ticks.
pub const FUNDING_RATE_PER_HOUR: f64 = 0.10;
pub const TICKS_PER_HOUR: f64 = 36_000.0;
pub const FUNDING_RATE_PER_TICK: f64 = FUNDING_RATE_PER_HOUR / TICKS_PER_HOUR;

/// Ticks per second of simulated time (used to convert option duration to ticks).
pub const TICKS_PER_SECOND: u64 = 10;

pub const SIMPLE_TURBO_COST_RATE: f64 = 0.01;

pub const SHIELD_FLAT_RATE: f64 = 0.0066;
pub const SHIELD_TICKS_PER_BUY: u64 = 10;

pub const TURBO_LOSS_PREMIUM: f64 = 0.02;

/// House edge, as applied to option premiums.
pub const OPTION_EDGE_RATE: f64 = 0.02;

/// Fraction of spread/option edge returned to the player as turbo points.
pub const EDGE_EARN_RATE: f64 = 0.20;

/// Absolute tolerance used when comparing a replayed final state against the
/// operator's claimed final state.
pub const STATE_MATCH_TOLERANCE: f64 = 1e-4;

/// Default layered-price-engine configuration (spec §6).
pub struct LayerConfig {
    pub sign_bias: f64,
    pub base_magnitude_min: f64,
    pub base_magnitude_max: f64,
    pub volatility_base: f64,
    pub spike_probability: f64,
    pub spike_min: f64,
    pub spike_max: f64,
    pub momentum_strength: f64,
    pub momentum_decay: f64,
    pub reversion_strength: f64,
    pub reversion_half_life: f64,
    pub drift_correction: f64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            sign_bias: 0.5,
            base_magnitude_min: 0.0005,
            base_magnitude_max: 0.0025,
            volatility_base: 1.0,
            spike_probability: 0.02,
            spike_min: 2.0,
            spike_max: 4.0,
            momentum_strength: 0.15,
            momentum_decay: 0.92,
            reversion_strength: 0.03,
            reversion_half_life: 500.0,
            drift_correction: -0.000008,
        }
    }
}

/// Option multiplier tiers.
pub const OPTION_MULTIPLIERS: [u32; 5] = [2, 5, 10, 25, 100];

/// Strike distance (percent) by `duration_seconds -> multiplier -> distance`.
/// See spec §6. Returns `None` for a duration/multiplier pair not in the table.
pub fn strike_distance_pct(duration_seconds: u64, multiplier: u32) -> Option<f64> {
    let row: &[(u32, f64)] = match duration_seconds {
        1 => &[
            (2, 0.020),
            (5, 0.694),
            (10, 1.052),
            (25, 1.422),
            (100, 1.880),
        ],
        5 => &[
            (2, 0.059),
            (5, 2.338),
            (10, 3.535),
            (25, 4.791),
            (100, 6.351),
        ],
        30 => &[
            (2, 0.213),
            (5, 6.446),
            (10, 9.705),
            (25, 13.243),
            (100, 17.644),
        ],
        60 => &[
            (2, 0.253),
            (5, 9.191),
            (10, 13.828),
            (25, 18.823),
            (100, 25.346),
        ],
        300 => &[
            (2, 0.587),
            (5, 20.263),
            (10, 30.162),
            (25, 41.016),
            (100, 59.495),
        ],
        _ => return None,
    };
    row.iter()
        .find(|(m, _)| *m == multiplier)
        .map(|(_, distance)| *distance)
}
