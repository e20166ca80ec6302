//! Layered stochastic price engine (spec §4.3). Five independently seeded
//! `Mulberry32` streams — sign, magnitude, volatility, momentum, turbo — are
//! composed into a single price series. The five streams must stay
//! independent: player-triggered turbo only ever touches the turbo stream,
//! never the four background streams, so replay never leaks player choices
//! into the price path.

use crate::commitment::derive_sub_seed;
use crate::constants::LayerConfig;
use crate::prng::Mulberry32;

/// Entire RNG-derived state of price generation (spec §3). Cheap to clone —
/// this is what `GameState::layered_state` stores a copy of after every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayeredEngineState {
    pub price: f64,
    pub tick: u64,
    pub mean_price: f64,
    pub momentum: f64,
    pub last_sign: i8,
    pub in_volatility_spike: bool,
    pub turbo_active: bool,
    pub turbo_ticks_remaining: u32,
    pub turbo_direction: i8,
}

impl LayeredEngineState {
    pub fn new(initial_price: f64) -> Self {
        Self {
            price: initial_price,
            tick: 0,
            mean_price: initial_price,
            momentum: 0.0,
            last_sign: 0,
            in_volatility_spike: false,
            turbo_active: false,
            turbo_ticks_remaining: 0,
            turbo_direction: 0,
        }
    }
}

/// Owns the five price-layer PRNG streams plus the turbo stream. Config is
/// immutable for the lifetime of a session.
pub struct LayeredPriceEngine {
    config: LayerConfig,
    sign_rng: Mulberry32,
    magnitude_rng: Mulberry32,
    volatility_rng: Mulberry32,
    momentum_rng: Mulberry32,
    turbo_rng: Mulberry32,
}

impl LayeredPriceEngine {
    /// Derives the five sub-seeds from `master_seed` via `derive_sub_seed` and
    /// seeds one `Mulberry32` stream per label.
    pub fn new(master_seed: u32, config: LayerConfig) -> Self {
        Self {
            sign_rng: Mulberry32::new(derive_sub_seed(master_seed, "sign")),
            magnitude_rng: Mulberry32::new(derive_sub_seed(master_seed, "magnitude")),
            volatility_rng: Mulberry32::new(derive_sub_seed(master_seed, "volatility")),
            momentum_rng: Mulberry32::new(derive_sub_seed(master_seed, "momentum")),
            turbo_rng: Mulberry32::new(derive_sub_seed(master_seed, "turbo")),
            config,
        }
    }

    /// Advance one tick. See spec §4.3 for the exact draw order and formulas;
    /// the `let` bindings below mirror that order line for line so the
    /// evaluation order stays visible in the source.
    pub fn next_tick(&mut self, state: &LayeredEngineState) -> LayeredEngineState {
        if state.turbo_active && state.turbo_ticks_remaining > 0 {
            return self.turbo_override(state);
        }

        // B.1 sign
        let sign_roll = self.sign_rng.next();
        let sign: f64 = if sign_roll < self.config.sign_bias {
            1.0
        } else {
            -1.0
        };

        // B.2 base magnitude
        let base_magnitude = self
            .magnitude_rng
            .range(self.config.base_magnitude_min, self.config.base_magnitude_max);

        // B.3 volatility. `in_volatility_spike` is always false entering a
        // normal tick (a spike lasts exactly one tick and is always cleared
        // in B.12), so the "already in spike" branch never actually recurs
        // across ticks — it only exists within this single tick's roll.
        debug_assert!(!state.in_volatility_spike);
        let entered_spike = self.volatility_rng.chance(self.config.spike_probability);
        let volatility_multiplier = if entered_spike {
            self.volatility_rng
                .range(self.config.spike_min, self.config.spike_max)
        } else {
            self.config.volatility_base
        };

        // B.4 momentum noise
        let momentum_noise = (self.momentum_rng.next() - 0.5) * 0.1;

        // B.5 new momentum
        let new_momentum = state.momentum * self.config.momentum_decay
            + state.last_sign as f64 * self.config.momentum_strength
            + momentum_noise;

        // B.6 momentum contribution
        let momentum_contribution = new_momentum * base_magnitude;

        // B.7 mean reversion
        let deviation = (state.price - state.mean_price) / state.mean_price;
        let reversion_contribution = -deviation * self.config.reversion_strength * base_magnitude;

        // B.8 signed move
        let signed_move = sign * base_magnitude * volatility_multiplier;

        // B.9 total delta
        let total_delta =
            signed_move + momentum_contribution + reversion_contribution + self.config.drift_correction;

        // B.10 new price
        let new_price = f64::max(0.01, state.price * (1.0 + total_delta));

        // B.11 new mean
        let mean_alpha = 1.0 / self.config.reversion_half_life;
        let new_mean = state.mean_price * (1.0 - mean_alpha) + new_price * mean_alpha;

        // B.12 persist
        LayeredEngineState {
            price: new_price,
            tick: state.tick + 1,
            mean_price: new_mean,
            momentum: new_momentum,
            last_sign: if sign > 0.0 { 1 } else { -1 },
            in_volatility_spike: false,
            turbo_active: state.turbo_active,
            turbo_ticks_remaining: state.turbo_ticks_remaining,
            turbo_direction: state.turbo_direction,
        }
    }

    fn turbo_override(&self, state: &LayeredEngineState) -> LayeredEngineState {
        let per_tick_multiplier = if state.turbo_direction > 0 {
            1.10_f64.powf(1.0 / 10.0)
        } else {
            0.90_f64.powf(1.0 / 10.0)
        };
        let new_price = state.price * per_tick_multiplier;
        let ticks_remaining = state.turbo_ticks_remaining - 1;

        LayeredEngineState {
            price: new_price,
            tick: state.tick,
            mean_price: state.mean_price,
            momentum: state.momentum,
            last_sign: state.last_sign,
            in_volatility_spike: state.in_volatility_spike,
            turbo_active: ticks_remaining > 0,
            turbo_ticks_remaining: ticks_remaining,
            turbo_direction: state.turbo_direction,
        }
    }

    /// Activate a 10-tick turbo run. Draws exactly one value from the turbo
    /// stream; the price-layer streams are untouched. Price only moves on the
    /// next `next_tick` call.
    pub fn start_turbo(&mut self, state: &LayeredEngineState) -> LayeredEngineState {
        let direction: i8 = if self.turbo_rng.next() < 0.5 { 1 } else { -1 };
        LayeredEngineState {
            turbo_active: true,
            turbo_ticks_remaining: 10,
            turbo_direction: direction,
            ..*state
        }
    }
}
