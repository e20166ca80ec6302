//! The game state-transition engine (spec §4.5). Owns `GameState` and its
//! `LayeredPriceEngine`; mutates both in place on `process_tick`/
//! `execute_action`, mirroring the teacher's `AmmState`/`sim.rs` mutate-in-
//! place tick loop. All external reads go through `get_state`, which returns
//! an owned copy — callers never get a handle into engine-internal state.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::constants::{
    strike_distance_pct, EDGE_EARN_RATE, FUNDING_RATE_PER_TICK, OPTION_EDGE_RATE, OPTION_MULTIPLIERS,
    SHIELD_FLAT_RATE, SHIELD_TICKS_PER_BUY, SIMPLE_TURBO_COST_RATE, SPREAD_RATE, TICKS_PER_SECOND,
    TURBO_LOSS_PREMIUM,
};
use crate::position;
use crate::price_engine::{LayeredEngineState, LayeredPriceEngine};
use crate::schema::{Direction, OptionDirection, PlayerAction, SessionConfig};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    pub size: f64,
    pub leverage: f64,
    pub cumulative_funding: f64,
    pub capital_allocated: f64,
    pub total_capital_invested: f64,
    pub accumulated_pnl: f64,
    pub original_entry_price: f64,
    pub total_funding_paid: f64,
    pub open_tick: u64,
}

impl Position {
    fn notional(&self) -> f64 {
        self.size * self.leverage
    }

    fn pnl(&self, current_price: f64) -> f64 {
        position::leveraged_pnl(self.entry_price, current_price, self.direction, self.size, self.leverage)
    }

    fn equity(&self, current_price: f64) -> f64 {
        position::equity(self.size, self.pnl(current_price), self.cumulative_funding)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    pub direction: OptionDirection,
    pub strike_price: f64,
    pub purchase_price: f64,
    pub premium: f64,
    pub multiplier: u32,
    pub ticks_remaining: u64,
    pub total_ticks: u64,
}

impl OptionContract {
    fn is_in_the_money(&self, price: f64) -> bool {
        match self.direction {
            OptionDirection::Call => price >= self.strike_price,
            OptionDirection::Put => price <= self.strike_price,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTurbo {
    pub active: bool,
    pub ticks_remaining: u32,
    pub direction: i8,
    pub start_price: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub capital: f64,
    pub current_price: f64,
    pub position: Option<Position>,
    pub options: Vec<OptionContract>,
    pub simple_turbo: Option<SimpleTurbo>,
    pub turbo_points: f64,
    pub house_bankroll: f64,
    pub shield_ticks_remaining: u64,
    pub layered_state: LayeredEngineState,
    pub tick_count: u64,
    pub total_profit: f64,
    pub total_losses: f64,
    pub total_volume_traded: f64,
    pub liquidation_count: u64,
    pub trade_count: u64,
}

impl GameState {
    fn new(config: &SessionConfig) -> Self {
        Self {
            capital: config.initial_capital,
            current_price: config.initial_price,
            position: None,
            options: Vec::new(),
            simple_turbo: None,
            turbo_points: 0.0,
            house_bankroll: config.initial_house_bankroll,
            shield_ticks_remaining: 0,
            layered_state: LayeredEngineState::new(config.initial_price),
            tick_count: 0,
            total_profit: 0.0,
            total_losses: 0.0,
            total_volume_traded: 0.0,
            liquidation_count: 0,
            trade_count: 0,
        }
    }
}

/// Derives an implementation-defined 32-bit seed when `config.seed` is
/// absent. Unreachable from `verify_session`, which always supplies a seed
/// (spec §4.5) — this path only exists for a hypothetical live dealer.
fn implementation_defined_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

pub struct GameEngine {
    state: GameState,
    price_engine: LayeredPriceEngine,
}

impl GameEngine {
    pub fn new(config: &SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(implementation_defined_seed);
        Self::with_seed(config, seed)
    }

    /// Construct with an explicit seed, bypassing `config.seed` entirely.
    /// This is what the replay orchestrator always calls, per spec §4.7
    /// ("seed = combinedSeed if present else houseSeed").
    pub fn with_seed(config: &SessionConfig, seed: u32) -> Self {
        Self {
            state: GameState::new(config),
            price_engine: LayeredPriceEngine::new(seed, crate::constants::LayerConfig::default()),
        }
    }

    pub fn get_state(&self) -> GameState {
        self.state.clone()
    }

    /// Advance one tick (spec §4.5.1). Ordering is contractual.
    pub fn process_tick(&mut self) {
        // 1. increment tick count
        self.state.tick_count += 1;

        // 2. advance price
        let was_turbo_active = self.state.layered_state.turbo_active;
        let new_layered_state = self.price_engine.next_tick(&self.state.layered_state);
        self.state.layered_state = new_layered_state;
        let new_price = new_layered_state.price;
        self.state.current_price = new_price;

        // 3. simple-turbo-just-ended mirror
        if was_turbo_active {
            if new_layered_state.turbo_active {
                if let Some(turbo) = self.state.simple_turbo.as_mut() {
                    turbo.ticks_remaining = new_layered_state.turbo_ticks_remaining;
                }
            } else {
                self.state.simple_turbo = None;
            }
        }

        // 4. shield upkeep when no position
        if self.state.position.is_none() {
            self.state.shield_ticks_remaining = 0;
        }

        // 5. position liquidation / funding accrual
        if let Some(position) = self.state.position.clone() {
            let pnl = position.pnl(new_price);
            let equity = position::equity(position.size, pnl, position.cumulative_funding);
            let liquidated = position::is_liquidated(equity);

            let survived = if liquidated {
                if self.state.shield_ticks_remaining > 0 {
                    self.state.shield_ticks_remaining -= 1;
                    true
                } else {
                    self.state.house_bankroll += position.size;
                    self.state.total_losses += position.total_capital_invested;
                    self.state.liquidation_count += 1;
                    self.state.position = None;
                    false
                }
            } else {
                true
            };

            if survived {
                let funding_cost = position.size * position.leverage * FUNDING_RATE_PER_TICK;
                if let Some(position) = self.state.position.as_mut() {
                    position.cumulative_funding += funding_cost;
                    position.total_funding_paid += funding_cost;
                }
                self.state.turbo_points += EDGE_EARN_RATE * funding_cost;
            }
        }

        // 6. expire options
        let mut surviving = Vec::with_capacity(self.state.options.len());
        let mut options_return = 0.0_f64;
        let mut options_new_losses = 0.0_f64;
        for mut option in std::mem::take(&mut self.state.options) {
            option.ticks_remaining = option.ticks_remaining.saturating_sub(1);
            if option.ticks_remaining == 0 {
                if option.is_in_the_money(new_price) {
                    let payout = option.premium * option.multiplier as f64;
                    options_return += payout;
                    self.state.house_bankroll -= payout - option.premium;
                } else {
                    self.state.house_bankroll += option.premium;
                    options_new_losses += option.premium;
                }
            } else {
                surviving.push(option);
            }
        }
        self.state.options = surviving;

        // 7. final bookkeeping
        self.state.turbo_points += options_new_losses * TURBO_LOSS_PREMIUM;
        self.state.total_losses += options_new_losses;
        self.state.capital = f64::max(0.0, self.state.capital + options_return);
    }

    /// Apply one player action (spec §4.5.2). Returns `true` if the action
    /// had any effect, `false` if it was a silent no-op — the replay
    /// orchestrator surfaces the latter as a warning.
    pub fn execute_action(&mut self, action: &PlayerAction) -> bool {
        match action {
            PlayerAction::OpenPosition {
                direction,
                size_percent,
                leverage,
            } => self.open_position(*direction, *size_percent, *leverage),
            PlayerAction::ClosePosition => self.close_position(),
            PlayerAction::BuyShield => self.buy_shield(),
            PlayerAction::BuyOption {
                direction,
                premium,
                multiplier,
                duration_seconds,
            } => self.buy_option(*direction, *premium, *multiplier, *duration_seconds),
            PlayerAction::TriggerSimpleTurbo => self.trigger_simple_turbo(),
            PlayerAction::Relever { target_leverage } => self.relever(*target_leverage),
            PlayerAction::AddEquity { additional_percent } => self.add_equity(*additional_percent),
        }
    }

    fn open_position(&mut self, direction: Direction, size_percent: f64, leverage: f64) -> bool {
        if self.state.position.is_some() {
            return false;
        }
        let requested_budget = f64::min(self.state.capital * size_percent, self.state.capital);
        if requested_budget <= 0.0 {
            return false;
        }

        let spread_multiplier = 1.0 + leverage * SPREAD_RATE;
        let size = requested_budget / spread_multiplier;
        let notional = size * leverage;
        let spread_cost = notional * SPREAD_RATE;
        let total_cost = size + spread_cost;

        self.state.capital -= total_cost;
        self.state.house_bankroll += spread_cost;
        self.state.total_volume_traded += notional;
        self.state.trade_count += 1;
        self.state.turbo_points += EDGE_EARN_RATE * spread_cost;

        self.state.position = Some(Position {
            direction,
            entry_price: self.state.current_price,
            size,
            leverage,
            cumulative_funding: 0.0,
            capital_allocated: size,
            total_capital_invested: total_cost,
            accumulated_pnl: 0.0,
            original_entry_price: self.state.current_price,
            total_funding_paid: 0.0,
            open_tick: self.state.tick_count,
        });
        true
    }

    fn close_position(&mut self) -> bool {
        let Some(position) = self.state.position.take() else {
            return false;
        };

        let pnl = position.pnl(self.state.current_price);
        let funding = position.cumulative_funding;
        self.state.house_bankroll += funding - pnl;

        let returned = position.size + pnl - funding;
        let true_pnl = f64::max(0.0, returned) - position.total_capital_invested;
        let new_losses = if true_pnl < 0.0 { -true_pnl } else { 0.0 };

        self.state.capital += f64::max(0.0, returned);
        self.state.total_profit += pnl - funding;
        self.state.total_losses += new_losses;
        self.state.turbo_points += new_losses * TURBO_LOSS_PREMIUM;
        self.state.shield_ticks_remaining = 0;
        true
    }

    fn buy_shield(&mut self) -> bool {
        let Some(position) = self.state.position.as_ref() else {
            return false;
        };
        let cost = position.notional() * SHIELD_FLAT_RATE;
        if self.state.turbo_points < cost {
            return false;
        }
        self.state.turbo_points -= cost;
        self.state.shield_ticks_remaining += SHIELD_TICKS_PER_BUY;
        true
    }

    fn buy_option(
        &mut self,
        direction: OptionDirection,
        premium: f64,
        multiplier: u32,
        duration_seconds: u64,
    ) -> bool {
        if premium > self.state.capital {
            return false;
        }
        if !OPTION_MULTIPLIERS.contains(&multiplier) {
            return false;
        }
        let Some(distance_pct) = strike_distance_pct(duration_seconds, multiplier) else {
            return false;
        };

        let strike_price = match direction {
            OptionDirection::Call => self.state.current_price * (1.0 + distance_pct / 100.0),
            OptionDirection::Put => self.state.current_price * (1.0 - distance_pct / 100.0),
        };

        let edge = premium * OPTION_EDGE_RATE;
        self.state.turbo_points += EDGE_EARN_RATE * edge;
        self.state.capital -= premium;
        self.state.total_volume_traded += premium;

        let total_ticks = duration_seconds * TICKS_PER_SECOND;
        self.state.options.push(OptionContract {
            direction,
            strike_price,
            purchase_price: self.state.current_price,
            premium,
            multiplier,
            ticks_remaining: total_ticks,
            total_ticks,
        });
        true
    }

    fn trigger_simple_turbo(&mut self) -> bool {
        let Some(position) = self.state.position.as_ref() else {
            return false;
        };
        if self.state.layered_state.turbo_active {
            return false;
        }
        let cost = position.notional() * SIMPLE_TURBO_COST_RATE;
        if self.state.turbo_points < cost {
            return false;
        }

        let new_layered_state = self.price_engine.start_turbo(&self.state.layered_state);
        self.state.layered_state = new_layered_state;
        self.state.simple_turbo = Some(SimpleTurbo {
            active: true,
            ticks_remaining: new_layered_state.turbo_ticks_remaining,
            direction: new_layered_state.turbo_direction,
            start_price: self.state.current_price,
        });
        self.state.turbo_points -= cost;
        true
    }

    fn relever(&mut self, target_leverage: f64) -> bool {
        let Some(position) = self.state.position.clone() else {
            return false;
        };

        let pnl = position.pnl(self.state.current_price);
        let funding = position.cumulative_funding;
        let equity = position::equity(position.size, pnl, funding);
        if equity <= 0.0 {
            return false;
        }

        let new_notional = equity * target_leverage;
        let spread_cost = new_notional * SPREAD_RATE;
        let new_size = equity - spread_cost;
        if new_size <= 0.0 {
            return false;
        }

        let locked_in_pnl = pnl - funding - spread_cost;
        self.state.house_bankroll += spread_cost + funding - pnl;
        self.state.total_volume_traded += new_notional;
        self.state.turbo_points += EDGE_EARN_RATE * spread_cost;

        if let Some(position) = self.state.position.as_mut() {
            position.entry_price = self.state.current_price;
            position.size = new_size;
            position.leverage = target_leverage;
            position.cumulative_funding = 0.0;
            position.capital_allocated = new_size;
            position.accumulated_pnl += locked_in_pnl;
            position.total_funding_paid += funding;
        }
        true
    }

    fn add_equity(&mut self, additional_percent: f64) -> bool {
        let Some(position) = self.state.position.clone() else {
            return false;
        };

        let pnl = position.pnl(self.state.current_price);
        let funding = position.cumulative_funding;
        let current_equity = position::equity(position.size, pnl, funding);
        if current_equity <= 0.0 {
            return false;
        }

        let additional_capital = self.state.capital * additional_percent;
        if additional_capital <= 0.0 {
            return false;
        }

        let units = (position.size * position.leverage) / position.entry_price;
        let new_equity = current_equity + additional_capital;
        let new_leverage = f64::max(1.0, units * self.state.current_price / new_equity);

        self.state.house_bankroll += funding - pnl;
        self.state.capital -= additional_capital;

        if let Some(position) = self.state.position.as_mut() {
            position.entry_price = self.state.current_price;
            position.size = new_equity;
            position.leverage = new_leverage;
            position.cumulative_funding = 0.0;
            position.capital_allocated = new_equity;
            position.total_capital_invested += additional_capital;
            position.accumulated_pnl += pnl - funding;
            position.total_funding_paid += funding;
        }
        true
    }
}
