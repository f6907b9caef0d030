//! Fair value model: score/time/momentum -> win probability -> price.
//!
//! The win probability is a logistic over three signals, each scaled by
//! 1/sqrt(minutes_remaining + 1) so the same raw lead counts for more
//! as the clock runs down. Momentum gets an extra late-game boost on a
//! tanh schedule. Model math runs in f64; prices come back as Decimal.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use court_common::{decimal_to_f64, f64_to_decimal};

use crate::config::EngineConfig;
use crate::game::GameState;

/// Logit weight on the time-scaled lead.
const LEAD_WEIGHT: f64 = 0.18;

/// Logit weight on the time-scaled venue advantage.
const VENUE_WEIGHT: f64 = 0.20;

/// Logit weight on boosted momentum.
const MOMENTUM_WEIGHT: f64 = 0.10;

/// Horizon (seconds) of the tanh schedules for threshold tightening and
/// the late-game momentum boost.
const LATE_HORIZON: f64 = 600.0;

/// Maximum fractional tightening of the edge threshold late in the game.
const LATE_TIGHTEN: f64 = 0.55;

/// Absolute floor on the edge threshold, in price points.
const MIN_EDGE: Decimal = dec!(0.2);

/// Maps game state to a fair price in [1, 99] and the edge threshold
/// the strategy demands before acting.
#[derive(Debug, Clone)]
pub struct FairValueModel {
    home_advantage: f64,
    base_edge: Decimal,
}

impl FairValueModel {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            home_advantage: cfg.home_advantage,
            base_edge: cfg.base_edge,
        }
    }

    /// Win probability for the home side, clamped to [0.01, 0.99].
    pub fn win_prob(&self, game: &GameState) -> f64 {
        let t = game.remaining().max(0.0);
        let scale = 1.0 / ((t / 60.0) + 1.0).sqrt();
        let x_lead = game.lead() * scale;
        let x_home = self.home_advantage * scale;
        // Late swings are more informative: boost grows toward 2x at t=0.
        let x_mom = game.momentum() * (1.0 + (1.0 - (t / LATE_HORIZON).tanh()));
        let logit = LEAD_WEIGHT * x_lead + VENUE_WEIGHT * x_home + MOMENTUM_WEIGHT * x_mom;
        sigmoid(logit).clamp(0.01, 0.99)
    }

    /// Fair price on the [0, 100] scale.
    pub fn fair_value(&self, game: &GameState) -> Decimal {
        f64_to_decimal(100.0 * self.win_prob(game))
    }

    /// Mispricing threshold, tightened by up to 55% as the clock runs
    /// down, floored at 0.2 price points.
    pub fn edge_threshold(&self, game: &GameState) -> Decimal {
        let t = game.remaining().max(0.0);
        let late_factor = 1.0 - LATE_TIGHTEN * (1.0 - (t / LATE_HORIZON).tanh());
        let threshold = decimal_to_f64(self.base_edge) * late_factor;
        f64_to_decimal(threshold).max(MIN_EDGE)
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
