//! Game clock, score, and momentum tracking.
//!
//! The venue reports the clock under one of two total-duration formats
//! and never says which. A reported time is taken as authoritative for
//! the shorter format when it fits that length (+1s tolerance); for the
//! longer format the clock becomes max(current, reported). When both
//! formats are plausible the longer-format interpretation wins. This is
//! a known heuristic; preserve the tolerances exactly.

use crate::config::EngineConfig;
use crate::events::{GameEvent, GameEventType};

/// EMA smoothing factor for lead deltas.
const MOMENTUM_ALPHA: f64 = 0.2;

/// Remaining-time cutoff below which a scoring event is high-impact.
const SCORE_IMPACT_CUTOFF: f64 = 30.0;

/// Remaining-time cutoff below which turnovers/steals/fouls are high-impact.
const FLOW_IMPACT_CUTOFF: f64 = 45.0;

/// Shot descriptor that makes a SCORE high-impact at any clock.
const THREE_POINT: &str = "THREE_POINT";

/// Hard transition demanded by a game event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep trading.
    None,
    /// Inside the close-out buffer: flatten, keep tracking, no reset.
    CloseOut,
    /// Contest over: flatten and reset everything.
    EndGame,
}

/// What the caller must do with the event just applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameUpdate {
    pub transition: Transition,
    /// Relaxes the spread-crossing gate for this evaluation only.
    pub high_impact: bool,
}

/// Clock, score, and momentum state for the current contest.
#[derive(Debug, Clone)]
pub struct GameState {
    remaining: f64,
    home: i64,
    away: i64,
    lead: f64,
    momentum: f64,
    seen_event: bool,
    game_len_short: f64,
    game_len_long: f64,
    close_out_buffer: f64,
}

impl GameState {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            remaining: cfg.game_len_long,
            home: 0,
            away: 0,
            lead: 0.0,
            momentum: 0.0,
            seen_event: false,
            game_len_short: cfg.game_len_short,
            game_len_long: cfg.game_len_long,
            close_out_buffer: cfg.close_out_buffer,
        }
    }

    /// Remaining game clock in seconds.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Score lead, home minus away.
    pub fn lead(&self) -> f64 {
        self.lead
    }

    /// EMA of lead deltas.
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Fold a game event into the clock/score/momentum state and
    /// classify what the caller has to do with it.
    pub fn apply(&mut self, ev: &GameEvent) -> GameUpdate {
        if let Some(t) = ev.time_seconds {
            // Dual clock-format inference; longer format wins a tie.
            if t <= self.game_len_short + 1.0 {
                self.remaining = t;
            }
            if t <= self.game_len_long + 1.0 {
                self.remaining = self.remaining.max(t);
            }
        }

        let prev_lead = self.lead;
        self.home = ev.home_score;
        self.away = ev.away_score;
        self.lead = (self.home - self.away) as f64;
        if self.seen_event {
            let dlead = self.lead - prev_lead;
            self.momentum = (1.0 - MOMENTUM_ALPHA) * self.momentum + MOMENTUM_ALPHA * dlead;
        } else {
            self.seen_event = true;
            self.momentum = 0.0;
        }

        let transition = if ev.event_type == GameEventType::EndGame {
            Transition::EndGame
        } else if self.remaining <= self.close_out_buffer {
            Transition::CloseOut
        } else {
            Transition::None
        };

        let high_impact = match ev.event_type {
            GameEventType::Score => {
                ev.shot_type.as_deref() == Some(THREE_POINT)
                    || self.remaining < SCORE_IMPACT_CUTOFF
            }
            GameEventType::Turnover | GameEventType::Steal | GameEventType::Foul => {
                self.remaining < FLOW_IMPACT_CUTOFF
            }
            _ => false,
        };

        GameUpdate {
            transition,
            high_impact,
        }
    }

    /// Hard reset at contest end: clock back to the longer game length,
    /// scores and momentum zeroed, next event treated as the first.
    pub fn reset(&mut self) {
        self.remaining = self.game_len_long;
        self.home = 0;
        self.away = 0;
        self.lead = 0.0;
        self.momentum = 0.0;
        self.seen_event = false;
    }
}
