//! Inbound game event surface.
//!
//! The platform pushes one call per event; every descriptor beyond the
//! scores is optional and absent fields are simply skipped.

use serde::{Deserialize, Serialize};

/// Classification of a game event tag.
///
/// Tags the engine does not act on are passed through as `Other` so the
/// score/clock bookkeeping still runs for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventType {
    Score,
    Turnover,
    Steal,
    Foul,
    EndGame,
    Other(String),
}

impl GameEventType {
    /// Parse the platform's event tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "SCORE" => GameEventType::Score,
            "TURNOVER" => GameEventType::Turnover,
            "STEAL" => GameEventType::Steal,
            "FOUL" => GameEventType::Foul,
            "END_GAME" => GameEventType::EndGame,
            other => GameEventType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for GameEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEventType::Score => write!(f, "SCORE"),
            GameEventType::Turnover => write!(f, "TURNOVER"),
            GameEventType::Steal => write!(f, "STEAL"),
            GameEventType::Foul => write!(f, "FOUL"),
            GameEventType::EndGame => write!(f, "END_GAME"),
            GameEventType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// A single game event as delivered by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    /// Event classification.
    pub event_type: GameEventType,
    /// Which team the event is attributed to ("home"/"away"), if given.
    #[serde(default)]
    pub home_away: Option<String>,
    /// Home team score after the event.
    pub home_score: i64,
    /// Away team score after the event.
    pub away_score: i64,
    /// Shot descriptor for scoring events (e.g. "THREE_POINT").
    #[serde(default)]
    pub shot_type: Option<String>,
    /// Assisting player, if any.
    #[serde(default)]
    pub assist_player: Option<String>,
    /// Rebound descriptor, if any.
    #[serde(default)]
    pub rebound_type: Option<String>,
    /// Court coordinates of the play, if reported.
    #[serde(default)]
    pub coordinates: Option<(f64, f64)>,
    /// Remaining game clock in seconds, if reported.
    #[serde(default)]
    pub time_seconds: Option<f64>,
}

impl GameEvent {
    /// Create a bare event with the given tag, scores, and clock.
    pub fn new(
        event_type: GameEventType,
        home_score: i64,
        away_score: i64,
        time_seconds: Option<f64>,
    ) -> Self {
        Self {
            event_type,
            home_away: None,
            home_score,
            away_score,
            shot_type: None,
            assist_player: None,
            rebound_type: None,
            coordinates: None,
            time_seconds,
        }
    }

    /// Attach a shot descriptor.
    pub fn with_shot_type(mut self, shot_type: impl Into<String>) -> Self {
        self.shot_type = Some(shot_type.into());
        self
    }
}
