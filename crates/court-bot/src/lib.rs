//! Decision engine trading a single win-probability instrument.
//!
//! The instrument is priced 0 to 100 and tracks the probability that
//! the home side wins a live, clock-driven contest. The engine folds
//! market and game events into local state, marks a fair value from
//! score, clock, and momentum, and emits order commands through the
//! [`gateway::OrderGateway`] seam whenever the observable book deviates
//! from fair by more than the time-tightened edge threshold.

pub mod config;
pub mod engine;
pub mod events;
pub mod game;
pub mod gateway;
pub mod model;
pub mod orders;
pub mod risk;

pub use config::{BotConfig, ConfigError, EngineConfig};
pub use engine::Engine;
pub use events::{GameEvent, GameEventType};
pub use game::{GameState, GameUpdate, Transition};
pub use gateway::{LoggingGateway, NoopGateway, OrderCommand, OrderGateway, RecordingGateway};
pub use model::FairValueModel;
pub use orders::{OrderTracker, WorkingOrder};
pub use risk::RiskLedger;
