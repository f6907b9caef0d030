//! Engine and process configuration.
//!
//! Tunables load from a TOML file into a raw serde struct and are then
//! converted into the runtime [`EngineConfig`] with Decimal fields.
//! Every field is optional in the file; missing ones take the defaults
//! below. `COURTSIDE_LOG` overrides the configured log filter.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_position must be positive, got {0}")]
    NonPositiveMaxPosition(Decimal),
    #[error("risk_fraction must be in (0, 1], got {0}")]
    BadRiskFraction(Decimal),
    #[error("starting_capital must be positive, got {0}")]
    NonPositiveCapital(Decimal),
    #[error("max_spread_to_cross must be non-negative, got {0}")]
    NegativeSpreadCeiling(Decimal),
    #[error("unwind_fraction must be in (0, 1], got {0}")]
    BadUnwindFraction(Decimal),
    #[error("game_len_short ({short}) must not exceed game_len_long ({long})")]
    GameLengthsInverted { short: f64, long: f64 },
}

/// Runtime tunables for the decision engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard cap on absolute position, in contracts.
    pub max_position: Decimal,
    /// Fraction of capital put at risk per clip.
    pub risk_fraction: Decimal,
    /// Widest spread the engine will cross without a high-impact event.
    pub max_spread_to_cross: Decimal,
    /// Price improvement applied when quoting passively inside the spread.
    pub passive_improve: Decimal,
    /// Book levels below this quantity never win best-price queries.
    pub dust_qty: Decimal,
    /// Venue advantage fed to the fair value model, in lead-equivalent points.
    pub home_advantage: f64,
    /// Baseline mispricing demanded before acting, in price points.
    pub base_edge: Decimal,
    /// Quiet period after startup and after each contest reset.
    pub cooldown: Duration,
    /// Remaining clock at or below which the engine goes flat and stays out.
    pub close_out_buffer: f64,
    /// Shorter of the two clock formats the venue reports, in seconds.
    pub game_len_short: f64,
    /// Longer of the two clock formats, in seconds.
    pub game_len_long: f64,
    /// Capital the risk ledger starts from.
    pub starting_capital: Decimal,
    /// Remaining clock below which the engine unwinds instead of entering.
    pub unwind_window: f64,
    /// Fraction of the position shed per unwind clip.
    pub unwind_fraction: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_position: dec!(800),
            risk_fraction: dec!(0.007),
            max_spread_to_cross: dec!(2.0),
            passive_improve: dec!(0.1),
            dust_qty: dec!(1),
            home_advantage: 1.0,
            base_edge: dec!(0.9),
            cooldown: Duration::from_secs(3),
            close_out_buffer: 2.0,
            game_len_short: 2400.0,
            game_len_long: 2880.0,
            starting_capital: dec!(100000),
            unwind_window: 60.0,
            unwind_fraction: dec!(0.25),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_position <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveMaxPosition(self.max_position));
        }
        if self.risk_fraction <= Decimal::ZERO || self.risk_fraction > Decimal::ONE {
            return Err(ConfigError::BadRiskFraction(self.risk_fraction));
        }
        if self.starting_capital <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveCapital(self.starting_capital));
        }
        if self.max_spread_to_cross < Decimal::ZERO {
            return Err(ConfigError::NegativeSpreadCeiling(self.max_spread_to_cross));
        }
        if self.unwind_fraction <= Decimal::ZERO || self.unwind_fraction > Decimal::ONE {
            return Err(ConfigError::BadUnwindFraction(self.unwind_fraction));
        }
        if self.game_len_short > self.game_len_long {
            return Err(ConfigError::GameLengthsInverted {
                short: self.game_len_short,
                long: self.game_len_long,
            });
        }
        Ok(())
    }
}

/// Top-level process configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub engine: EngineConfig,
    /// tracing env-filter directive, e.g. "info" or "court_bot=debug".
    pub log_filter: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

/// Raw TOML shape; every field optional.
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    engine: TomlEngine,
    log_filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlEngine {
    max_position: Option<Decimal>,
    risk_fraction: Option<Decimal>,
    max_spread_to_cross: Option<Decimal>,
    passive_improve: Option<Decimal>,
    dust_qty: Option<Decimal>,
    home_advantage: Option<f64>,
    base_edge: Option<Decimal>,
    cooldown_secs: Option<f64>,
    close_out_buffer: Option<f64>,
    game_len_short: Option<f64>,
    game_len_long: Option<f64>,
    starting_capital: Option<Decimal>,
    unwind_window: Option<f64>,
    unwind_fraction: Option<Decimal>,
}

impl BotConfig {
    /// Load from a TOML file, falling back to defaults when the file is
    /// absent.
    pub fn load(path: &Path) -> Result<Self> {
        let cfg = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            Self::from_toml_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        cfg.engine.validate().context("invalid engine config")?;
        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let parsed: TomlConfig = toml::from_str(raw).context("malformed TOML")?;
        let d = EngineConfig::default();
        let e = parsed.engine;
        let engine = EngineConfig {
            max_position: e.max_position.unwrap_or(d.max_position),
            risk_fraction: e.risk_fraction.unwrap_or(d.risk_fraction),
            max_spread_to_cross: e.max_spread_to_cross.unwrap_or(d.max_spread_to_cross),
            passive_improve: e.passive_improve.unwrap_or(d.passive_improve),
            dust_qty: e.dust_qty.unwrap_or(d.dust_qty),
            home_advantage: e.home_advantage.unwrap_or(d.home_advantage),
            base_edge: e.base_edge.unwrap_or(d.base_edge),
            cooldown: e
                .cooldown_secs
                .map(Duration::from_secs_f64)
                .unwrap_or(d.cooldown),
            close_out_buffer: e.close_out_buffer.unwrap_or(d.close_out_buffer),
            game_len_short: e.game_len_short.unwrap_or(d.game_len_short),
            game_len_long: e.game_len_long.unwrap_or(d.game_len_long),
            starting_capital: e.starting_capital.unwrap_or(d.starting_capital),
            unwind_window: e.unwind_window.unwrap_or(d.unwind_window),
            unwind_fraction: e.unwind_fraction.unwrap_or(d.unwind_fraction),
        };

        // Env var beats file for the log filter.
        let log_filter = std::env::var("COURTSIDE_LOG")
            .ok()
            .or(parsed.log_filter)
            .unwrap_or_else(|| "info".to_string());

        Ok(Self { engine, log_filter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_position, dec!(800));
        assert_eq!(cfg.cooldown, Duration::from_secs(3));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let raw = r#"
            [engine]
            max_position = 500
            base_edge = "1.2"
        "#;
        let cfg = BotConfig::from_toml_str(raw).unwrap();
        assert_eq!(cfg.engine.max_position, dec!(500));
        assert_eq!(cfg.engine.base_edge, dec!(1.2));
        // Untouched fields keep their defaults.
        assert_eq!(cfg.engine.risk_fraction, dec!(0.007));
        assert_eq!(cfg.engine.game_len_long, 2880.0);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let cfg = BotConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.engine.starting_capital, dec!(100000));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(BotConfig::from_toml_str("engine = 7").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_risk_fraction() {
        let cfg = EngineConfig {
            risk_fraction: dec!(1.5),
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadRiskFraction(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_game_lengths() {
        let cfg = EngineConfig {
            game_len_short: 3000.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::GameLengthsInverted { .. })
        ));
    }
}
