//! Demo binary: replays a short scripted contest through the engine
//! with a gateway that logs every order command instead of sending it.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::EnvFilter;

use court_bot::{BotConfig, Engine, GameEvent, GameEventType, LoggingGateway};
use court_common::Side;
use court_market::PriceLevel;

#[derive(Debug, Parser)]
#[command(name = "court-bot", about = "Win-probability trading engine demo")]
struct Args {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "config/bot.toml")]
    config: PathBuf,

    /// Log filter override, e.g. "debug" or "court_bot=trace".
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = BotConfig::load(&args.config)?;

    let filter = args.log.clone().unwrap_or_else(|| cfg.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    info!(
        started_at = %Utc::now(),
        config = %args.config.display(),
        "court-bot starting"
    );

    let mut engine = Engine::new(cfg.engine.clone(), LoggingGateway::default());

    info!(cooldown = ?cfg.engine.cooldown, "waiting out startup cooldown");
    std::thread::sleep(cfg.engine.cooldown);

    // Opening book around a coin-flip price.
    engine.on_book_snapshot(
        &[
            PriceLevel::new(dec!(48), dec!(40)),
            PriceLevel::new(dec!(47), dec!(80)),
        ],
        &[
            PriceLevel::new(dec!(50), dec!(35)),
            PriceLevel::new(dec!(51), dec!(90)),
        ],
    );

    // Home side pulls ahead while the book lags behind.
    engine.on_game_event(&GameEvent::new(GameEventType::Score, 8, 2, Some(2700.0)));
    engine.on_game_event(&GameEvent::new(GameEventType::Score, 14, 4, Some(2520.0)));
    engine.on_game_event(
        &GameEvent::new(GameEventType::Score, 17, 4, Some(2460.0)).with_shot_type("THREE_POINT"),
    );

    // Venue confirms a fill from the cross above.
    engine.on_account_update(Side::Buy, dec!(50), dec!(20), dec!(99000));

    // Book catches up; edge evaporates and quotes get pulled.
    engine.on_book_snapshot(
        &[PriceLevel::new(dec!(68), dec!(50))],
        &[PriceLevel::new(dec!(69), dec!(45))],
    );

    // Contest ends: flatten and reset.
    engine.on_game_event(&GameEvent::new(GameEventType::EndGame, 96, 81, Some(0.0)));

    info!(
        position = %engine.position(),
        capital = %engine.capital(),
        "replay finished"
    );
    Ok(())
}
