//! End-to-end decision scenarios against a recording gateway.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use court_bot::{
    Engine, EngineConfig, GameEvent, GameEventType, OrderCommand, RecordingGateway,
};
use court_common::Side;
use court_market::PriceLevel;

fn cfg() -> EngineConfig {
    EngineConfig {
        cooldown: Duration::ZERO,
        ..EngineConfig::default()
    }
}

fn engine() -> Engine<RecordingGateway> {
    Engine::new(cfg(), RecordingGateway::new())
}

fn score(home: i64, away: i64, t: f64) -> GameEvent {
    GameEvent::new(GameEventType::Score, home, away, Some(t))
}

fn level(price: Decimal, qty: Decimal) -> PriceLevel {
    PriceLevel::new(price, qty)
}

#[test]
fn tied_game_empty_book_stays_quiet() {
    let mut e = engine();
    e.on_book_snapshot(&[], &[]);
    e.on_game_event(&score(10, 10, 2000.0));
    e.on_trade_print(Side::Buy, dec!(5), dec!(50));
    assert!(e.gateway().commands.is_empty());
}

#[test]
fn underpriced_tight_book_gets_crossed() {
    let mut e = engine();
    // Fresh contest fair is just above 50; an ask at 48 leaves an edge
    // of ~2.7 points over the 0.9 threshold, and the 2-point spread is
    // exactly at the crossing ceiling.
    e.on_book_snapshot(&[level(dec!(46), dec!(50))], &[level(dec!(48), dec!(50))]);

    let commands = &e.gateway().commands;
    assert_eq!(commands.len(), 1);
    match &commands[0] {
        OrderCommand::Limit {
            side,
            qty,
            price,
            ioc,
        } => {
            assert_eq!(*side, Side::Buy);
            assert_eq!(*price, dec!(48));
            assert!(*ioc);
            // base 14.89 * saturated edge factor 2.0 * urgency ~1.0015
            assert_eq!(*qty, dec!(29));
        }
        other => panic!("expected IOC limit, got {:?}", other),
    }
}

#[test]
fn overpriced_tight_book_gets_sold() {
    let mut e = engine();
    // Away side far ahead: fair collapses well below the bid.
    e.on_game_event(&score(0, 30, 1200.0));
    e.on_book_snapshot(&[level(dec!(40), dec!(50))], &[level(dec!(42), dec!(50))]);

    let last = e.gateway().commands.last().cloned();
    match last {
        Some(OrderCommand::Limit {
            side, price, ioc, ..
        }) => {
            assert_eq!(side, Side::Sell);
            assert_eq!(price, dec!(40));
            assert!(ioc);
        }
        other => panic!("expected IOC sell at the bid, got {:?}", other),
    }
}

#[test]
fn wide_spread_quotes_passively_and_requotes_cleanly() {
    let mut e = engine();
    // Spread of 9 blocks crossing; fair ~50.7 vs ask 49 leaves a buy
    // edge above threshold, so a bid rests one tick inside.
    e.on_book_snapshot(&[level(dec!(40), dec!(50))], &[level(dec!(49), dec!(50))]);

    let commands = e.gateway().commands.clone();
    assert_eq!(commands.len(), 1);
    let first_id = e.gateway().last_id();
    match &commands[0] {
        OrderCommand::Limit {
            side, price, ioc, ..
        } => {
            assert_eq!(*side, Side::Buy);
            assert_eq!(*price, dec!(40.1));
            assert!(!*ioc);
        }
        other => panic!("expected passive bid, got {:?}", other),
    }

    // Any re-evaluation replaces the quote: old id cancelled first, so
    // at most one order ever rests per side.
    e.gateway_mut().clear();
    e.on_trade_print(Side::Sell, dec!(3), dec!(44));
    let commands = &e.gateway().commands;
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], OrderCommand::Cancel { id: first_id });
    assert!(matches!(
        commands[1],
        OrderCommand::Limit { side: Side::Buy, ioc: false, .. }
    ));
}

#[test]
fn inferred_fill_clears_bid_handle_without_cancel() {
    let mut e = engine();
    e.on_book_snapshot(&[level(dec!(40), dec!(50))], &[level(dec!(49), dec!(50))]);
    assert_eq!(e.gateway().commands.len(), 1);

    // The venue reports a buy fill: position turns strictly long, so
    // the resting bid is treated as gone. The follow-up re-quote must
    // not try to cancel the dead id.
    e.gateway_mut().clear();
    e.on_account_update(Side::Buy, dec!(40.1), dec!(5), dec!(99795));
    assert_eq!(e.position(), dec!(5));
    assert!(!e
        .gateway()
        .commands
        .iter()
        .any(|c| matches!(c, OrderCommand::Cancel { .. })));
}

#[test]
fn high_impact_event_relaxes_spread_gate() {
    let mut e = engine();
    // 9-point spread: the first evaluation can only quote passively.
    e.on_book_snapshot(&[level(dec!(40), dec!(50))], &[level(dec!(49), dec!(50))]);
    e.gateway_mut().clear();

    // A three-pointer is high-impact at any clock; with the home side
    // up big, fair jumps far above the stale ask and the engine pays
    // the wide spread.
    let ev = score(20, 5, 2200.0).with_shot_type("THREE_POINT");
    e.on_game_event(&ev);
    let last = e.gateway().commands.last().cloned();
    match last {
        Some(OrderCommand::Limit {
            side, price, ioc, ..
        }) => {
            assert_eq!(side, Side::Buy);
            assert_eq!(price, dec!(49));
            assert!(ioc);
        }
        other => panic!("expected IOC buy through the wide spread, got {:?}", other),
    }
}

#[test]
fn late_game_unwind_sells_into_rich_bid() {
    let mut e = engine();
    // Long 100 with no book yet; nothing to evaluate against.
    e.on_account_update(Side::Buy, dec!(50), dec!(100), dec!(95000));
    // Away side ahead late: fair is deep below any reasonable bid.
    e.on_game_event(&score(0, 10, 50.0));
    e.on_book_delta(Side::Buy, dec!(70), dec!(10));
    e.on_book_delta(Side::Sell, dec!(72), dec!(10));

    let last = e.gateway().commands.last().cloned();
    assert_eq!(
        last,
        Some(OrderCommand::Market {
            side: Side::Sell,
            qty: dec!(25),
        })
    );
}

#[test]
fn close_out_flattens_and_blocks_entries() {
    let mut e = engine();
    e.on_account_update(Side::Buy, dec!(48), dec!(10), dec!(99520));

    // Clock inside the close-out buffer: flatten, keep tracking.
    e.on_game_event(&score(50, 50, 1.5));
    assert_eq!(
        e.gateway().commands.last(),
        Some(&OrderCommand::Market {
            side: Side::Sell,
            qty: dec!(10),
        })
    );

    // Venue confirms the closing sell.
    e.gateway_mut().clear();
    e.on_account_update(Side::Sell, dec!(50), dec!(10), dec!(99900));
    assert_eq!(e.position(), Decimal::ZERO);

    // Even a juicy book cannot re-open a position inside the buffer.
    e.gateway_mut().clear();
    e.on_book_snapshot(&[level(dec!(10), dec!(50))], &[level(dec!(11), dec!(50))]);
    assert!(!e
        .gateway()
        .commands
        .iter()
        .any(|c| matches!(c, OrderCommand::Limit { .. } | OrderCommand::Market { .. })));
}

#[test]
fn end_game_flattens_then_resets_atomically() {
    let mut e = engine();
    e.on_account_update(Side::Buy, dec!(50), dec!(40), dec!(98000));
    e.on_book_snapshot(&[level(dec!(60), dec!(50))], &[level(dec!(61), dec!(50))]);

    e.gateway_mut().clear();
    e.on_game_event(&GameEvent::new(GameEventType::EndGame, 96, 81, Some(0.0)));

    // The position is closed out at market.
    assert!(e.gateway().commands.contains(&OrderCommand::Market {
        side: Side::Sell,
        qty: dec!(40),
    }));
    // And the ledger, book, and clock all come back fresh.
    assert_eq!(e.position(), Decimal::ZERO);
    assert_eq!(e.capital(), dec!(100000));
    assert!(e.book().is_empty());
}

#[test]
fn repeated_end_game_is_idempotent() {
    let mut e = engine();
    e.on_account_update(Side::Buy, dec!(50), dec!(40), dec!(98000));

    let end = GameEvent::new(GameEventType::EndGame, 96, 81, Some(0.0));
    e.on_game_event(&end);
    let after_first = e.gateway().commands.len();

    e.on_game_event(&end);
    // Nothing left to cancel or close on the second delivery.
    assert_eq!(e.gateway().commands.len(), after_first);
    assert_eq!(e.position(), Decimal::ZERO);
}
