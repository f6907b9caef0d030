//! The decision engine.
//!
//! One engine instance per contest. Every inbound event is folded into
//! local state and followed by a full re-evaluation of the trading
//! policy: late-game unwind, then spread cross, then passive quote,
//! then cancel-everything when no edge remains. First match wins and
//! at most one order goes out per evaluation.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, trace};

use court_common::{clamp_price, Side};
use court_market::{BookView, PriceLevel};

use crate::config::EngineConfig;
use crate::events::GameEvent;
use crate::game::{GameState, Transition};
use crate::gateway::OrderGateway;
use crate::model::FairValueModel;
use crate::orders::OrderTracker;
use crate::risk::RiskLedger;

/// Positions at or below this magnitude are treated as already flat by
/// the late-game unwind.
const POSITION_DUST: Decimal = dec!(0.5);

pub struct Engine<G: OrderGateway> {
    cfg: EngineConfig,
    book: BookView,
    game: GameState,
    model: FairValueModel,
    risk: RiskLedger,
    tracker: OrderTracker,
    gateway: G,
    last_reset: Instant,
}

impl<G: OrderGateway> Engine<G> {
    pub fn new(cfg: EngineConfig, gateway: G) -> Self {
        Self {
            book: BookView::new(cfg.dust_qty),
            game: GameState::new(&cfg),
            model: FairValueModel::new(&cfg),
            risk: RiskLedger::new(&cfg),
            tracker: OrderTracker::new(),
            gateway,
            last_reset: Instant::now(),
            cfg,
        }
    }

    pub fn position(&self) -> Decimal {
        self.risk.position()
    }

    pub fn capital(&self) -> Decimal {
        self.risk.capital()
    }

    pub fn book(&self) -> &BookView {
        &self.book
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Single-level book delta.
    pub fn on_book_delta(&mut self, side: Side, price: Decimal, quantity: Decimal) {
        self.book.apply_update(side, price, quantity);
        self.evaluate(false);
    }

    /// Full book replacement.
    pub fn on_book_snapshot(&mut self, bids: &[PriceLevel], asks: &[PriceLevel]) {
        self.book.apply_snapshot(bids, asks);
        self.evaluate(false);
    }

    /// Public trade print. Observed only; no local state moves.
    pub fn on_trade_print(&mut self, side: Side, quantity: Decimal, price: Decimal) {
        trace!(%side, %quantity, %price, "trade print");
        self.evaluate(false);
    }

    /// Fill report. The reported capital is authoritative; a position
    /// that turns strictly long means the working bid filled (strictly
    /// short, the working ask) so that handle is dropped without a
    /// cancel.
    pub fn on_account_update(
        &mut self,
        side: Side,
        price: Decimal,
        quantity: Decimal,
        capital: Decimal,
    ) {
        trace!(%side, %price, %quantity, "fill report");
        self.risk.on_account_update(side, quantity, capital);
        self.tracker
            .reconcile_position(self.risk.position().cmp(&Decimal::ZERO));
        self.evaluate(false);
    }

    /// Game event. END_GAME flattens and hard-resets; inside the
    /// close-out buffer the engine flattens but keeps tracking.
    pub fn on_game_event(&mut self, ev: &GameEvent) {
        let update = self.game.apply(ev);
        trace!(
            event = %ev.event_type,
            remaining = self.game.remaining(),
            lead = self.game.lead(),
            momentum = self.game.momentum(),
            "game event"
        );
        match update.transition {
            Transition::EndGame => {
                info!(lead = self.game.lead(), "contest over");
                self.flatten_all();
                self.reset();
            }
            Transition::CloseOut => {
                self.flatten_all();
            }
            Transition::None => self.evaluate(update.high_impact),
        }
    }

    /// Cancel both working handles and close any whole-unit position
    /// with a market order. Safe to call repeatedly.
    pub fn flatten_all(&mut self) {
        self.tracker.cancel_all(&mut self.gateway);
        let pos = self.risk.position();
        let qty = pos.abs().floor();
        if qty >= Decimal::ONE {
            let side = if pos > Decimal::ZERO {
                Side::Sell
            } else {
                Side::Buy
            };
            info!(%pos, %side, %qty, "flattening position");
            self.gateway.place_market(side, qty);
        }
    }

    /// Hard reset between contests. Cancelling here is a no-op when
    /// flatten_all already ran, kept so reset alone leaves no orders.
    fn reset(&mut self) {
        self.tracker.cancel_all(&mut self.gateway);
        self.book.clear();
        self.game.reset();
        self.risk.reset();
        self.last_reset = Instant::now();
        info!("engine state reset");
    }

    fn evaluate(&mut self, high_impact: bool) {
        if self.last_reset.elapsed() < self.cfg.cooldown {
            return;
        }
        let remaining = self.game.remaining();
        if remaining <= self.cfg.close_out_buffer {
            self.flatten_all();
            return;
        }
        let (Some(bid), Some(ask)) = (self.book.best_bid(), self.book.best_ask()) else {
            return;
        };

        let fair = self.model.fair_value(&self.game);
        let threshold = self.model.edge_threshold(&self.game);
        let spread = (ask - bid).max(Decimal::ZERO);
        let mid = (bid + ask) / Decimal::TWO;
        let e_buy = fair - ask;
        let e_sell = bid - fair;
        trace!(%bid, %ask, %fair, %threshold, %e_buy, %e_sell, "evaluation");

        // Late game: stop entering, shed into favorable prices.
        if remaining < self.cfg.unwind_window {
            let pos = self.risk.position();
            if pos > POSITION_DUST && fair < bid {
                let qty = self.risk.unwind_qty(self.cfg.unwind_fraction);
                info!(%pos, %qty, %bid, %fair, "late unwind: selling into bid");
                self.gateway.place_market(Side::Sell, qty);
                return;
            }
            if pos < -POSITION_DUST && fair > ask {
                let qty = self.risk.unwind_qty(self.cfg.unwind_fraction);
                info!(%pos, %qty, %ask, %fair, "late unwind: buying back at ask");
                self.gateway.place_market(Side::Buy, qty);
                return;
            }
        }

        // Cross the spread when it is tight enough, or when a
        // high-impact event makes the stale quote worth paying for.
        if spread <= self.cfg.max_spread_to_cross || high_impact {
            if e_buy > threshold {
                let qty = self.risk.size_for_edge(Side::Buy, e_buy, mid, remaining);
                if qty >= Decimal::ONE {
                    self.tracker.cancel_all(&mut self.gateway);
                    info!(%ask, %fair, edge = %e_buy, %qty, "crossing: IOC buy at ask");
                    self.gateway.place_limit(Side::Buy, qty, ask, true);
                    return;
                }
            }
            if e_sell > threshold {
                let qty = self.risk.size_for_edge(Side::Sell, e_sell, mid, remaining);
                if qty >= Decimal::ONE {
                    self.tracker.cancel_all(&mut self.gateway);
                    info!(%bid, %fair, edge = %e_sell, %qty, "crossing: IOC sell at bid");
                    self.gateway.place_limit(Side::Sell, qty, bid, true);
                    return;
                }
            }
        }

        // Passive quote one improvement tick inside the spread. Only
        // one resting order across both sides; the buy side needs to
        // dominate, the sell side only needs to clear the threshold.
        if e_buy > e_sell && e_buy > threshold && self.risk.buy_headroom() >= Decimal::ONE {
            let qty = self.risk.size_for_edge(Side::Buy, e_buy, mid, remaining);
            if qty >= Decimal::ONE {
                self.tracker.cancel_and_clear(Side::Sell, &mut self.gateway);
                self.tracker.cancel_and_clear(Side::Buy, &mut self.gateway);
                let price = clamp_price(bid + self.cfg.passive_improve);
                debug!(%price, %qty, edge = %e_buy, "quoting passive bid");
                self.tracker.slot_mut(Side::Buy).request();
                let id = self.gateway.place_limit(Side::Buy, qty, price, false);
                self.tracker.slot_mut(Side::Buy).acknowledge(id);
            }
        } else if e_sell > threshold && self.risk.sell_headroom() >= Decimal::ONE {
            let qty = self.risk.size_for_edge(Side::Sell, e_sell, mid, remaining);
            if qty >= Decimal::ONE {
                self.tracker.cancel_and_clear(Side::Buy, &mut self.gateway);
                self.tracker.cancel_and_clear(Side::Sell, &mut self.gateway);
                let price = clamp_price(ask - self.cfg.passive_improve);
                debug!(%price, %qty, edge = %e_sell, "quoting passive ask");
                self.tracker.slot_mut(Side::Sell).request();
                let id = self.gateway.place_limit(Side::Sell, qty, price, false);
                self.tracker.slot_mut(Side::Sell).acknowledge(id);
            }
        } else {
            // No edge left: pull whatever is still resting.
            self.tracker.cancel_all(&mut self.gateway);
        }
    }
}
