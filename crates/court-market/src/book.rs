//! Order book state management.
//!
//! Maintains in-memory book state from platform updates. Levels below
//! the dust threshold stay in storage but never win best-price queries;
//! updates with non-positive quantity delete the level outright.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use court_common::{clamp_price, Side};

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price (0 to 100 on this venue).
    pub price: Decimal,
    /// Quantity available at this price.
    pub quantity: Decimal,
}

impl PriceLevel {
    /// Create a new price level.
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// In-memory view of both sides of the book.
///
/// Bid < ask is NOT enforced here; the view mirrors whatever the venue
/// reports. Downstream logic must refuse to compute a midpoint or edge
/// when either side is missing.
#[derive(Debug, Clone, Default)]
pub struct BookView {
    /// Bid levels (price -> quantity).
    bids: HashMap<Decimal, Decimal>,
    /// Ask levels (price -> quantity).
    asks: HashMap<Decimal, Decimal>,
    /// Minimum displayed quantity for a level to count as tradable.
    dust: Decimal,
}

impl BookView {
    /// Create an empty book with the given dust threshold.
    pub fn new(dust: Decimal) -> Self {
        Self {
            bids: HashMap::new(),
            asks: HashMap::new(),
            dust,
        }
    }

    /// Apply a delta update to a single level.
    ///
    /// The price is clamped into [0, 100]; a non-positive quantity
    /// removes the level.
    pub fn apply_update(&mut self, side: Side, price: Decimal, quantity: Decimal) {
        let price = clamp_price(price);
        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        if quantity <= Decimal::ZERO {
            levels.remove(&price);
        } else {
            levels.insert(price, quantity);
        }
    }

    /// Apply a full snapshot, replacing both sides wholesale.
    ///
    /// Only levels at or above the dust threshold are retained.
    pub fn apply_snapshot(&mut self, bids: &[PriceLevel], asks: &[PriceLevel]) {
        self.bids.clear();
        self.asks.clear();
        for level in bids {
            if level.quantity >= self.dust {
                self.bids.insert(clamp_price(level.price), level.quantity);
            }
        }
        for level in asks {
            if level.quantity >= self.dust {
                self.asks.insert(clamp_price(level.price), level.quantity);
            }
        }
    }

    /// Drop all levels on both sides.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// Best bid: highest price with at least the dust quantity.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids
            .iter()
            .filter(|(_, q)| **q >= self.dust)
            .map(|(p, _)| *p)
            .max()
    }

    /// Best ask: lowest price with at least the dust quantity.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks
            .iter()
            .filter(|(_, q)| **q >= self.dust)
            .map(|(p, _)| *p)
            .min()
    }

    /// Midpoint, defined only when both sides have a qualifying level.
    pub fn midpoint(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((bid + ask) / Decimal::TWO)
    }

    /// Check if the book has any stored level on either side.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
