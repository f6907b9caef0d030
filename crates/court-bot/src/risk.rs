//! Position, capital, and clip sizing.
//!
//! All quantities are Decimal. Sizing blends a capital-fraction base
//! with an edge multiplier and a late-game urgency multiplier, then
//! caps the clip at a quarter of the position limit and at whatever
//! headroom remains on that side.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use court_common::{f64_to_decimal, Side};

use crate::config::EngineConfig;

/// Horizon (seconds) of the urgency schedule; urgency doubles at t=0.
const URGENCY_HORIZON: f64 = 800.0;

/// Edge at which the edge multiplier saturates.
const EDGE_SATURATION: Decimal = dec!(2.0);

/// Hard clip ceiling as a fraction of the position limit.
const MAX_CLIP_FRACTION: Decimal = dec!(0.25);

/// Tracks capital and signed position, and sizes new clips.
#[derive(Debug, Clone)]
pub struct RiskLedger {
    capital: Decimal,
    position: Decimal,
    max_position: Decimal,
    risk_fraction: Decimal,
    starting_capital: Decimal,
}

impl RiskLedger {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            capital: cfg.starting_capital,
            position: Decimal::ZERO,
            max_position: cfg.max_position,
            risk_fraction: cfg.risk_fraction,
            starting_capital: cfg.starting_capital,
        }
    }

    /// Current capital.
    pub fn capital(&self) -> Decimal {
        self.capital
    }

    /// Signed position; positive is long.
    pub fn position(&self) -> Decimal {
        self.position
    }

    /// Absorb a fill report from the venue. The reported capital is
    /// authoritative; the position moves by the filled quantity.
    pub fn on_account_update(&mut self, side: Side, qty: Decimal, capital: Decimal) {
        match side {
            Side::Buy => self.position += qty,
            Side::Sell => self.position -= qty,
        }
        self.capital = capital;
        debug!(%side, %qty, position = %self.position, %capital, "account update");
    }

    /// Contracts the engine may still buy before hitting the limit.
    pub fn buy_headroom(&self) -> Decimal {
        (self.max_position - self.position).max(Decimal::ZERO)
    }

    /// Contracts the engine may still sell before hitting the limit.
    pub fn sell_headroom(&self) -> Decimal {
        (self.max_position + self.position).max(Decimal::ZERO)
    }

    /// Size a clip for the given side, edge, reference price, and
    /// remaining clock. Returns zero when no tradable size remains.
    pub fn size_for_edge(
        &self,
        side: Side,
        edge: Decimal,
        ref_price: Decimal,
        remaining: f64,
    ) -> Decimal {
        if ref_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let budget = self.capital * self.risk_fraction;
        let base = (budget / ref_price.max(Decimal::ONE)).max(Decimal::ONE);

        // Multiplier in [0.5, 2.0], saturating once |edge| hits 2 points.
        let edge_ratio = (edge.abs() / EDGE_SATURATION).min(Decimal::ONE);
        let edge_factor = dec!(0.5) + dec!(1.5) * edge_ratio;

        // Urgency in [1, 2), approaching 2 as the clock runs out.
        let t = remaining.max(0.0);
        let urgency = f64_to_decimal(1.0 + (1.0 - (t / URGENCY_HORIZON).tanh()));

        let raw = base * edge_factor * urgency;
        let cap = self.max_position * MAX_CLIP_FRACTION;
        let headroom = match side {
            Side::Buy => self.buy_headroom(),
            Side::Sell => self.sell_headroom(),
        };
        let qty = raw.min(cap).min(headroom).floor();
        if qty < Decimal::ONE {
            Decimal::ZERO
        } else {
            qty
        }
    }

    /// Quantity to shed in one late-game unwind clip: the configured
    /// fraction of the absolute position, at least one contract.
    pub fn unwind_qty(&self, unwind_fraction: Decimal) -> Decimal {
        (self.position.abs() * unwind_fraction)
            .max(Decimal::ONE)
            .floor()
    }

    /// Hard reset at contest end: flat position, capital back to the
    /// starting bankroll.
    pub fn reset(&mut self) {
        self.position = Decimal::ZERO;
        self.capital = self.starting_capital;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn ledger() -> RiskLedger {
        RiskLedger::new(&EngineConfig::default())
    }

    #[test]
    fn test_headroom_symmetry() {
        let mut l = ledger();
        assert_eq!(l.buy_headroom(), dec!(800));
        assert_eq!(l.sell_headroom(), dec!(800));

        l.on_account_update(Side::Buy, dec!(300), dec!(100000));
        assert_eq!(l.position(), dec!(300));
        assert_eq!(l.buy_headroom(), dec!(500));
        assert_eq!(l.sell_headroom(), dec!(1100));

        l.on_account_update(Side::Sell, dec!(1100), dec!(100000));
        assert_eq!(l.position(), dec!(-800));
        assert_eq!(l.buy_headroom(), dec!(1600));
        assert_eq!(l.sell_headroom(), dec!(0));
    }

    #[test]
    fn test_capital_is_authoritative() {
        let mut l = ledger();
        l.on_account_update(Side::Buy, dec!(10), dec!(99520));
        assert_eq!(l.capital(), dec!(99520));
        assert_eq!(l.position(), dec!(10));
    }

    #[test]
    fn test_size_saturates_edge_factor() {
        let l = ledger();
        // base = 100000 * 0.007 / 47 = 14.893..., urgency at t=2880 ~ 1.
        let small = l.size_for_edge(Side::Buy, dec!(1.0), dec!(47), 2880.0);
        let big = l.size_for_edge(Side::Buy, dec!(2.0), dec!(47), 2880.0);
        let huge = l.size_for_edge(Side::Buy, dec!(5.0), dec!(47), 2880.0);
        assert!(small < big);
        // Saturation: edge 5 sizes the same as edge 2.
        assert_eq!(big, huge);
    }

    #[test]
    fn test_size_urgency_grows_late() {
        let l = ledger();
        let early = l.size_for_edge(Side::Buy, dec!(1.0), dec!(47), 2880.0);
        let late = l.size_for_edge(Side::Buy, dec!(1.0), dec!(47), 60.0);
        assert!(late > early);
    }

    #[test]
    fn test_size_capped_at_quarter_of_limit() {
        let mut l = ledger();
        // A huge bankroll makes the raw size enormous.
        l.on_account_update(Side::Buy, Decimal::ZERO, dec!(10000000));
        let qty = l.size_for_edge(Side::Buy, dec!(2.0), dec!(1), 10.0);
        assert_eq!(qty, dec!(200));
    }

    #[test]
    fn test_size_respects_headroom() {
        let mut l = ledger();
        l.on_account_update(Side::Buy, dec!(795), dec!(100000));
        let qty = l.size_for_edge(Side::Buy, dec!(2.0), dec!(1), 10.0);
        assert_eq!(qty, dec!(5));

        l.on_account_update(Side::Buy, dec!(5), dec!(100000));
        assert_eq!(
            l.size_for_edge(Side::Buy, dec!(2.0), dec!(1), 10.0),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_size_floors_fractional_to_zero_below_one() {
        let mut l = ledger();
        l.on_account_update(Side::Buy, dec!(799.5), dec!(100000));
        // Headroom 0.5 floors to zero, never a fractional clip.
        assert_eq!(
            l.size_for_edge(Side::Buy, dec!(2.0), dec!(50), 600.0),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_nonpositive_ref_price_sizes_zero() {
        let l = ledger();
        assert_eq!(
            l.size_for_edge(Side::Buy, dec!(2.0), Decimal::ZERO, 600.0),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_sub_unit_ref_price_floored_at_one() {
        let l = ledger();
        let qty = l.size_for_edge(Side::Buy, dec!(0.5), dec!(0.2), 2880.0);
        let qty_at_one = l.size_for_edge(Side::Buy, dec!(0.5), dec!(1), 2880.0);
        assert_eq!(qty, qty_at_one);
    }

    #[test]
    fn test_unwind_qty() {
        let mut l = ledger();
        l.on_account_update(Side::Buy, dec!(100), dec!(100000));
        assert_eq!(l.unwind_qty(dec!(0.25)), dec!(25));

        l.on_account_update(Side::Sell, dec!(102), dec!(100000));
        assert_eq!(l.position(), dec!(-2));
        assert_eq!(l.unwind_qty(dec!(0.25)), dec!(1));
    }

    #[test]
    fn test_reset_restores_bankroll() {
        let mut l = ledger();
        l.on_account_update(Side::Buy, dec!(10), dec!(99520));
        l.reset();
        assert_eq!(l.position(), Decimal::ZERO);
        assert_eq!(l.capital(), dec!(100000));
    }
}
