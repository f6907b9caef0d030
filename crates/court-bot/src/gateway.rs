//! Order submission seam.
//!
//! The engine talks to the venue through [`OrderGateway`] so tests can
//! capture intents instead of sending them anywhere.

use rust_decimal::Decimal;
use tracing::info;

use court_common::{OrderId, Side};

/// Venue-facing order operations.
pub trait OrderGateway {
    /// Submit a market order.
    fn place_market(&mut self, side: Side, qty: Decimal);

    /// Submit a limit order. `ioc` orders cancel any unfilled remainder
    /// immediately. Returns the venue's order id, or `None` when the
    /// venue rejected the submission or the order finished on arrival.
    fn place_limit(&mut self, side: Side, qty: Decimal, price: Decimal, ioc: bool)
        -> Option<OrderId>;

    /// Cancel a resting order. Returns false if the venue no longer
    /// knows the id.
    fn cancel(&mut self, id: OrderId) -> bool;
}

/// Gateway that drops everything. Placeholder for dry runs.
#[derive(Debug, Default)]
pub struct NoopGateway;

impl OrderGateway for NoopGateway {
    fn place_market(&mut self, _side: Side, _qty: Decimal) {}

    fn place_limit(
        &mut self,
        _side: Side,
        _qty: Decimal,
        _price: Decimal,
        _ioc: bool,
    ) -> Option<OrderId> {
        None
    }

    fn cancel(&mut self, _id: OrderId) -> bool {
        false
    }
}

/// Gateway that logs every intent and acknowledges limits with
/// sequential ids. Used by the demo binary.
#[derive(Debug, Default)]
pub struct LoggingGateway {
    next_id: i64,
}

impl OrderGateway for LoggingGateway {
    fn place_market(&mut self, side: Side, qty: Decimal) {
        info!(%side, %qty, "MARKET order");
    }

    fn place_limit(&mut self, side: Side, qty: Decimal, price: Decimal, ioc: bool) -> Option<OrderId> {
        self.next_id += 1;
        let id = OrderId(self.next_id);
        info!(%side, %qty, %price, ioc, order_id = %id, "LIMIT order");
        Some(id)
    }

    fn cancel(&mut self, id: OrderId) -> bool {
        info!(order_id = %id, "CANCEL order");
        true
    }
}

/// Every intent the engine can emit, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCommand {
    Market {
        side: Side,
        qty: Decimal,
    },
    Limit {
        side: Side,
        qty: Decimal,
        price: Decimal,
        ioc: bool,
    },
    Cancel {
        id: OrderId,
    },
}

/// Test gateway recording every intent.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub commands: Vec<OrderCommand>,
    next_id: i64,
    /// When true, limit submissions return no id (venue reject / IOC
    /// finished on arrival).
    pub reject_limits: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn last_id(&self) -> OrderId {
        OrderId(self.next_id)
    }
}

impl OrderGateway for RecordingGateway {
    fn place_market(&mut self, side: Side, qty: Decimal) {
        self.commands.push(OrderCommand::Market { side, qty });
    }

    fn place_limit(&mut self, side: Side, qty: Decimal, price: Decimal, ioc: bool) -> Option<OrderId> {
        self.commands.push(OrderCommand::Limit {
            side,
            qty,
            price,
            ioc,
        });
        if self.reject_limits {
            None
        } else {
            self.next_id += 1;
            Some(OrderId(self.next_id))
        }
    }

    fn cancel(&mut self, id: OrderId) -> bool {
        self.commands.push(OrderCommand::Cancel { id });
        true
    }
}
