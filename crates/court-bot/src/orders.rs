//! Working order lifecycle tracking.
//!
//! The engine keeps at most one working passive order per side. Each
//! handle walks Idle -> Pending -> Live(id) as the placement is
//! requested and acknowledged; an acknowledgement without an id (IOC
//! finished, venue reject) drops the handle back to Idle so the slot
//! frees up immediately.

use tracing::debug;

use court_common::{OrderId, Side};

use crate::gateway::OrderGateway;

/// Lifecycle of a single working-order slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkingOrder {
    /// No order working; the slot is free.
    #[default]
    Idle,
    /// Placement submitted, id not yet known. The slot is occupied so
    /// the engine cannot double-place on this side.
    Pending,
    /// Resting at the venue under this id.
    Live(OrderId),
}

impl WorkingOrder {
    /// Mark the slot occupied ahead of submission.
    pub fn request(&mut self) {
        *self = WorkingOrder::Pending;
    }

    /// Record the venue's response to the submission.
    pub fn acknowledge(&mut self, id: Option<OrderId>) {
        *self = match id {
            Some(id) => WorkingOrder::Live(id),
            None => WorkingOrder::Idle,
        };
    }

    /// Free the slot without talking to the venue.
    pub fn clear(&mut self) {
        *self = WorkingOrder::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, WorkingOrder::Idle)
    }

    pub fn live_id(&self) -> Option<OrderId> {
        match self {
            WorkingOrder::Live(id) => Some(*id),
            _ => None,
        }
    }
}

/// One working-order slot per side.
#[derive(Debug, Clone, Default)]
pub struct OrderTracker {
    bid: WorkingOrder,
    ask: WorkingOrder,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, side: Side) -> &WorkingOrder {
        match side {
            Side::Buy => &self.bid,
            Side::Sell => &self.ask,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut WorkingOrder {
        match side {
            Side::Buy => &mut self.bid,
            Side::Sell => &mut self.ask,
        }
    }

    /// Whether a passive order may be placed on this side.
    pub fn is_free(&self, side: Side) -> bool {
        self.slot(side).is_idle()
    }

    /// Cancel whatever is live on this side and free the slot. Pending
    /// slots are freed without a cancel since there is no id to cancel.
    pub fn cancel_and_clear<G: OrderGateway>(&mut self, side: Side, gateway: &mut G) {
        if let Some(id) = self.slot(side).live_id() {
            if !gateway.cancel(id) {
                debug!(%side, order_id = %id, "cancel of unknown order id");
            }
        }
        self.slot_mut(side).clear();
    }

    /// Cancel both sides.
    pub fn cancel_all<G: OrderGateway>(&mut self, gateway: &mut G) {
        self.cancel_and_clear(Side::Buy, gateway);
        self.cancel_and_clear(Side::Sell, gateway);
    }

    /// Drop handles made stale by the venue's position report: a
    /// strictly positive position means the working bid filled, a
    /// strictly negative one means the working ask filled. The venue
    /// already removed a filled order, so no cancel goes out.
    pub fn reconcile_position(&mut self, position_sign: std::cmp::Ordering) {
        match position_sign {
            std::cmp::Ordering::Greater => self.bid.clear(),
            std::cmp::Ordering::Less => self.ask.clear(),
            std::cmp::Ordering::Equal => {}
        }
    }
}
