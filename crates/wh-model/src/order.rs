//! Order entity and extract/insert request types.

use wh_core::{ItemId, OrderId, PodId, StationId, Tick};

/// Which pending set (or terminal state) an order currently occupies.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OrderStatus {
    PendingLate,
    PendingNotLate,
    Assigned(StationId),
    Completed,
}

/// A customer order: a multiset of (item -> required count) positions.
#[derive(Clone, Debug)]
pub struct Order {
    pub id: OrderId,
    pub positions: Vec<(ItemId, u32)>,
    pub time_placed: Tick,
    pub due_time: Tick,
    pub time_stamp_submit: Tick,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(id: OrderId, positions: Vec<(ItemId, u32)>, time_placed: Tick, due_time: Tick) -> Self {
        Self {
            id,
            positions,
            time_placed,
            due_time,
            time_stamp_submit: time_placed,
            status: OrderStatus::PendingNotLate,
        }
    }

    /// Elapsed ticks since submission.
    pub fn time_stay(&self, now: Tick) -> u64 {
        now.since(self.time_stamp_submit)
    }

    pub fn is_late(&self, now: Tick) -> bool {
        now >= self.due_time
    }

    pub fn total_positions(&self) -> u32 {
        self.positions.iter().map(|(_, n)| n).sum()
    }

    #[inline]
    pub fn required(&self, item: ItemId) -> u32 {
        self.positions
            .iter()
            .find(|(i, _)| *i == item)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// One unit of work binding a pod item to an order, to be picked from a pod
/// for an output station.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ExtractRequest {
    pub item: ItemId,
    pub order: OrderId,
    pub station: Option<StationId>,
}

/// One unit of work binding a bundle to a pod at an input station.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct InsertRequest {
    pub item: ItemId,
    pub pod: PodId,
    pub station: Option<StationId>,
}
