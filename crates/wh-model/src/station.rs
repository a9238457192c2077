//! Station entity: a fixed workstation servicing pods and orders.

use wh_core::{NodeId, OrderId, PodId, StationId};

/// Whether a station accepts bundles into pods or extracts items from pods.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StationKind {
    Input,
    Output,
}

/// A fixed input or output workstation.
///
/// Invariant: `used + reserved <= capacity`.
#[derive(Clone, Debug)]
pub struct Station {
    pub id: StationId,
    pub kind: StationKind,
    pub tier: u8,
    pub node: NodeId,
    pub capacity: u32,
    pub used: u32,
    pub reserved: u32,
    /// Orders currently being picked/filled at this station.
    pub assigned_orders: Vec<OrderId>,
    /// Orders allocated but waiting behind `assigned_orders`.
    pub queued_orders: Vec<OrderId>,
    /// Pods physically queued at, en route to, or standing at this station.
    pub inbound_pods: Vec<PodId>,
}

impl Station {
    pub fn new(id: StationId, kind: StationKind, tier: u8, node: NodeId, capacity: u32) -> Self {
        Self {
            id,
            kind,
            tier,
            node,
            capacity,
            used: 0,
            reserved: 0,
            assigned_orders: Vec::new(),
            queued_orders: Vec::new(),
            inbound_pods: Vec::new(),
        }
    }

    #[inline]
    pub fn has_capacity(&self, n: u32) -> bool {
        self.used + self.reserved + n <= self.capacity
    }

    /// Reserve `n` units of capacity for an about-to-be-allocated order.
    pub fn reserve_capacity(&mut self, n: u32) {
        debug_assert!(self.has_capacity(n), "station {:?} capacity exceeded", self.id);
        self.reserved += n;
    }

    /// Convert reserved capacity into used capacity once the order is
    /// actually being worked.
    pub fn commit_capacity(&mut self, n: u32) {
        debug_assert!(self.reserved >= n);
        self.reserved -= n;
        self.used += n;
    }

    pub fn release_capacity(&mut self, n: u32, was_reserved: bool) {
        if was_reserved {
            debug_assert!(self.reserved >= n);
            self.reserved -= n;
        } else {
            debug_assert!(self.used >= n);
            self.used -= n;
        }
    }
}
