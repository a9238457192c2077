//! Reservation table: per-node disjoint-interval index of future bot
//! occupancy on the waypoint graph.

use std::collections::HashMap;

use wh_core::{Interval, NodeId, Tick};

/// Per-node disjoint-interval set with point/interval queries and
/// careful-remove (only removes intervals that were actually added).
///
/// Cloning produces an independent deep copy — used by [`crate::Planner::schedule_init`]
/// to seed the speculative "scheduled" table from the committed one.
#[derive(Clone, Default)]
pub struct ReservationTable {
    by_node: HashMap<NodeId, Vec<Interval>>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to reserve `interval` at `node`.
    ///
    /// Returns `true` on success. If `interval` overlaps an existing
    /// reservation at `node`, the add is silently suppressed and `false` is
    /// returned (§4.1: "no reservation is ever partially applied" — tail
    /// reservations may legitimately collide when bots emerge from a
    /// station, so this is a normal, expected outcome, not an error).
    pub fn add(&mut self, node: NodeId, interval: Interval) -> bool {
        let slots = self.by_node.entry(node).or_default();
        if slots.iter().any(|existing| existing.overlaps(&interval)) {
            return false;
        }
        let pos = slots.partition_point(|existing| existing.start < interval.start);
        slots.insert(pos, interval);
        true
    }

    /// Remove `interval` from `node` if present exactly (careful-remove:
    /// only removes an interval that matches one previously added, never a
    /// partial overlap).
    pub fn remove(&mut self, node: NodeId, interval: Interval) {
        if let Some(slots) = self.by_node.get_mut(&node) {
            slots.retain(|existing| *existing != interval);
            if slots.is_empty() {
                self.by_node.remove(&node);
            }
        }
    }

    /// `true` if `node` is free throughout `interval`.
    pub fn is_free(&self, node: NodeId, interval: Interval) -> bool {
        match self.by_node.get(&node) {
            Some(slots) => !slots.iter().any(|existing| existing.overlaps(&interval)),
            None => true,
        }
    }

    /// `true` if `tick` at `node` is unoccupied (point query).
    pub fn is_free_at(&self, node: NodeId, tick: Tick) -> bool {
        self.is_free(node, Interval::new(tick, tick.offset(1)))
    }

    /// The start of a half-infinite tail reservation at `node`, if any.
    /// Used to estimate when a parking bot finishes parking.
    pub fn find_end_reservation(&self, node: NodeId) -> Option<Tick> {
        self.by_node
            .get(&node)?
            .iter()
            .find(|iv| iv.end == Tick(u64::MAX))
            .map(|iv| iv.start)
    }

    /// All currently held intervals at `node`, in ascending-start order.
    pub fn intervals_at(&self, node: NodeId) -> &[Interval] {
        self.by_node.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
