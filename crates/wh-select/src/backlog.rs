//! `Backlog` — the order-book operations the pod-selection strategies need
//! (§4.4, §4.5).
//!
//! `wh-select` does not depend on `wh-orders`: the concrete pending-order
//! sets and allocation bookkeeping live there, while the strategies in this
//! crate only need the handful of operations below. This mirrors the
//! `PathEstimator` split between `wh-scorers` and `wh-planner` — a narrow
//! trait at the seam instead of a crate dependency cycle (`wh-orders`
//! strategies are themselves invoked from `wh-dispatch`, which depends on
//! both crates).

use std::collections::HashMap;

use wh_core::{OrderId, PodId, StationId};
use wh_model::{ExtractRequest, Order, Pod, Station};

/// Order-backlog operations a Fully-Demand-style strategy needs.
pub trait Backlog {
    /// `true` if the late backlog alone already has enough volume that the
    /// not-late backlog should be skipped this round (resolved per-call by
    /// the implementation, §9 "lateOrdersEnough maintained by OrderBook").
    fn late_orders_enough(&self, station: &Station) -> bool;

    /// Backlog order ids in priority order for this station: late backlog
    /// first unless [`Backlog::late_orders_enough`], each ordered by
    /// submission time.
    fn candidates(&self, station: &Station) -> Vec<OrderId>;

    fn order(&self, id: OrderId) -> &Order;

    /// Allocate every backlog order fully coverable by `station`'s own
    /// inbound pods (no pod movement). Returns the allocated order ids.
    fn fully_supplied(&mut self, station: &mut Station, pods: &mut [&mut Pod]) -> Vec<OrderId>;

    /// Like [`Backlog::fully_supplied`], but `new_pod`'s availability also
    /// counts toward the station's remaining coverage. Returns the extract
    /// requests claimed against `new_pod`.
    ///
    /// # Panics
    /// Implementations panic if no order ends up assigned — callers must
    /// first confirm at least one fulfillable order exists (§4.5).
    fn extra_decide_pending_orders(
        &mut self,
        station: &mut Station,
        pods: &mut [&mut Pod],
        new_pod: &mut Pod,
    ) -> Vec<ExtractRequest>;

    /// Pod-set case: assign exactly `necessary_order`, distributing its
    /// requests across `station`'s inbound pods first, then `new_pods`.
    /// The returned map has no empty entries (§4.5 invariant).
    fn extra_decide_pending_order(
        &mut self,
        station: &mut Station,
        pods: &mut [&mut Pod],
        necessary_order: OrderId,
        new_pods: &mut [&mut Pod],
    ) -> HashMap<PodId, Vec<ExtractRequest>>;

    /// The oldest backlog order fulfillable by some subset of `unused_pods`,
    /// if any (§4.4 pod-set mode, §4.6 step 5).
    fn oldest_fulfillable(&self, unused_pods: &[&Pod]) -> Option<OrderId>;

    /// Move `order` from backlog into `station.queued_orders`, reserving its
    /// capacity and emitting the invalidation event on-the-fly caches watch
    /// for (§4.5).
    fn allocate_order(&mut self, order: OrderId, station: &mut Station);

    /// Bumped by every `allocate_order` call — the signal `wh-dispatch`
    /// polls once per tick to know a new order was assigned to some
    /// station since the last check, which is what should make an
    /// in-flight bot's carried pod worth re-examining for extra requests
    /// (§4.7 on-the-fly augmentation).
    fn generation(&self) -> u64;
}

/// HADOD's precomputed `_Ziops[station][pod]` table (§4.4, §9).
pub trait HadodTable {
    /// Unused pods with precomputed extract requests for `station`,
    /// snapshotted by the implementation before the caller iterates — the
    /// table is mutated in place as pods are claimed elsewhere, and
    /// iterating a live view while another call drains it would produce
    /// non-deterministic removal order (§9).
    fn candidates(&self, station: StationId) -> Vec<(PodId, Vec<ExtractRequest>)>;
}
