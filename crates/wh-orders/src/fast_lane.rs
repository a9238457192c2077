//! Fast lane (§4.5): after an allocation round, try to find a backlog order
//! fully coverable by the single *nearest* inbound pod and push it to the
//! head of the station's queue.
//!
//! `wh-orders` has no dependency on `wh-graph`/`wh-planner`, so "nearest" is
//! the caller's business: the host passes inbound pods already sorted
//! nearest-first (mirrors the `Backlog`/`HadodTable` seam-trait decoupling
//! used between `wh-select` and this crate).

use wh_core::{OrderId, PodId};
use wh_model::{Pod, Station};

use crate::book::OrderBook;
use crate::config::TieBreaker;

impl OrderBook<'_> {
    /// `nearest_first` must be the ids of `station`'s inbound pods ordered
    /// nearest-to-farthest. Returns the order promoted, if any.
    pub fn fast_lane_promote(&mut self, station: &mut Station, nearest_first: &[(PodId, &Pod)]) -> Option<OrderId> {
        if !self.fast_lane_enabled() {
            return None;
        }
        let &(_, nearest_pod) = nearest_first.first()?;

        let candidates = self.candidates_with_tie_breaker(self.fast_lane_tie_breaker());
        let oid = candidates.into_iter().find(|&oid| {
            let order = self.order_ref(oid);
            order.positions.iter().all(|&(item, n)| nearest_pod.count_available(item) >= n)
        })?;

        station.queued_orders.retain(|&id| id != oid);
        station.queued_orders.insert(0, oid);
        Some(oid)
    }
}
