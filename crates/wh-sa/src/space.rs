//! Per-station search spaces: candidate `(pod, orders-it-would-fulfill)`
//! points ranked by projected item-throughput rate, with weighted sampling
//! for the Metropolis loop (§4.6 step 4).
//!
//! Coverage here is judged from the candidate pod's own availability only.
//! `wh-select`'s existing Fully-Demand and Simulated-Annealing strategies
//! already treat a station's `inbound_pods` as out of scope for a single
//! allocation call (`fully_supplied(station, &mut [])` — see
//! `wh_select::strategy`), deferring that contribution to on-the-fly
//! augmentation once pods are actually present. Search spaces here follow
//! the same line: they rank pods by what each pod alone could fulfill,
//! keeping `create_solution`'s real draining exactly consistent with the
//! ranking that picked it.

use std::collections::HashMap;

use wh_core::{ItemId, OrderId, Rng};
use wh_model::Pod;
use wh_select::Backlog;

/// One candidate pod and the backlog orders it alone would let a station
/// fully fulfill.
#[derive(Clone, Debug)]
pub struct SearchPoint {
    pub pod: wh_core::PodId,
    pub orders: Vec<OrderId>,
    pub item_count: u32,
    pub rate: f64,
}

/// A station's ranked, weighted candidate points.
#[derive(Clone, Debug, Default)]
pub struct SearchSpace {
    pub points: Vec<SearchPoint>,
}

impl SearchSpace {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Sample a point index, weighted by rate (§4.6 step 4: "convert the
    /// rate distribution to a CDF ... for weighted sampling").
    pub fn sample(&self, rng: &mut Rng) -> Option<usize> {
        let weights: Vec<f64> = self.points.iter().map(|p| p.rate).collect();
        rng.weighted_index(&weights)
    }

    pub fn point_for_pod(&self, pod: wh_core::PodId) -> Option<&SearchPoint> {
        self.points.iter().find(|p| p.pod == pod)
    }
}

/// Greedily pick, in `candidate_orders` order, every order fully coverable
/// out of `remaining` — the shared overlap check used both to build search
/// points and to confirm a `create_solution` call.
pub fn greedy_order_set<B: Backlog>(
    candidate_orders: &[OrderId],
    backlog: &B,
    mut remaining: HashMap<ItemId, u32>,
) -> (Vec<OrderId>, u32) {
    let mut picked = Vec::new();
    let mut item_count = 0u32;
    for &oid in candidate_orders {
        let order = backlog.order(oid);
        let coverable = order
            .positions
            .iter()
            .all(|&(item, n)| remaining.get(&item).copied().unwrap_or(0) >= n);
        if !coverable {
            continue;
        }
        for &(item, n) in &order.positions {
            *remaining.get_mut(&item).unwrap() -= n;
        }
        item_count += order.total_positions();
        picked.push(oid);
    }
    (picked, item_count)
}

/// A pod's own available inventory, keyed by item.
pub fn pod_availability(pod: &Pod) -> HashMap<ItemId, u32> {
    pod.item_descriptions_contained().map(|(item, _)| (item, pod.count_available(item))).collect()
}

/// Build the candidate point for `pod` at a station, given that station's
/// backlog candidates in priority order. `None` if `pod` alone cannot fully
/// cover any of them.
pub fn search_point_for_pod<B: Backlog>(
    candidate_orders: &[OrderId],
    backlog: &B,
    pod: &Pod,
) -> Option<SearchPoint> {
    let (picked, item_count) = greedy_order_set(candidate_orders, backlog, pod_availability(pod));
    if picked.is_empty() {
        return None;
    }
    Some(SearchPoint { pod: pod.id, orders: picked, item_count, rate: 0.0 })
}
