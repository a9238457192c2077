//! Unit tests for wh-select.

use std::collections::HashMap;

use wh_core::{ItemId, NodeId, OrderId, PodId, StationId, Tick};
use wh_graph::WaypointGraphBuilder;
use wh_model::{Order, OrderStore, Pod, Station, StationKind};
use wh_scorers::{NoPathEstimator, ScoreContext, ScorerConfig};

use crate::best_of::BestOf;
use crate::pod_set::reserve_pod_set_for_order;
use crate::possible_requests::{possible_requests, FilterMode};

fn graph_1() -> wh_graph::WaypointGraph {
    let mut b = WaypointGraphBuilder::new();
    b.add_node(wh_core::Point2D::new(0.0, 0.0));
    b.build()
}

fn bot() -> wh_model::Bot {
    wh_model::Bot::new(wh_core::BotId(0), 0, NodeId(0))
}

fn pod(id: u32, items: &[(u32, u32)]) -> Pod {
    let contained: HashMap<ItemId, u32> = items.iter().map(|&(i, n)| (ItemId(i), n)).collect();
    Pod::new(PodId(id), 0, NodeId(0), contained)
}

fn station() -> Station {
    Station::new(StationId(0), StationKind::Output, 0, NodeId(0), 4)
}

mod best_of_tests {
    use super::*;

    #[test]
    fn tie_on_every_criterion_keeps_first_seen() {
        let graph = graph_1();
        let b = bot();
        let pod_a = pod(0, &[]);
        let pod_b = pod(1, &[]);
        let s = station();
        let demand = HashMap::new();

        let mut best: BestOf<PodId> = BestOf::new(vec![ScorerConfig::Demand]);

        let ctx_a = ScoreContext {
            graph: &graph,
            bot: &b,
            pod: &pod_a,
            station: &s,
            now: Tick(0),
            relevant_orders: &[],
            global_demand: &demand,
            path_cost: &NoPathEstimator,
            random_draw: 0.0,
        };
        best.consider(PodId(0), &ctx_a);

        let ctx_b = ScoreContext { pod: &pod_b, ..ctx_a };
        best.consider(PodId(1), &ctx_b);

        assert_eq!(*best.best().unwrap(), PodId(0));
    }

    #[test]
    fn strictly_better_candidate_replaces_first_seen() {
        let graph = graph_1();
        let b = bot();
        let s = station();
        let demand = HashMap::new();
        let order = Order::new(OrderId(0), vec![(ItemId(1), 5)], Tick(0), Tick(100));
        let orders = [&order];

        let mut best: BestOf<PodId> = BestOf::new(vec![ScorerConfig::WorkAmount {
            value: wh_scorers::ValueMetric::Picks,
        }]);

        let weak_pod = pod(0, &[(1, 1)]);
        let strong_pod = pod(1, &[(1, 5)]);

        let base = ScoreContext {
            graph: &graph,
            bot: &b,
            pod: &weak_pod,
            station: &s,
            now: Tick(0),
            relevant_orders: &orders,
            global_demand: &demand,
            path_cost: &NoPathEstimator,
            random_draw: 0.0,
        };
        best.consider(PodId(0), &base);

        let stronger = ScoreContext { pod: &strong_pod, ..base };
        best.consider(PodId(1), &stronger);

        assert_eq!(*best.best().unwrap(), PodId(1)); // -5 beats -1
    }

    #[test]
    fn recycle_clears_the_round() {
        let graph = graph_1();
        let b = bot();
        let p = pod(0, &[]);
        let s = station();
        let demand = HashMap::new();
        let ctx = ScoreContext {
            graph: &graph,
            bot: &b,
            pod: &p,
            station: &s,
            now: Tick(0),
            relevant_orders: &[],
            global_demand: &demand,
            path_cost: &NoPathEstimator,
            random_draw: 0.0,
        };
        let mut best: BestOf<PodId> = BestOf::new(vec![ScorerConfig::Demand]);
        best.consider(PodId(0), &ctx);
        assert!(best.best().is_some());
        best.recycle();
        assert!(best.best().is_none());
        assert!(best.best_scores().is_empty());
    }
}

mod possible_requests_tests {
    use super::*;

    #[test]
    fn assigned_only_ignores_queued_orders() {
        let mut store = OrderStore::new(vec![]);
        store.push(vec![(ItemId(1), 2)], Tick(0), Tick(100));
        store.push(vec![(ItemId(1), 2)], Tick(0), Tick(100));

        let mut s = station();
        s.assigned_orders.push(OrderId(0));
        s.queued_orders.push(OrderId(1));

        let p = pod(0, &[(1, 10)]);
        let reqs = possible_requests(&p, &s, &store, FilterMode::AssignedOnly, &[]);
        assert_eq!(reqs.len(), 2); // only the assigned order's 2 units
        assert!(reqs.iter().all(|r| r.order == OrderId(0)));
    }

    #[test]
    fn complete_queued_mode_skips_partially_fittable_orders() {
        let mut store = OrderStore::new(vec![]);
        store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100)); // assigned, consumes 1
        store.push(vec![(ItemId(1), 10)], Tick(0), Tick(100)); // too big to fit fully
        store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100)); // fits fully

        let mut s = station();
        s.assigned_orders.push(OrderId(0));
        s.queued_orders.push(OrderId(1));
        s.queued_orders.push(OrderId(2));

        let p = pod(0, &[(1, 3)]); // 3 available total
        let reqs = possible_requests(&p, &s, &store, FilterMode::AssignedAndCompleteQueued, &[]);
        let orders_seen: Vec<OrderId> = reqs.iter().map(|r| r.order).collect();
        assert!(orders_seen.contains(&OrderId(0)));
        assert!(!orders_seen.contains(&OrderId(1)));
        assert!(orders_seen.contains(&OrderId(2)));
    }

    #[test]
    fn queued_equally_mode_admits_partial_orders() {
        let mut store = OrderStore::new(vec![]);
        store.push(vec![(ItemId(1), 10)], Tick(0), Tick(100));

        let mut s = station();
        s.queued_orders.push(OrderId(0));

        let p = pod(0, &[(1, 3)]);
        let reqs = possible_requests(&p, &s, &store, FilterMode::AssignedAndQueuedEqually, &[]);
        assert_eq!(reqs.len(), 3); // filled up to availability, order not fully coverable
    }

    #[test]
    fn already_requested_units_are_not_re_requested() {
        // Pod holds 3 of item A, but the order only needs 2; a first call
        // (simulating the dispatch that already happened) took both. A
        // second call with that result passed as `already` must not hand
        // the order's already-satisfied 2 units back out a second time,
        // even though the pod still shows 1 unit of raw availability.
        let mut store = OrderStore::new(vec![]);
        store.push(vec![(ItemId(1), 2)], Tick(0), Tick(100));

        let mut s = station();
        s.assigned_orders.push(OrderId(0));

        let p = pod(0, &[(1, 3)]);
        let first = possible_requests(&p, &s, &store, FilterMode::AssignedOnly, &[]);
        assert_eq!(first.len(), 2);

        let second = possible_requests(&p, &s, &store, FilterMode::AssignedOnly, &first);
        assert!(second.is_empty(), "order already got its full 2 units, residual pod stock isn't owed to it again");
    }
}

mod pod_set_tests {
    use super::*;

    #[test]
    fn greedily_assembles_minimal_covering_set() {
        // Two pods each holding 1 unit of A, order needs 2: both claimed.
        let p1 = pod(0, &[(1, 1)]);
        let p2 = pod(1, &[(1, 1)]);
        let order = Order::new(OrderId(0), vec![(ItemId(1), 2)], Tick(0), Tick(100));

        let claimed = reserve_pod_set_for_order(&order, &[&p1, &p2]);
        assert_eq!(claimed.len(), 2);
        assert!(claimed.contains(&PodId(0)));
        assert!(claimed.contains(&PodId(1)));
    }

    #[test]
    fn stops_as_soon_as_a_single_pod_suffices() {
        let small = pod(0, &[(1, 1)]);
        let big = pod(1, &[(1, 5)]);
        let order = Order::new(OrderId(0), vec![(ItemId(1), 3)], Tick(0), Tick(100));

        let claimed = reserve_pod_set_for_order(&order, &[&small, &big]);
        assert_eq!(claimed, vec![PodId(1)]);
    }
}
