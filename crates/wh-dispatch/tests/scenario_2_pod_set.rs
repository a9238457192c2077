//! Pod-set mode: no single unused pod alone satisfies the order, so
//! Fully-Demand must claim a set of two, dispense one now, and stage the
//! other for the next bot request at the same station.

use std::collections::HashMap;

use wh_core::{ItemId, NodeId, Point2D, Rng, StationId, Tick};
use wh_graph::WaypointGraphBuilder;
use wh_model::{Bot, BotStore, BotTaskKind, OrderStore, Pod, PodStore, Station, StationKind, StationStore};
use wh_orders::{OrderBook, OrderBookConfig};
use wh_dispatch::{DispatchWorld, Engine, EngineConfig, ExtractStrategyKind, NoopObserver, TaskAssignOutcome};

fn line() -> (wh_graph::WaypointGraph, NodeId, NodeId, NodeId) {
    let mut b = WaypointGraphBuilder::new();
    let station = b.add_node(Point2D::new(0.0, 0.0));
    let p1 = b.add_node(Point2D::new(1.0, 0.0));
    let p2 = b.add_node(Point2D::new(2.0, 0.0));
    b.add_aisle(station, p1, 1.0);
    b.add_aisle(p1, p2, 1.0);
    (b.build(), station, p1, p2)
}

#[test]
fn pod_set_stages_the_second_pod_for_the_next_request() {
    let (graph, station_node, p1_node, p2_node) = line();

    let mut bots = BotStore::new(vec![
        Bot::new(wh_core::BotId(0), 0, station_node),
        Bot::new(wh_core::BotId(1), 0, station_node),
    ]);
    let mut pods = PodStore::new(vec![
        Pod::new(wh_core::PodId(0), 0, p1_node, HashMap::from([(ItemId(1), 1)])),
        Pod::new(wh_core::PodId(1), 0, p2_node, HashMap::from([(ItemId(1), 1)])),
    ]);
    let mut stations = StationStore::new(vec![Station::new(StationId(0), StationKind::Output, 0, station_node, 4)]);

    let mut order_store = OrderStore::new(vec![]);
    let order_id = order_store.push(vec![(ItemId(1), 2)], Tick(0), Tick(1_000));
    let mut book = OrderBook::new(&order_store, OrderBookConfig::default(), Rng::new(1));
    book.submit(order_id, Tick(0));

    let config = EngineConfig { extract_strategy: ExtractStrategyKind::FullyDemand, ..EngineConfig::default() };
    let mut engine = Engine::new(config).unwrap();
    let mut world = DispatchWorld {
        graph: &graph,
        bots: &mut bots,
        pods: &mut pods,
        stations: &mut stations,
        orders: &order_store,
        backlog: &mut book,
    };

    // First bot request: neither pod alone covers the order (each holds
    // only 1 of the 2 needed units), so Fully-Demand falls into pod-set
    // mode, claims both, and dispenses one immediately.
    let mut observer = NoopObserver;
    let first = engine.request_task(&mut world, &mut observer, wh_core::BotId(0), StationId(0), Tick(0));
    assert_eq!(first, TaskAssignOutcome::Enqueued);

    let first_pod = world.bots.get(wh_core::BotId(0)).carried_pod.expect("bot 0 carries a pod");
    assert!(first_pod == wh_core::PodId(0) || first_pod == wh_core::PodId(1));
    assert!(!world.backlog.is_pending(order_id), "allocate_order should have run once the whole set was claimed");

    // The leftover pod from the set was claimed (no longer unused) but not
    // yet carried by anyone — it must be staged, not dropped.
    let leftover = if first_pod == wh_core::PodId(0) { wh_core::PodId(1) } else { wh_core::PodId(0) };
    assert_eq!(world.pods.get(leftover).state, wh_model::PodState::Claimed);
    assert_eq!(world.pods.get(leftover).carrier, None);

    // Second bot request at the same station dispenses the staged pod
    // without re-scoring or re-claiming the order.
    let second = engine.request_task(&mut world, &mut observer, wh_core::BotId(1), StationId(0), Tick(1));
    assert_eq!(second, TaskAssignOutcome::Enqueued);
    assert_eq!(world.bots.get(wh_core::BotId(1)).carried_pod, Some(leftover));
    assert_eq!(world.pods.get(leftover).carrier, Some(wh_core::BotId(1)));
    assert_eq!(world.bots.get(wh_core::BotId(1)).task_kind, BotTaskKind::Extract);

    // The order was allocated exactly once across both requests.
    assert_eq!(world.stations.get(StationId(0)).queued_orders, vec![order_id]);
}
