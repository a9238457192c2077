//! Single bot, single pod, single order, through the full `Engine`.
//!
//! A 4x4 grid, station at (3,3), one pod at (0,0) holding `{A:2}`, one bot
//! at (0,3), one order for `{A:2}`. The planner should find a path,
//! Fully-Demand should score the only pod as able to satisfy the whole
//! order alone, `allocate_order` should move the order into the station's
//! queue, and an Extract task with both requests should land on the bot —
//! no pod-set mode involved.

use std::collections::HashMap;

use wh_core::{ItemId, NodeId, Point2D, Rng, StationId, Tick};
use wh_graph::WaypointGraphBuilder;
use wh_model::{Bot, BotStore, BotTaskKind, OrderStore, Pod, PodStore, Station, StationKind, StationStore};
use wh_orders::{OrderBook, OrderBookConfig};
use wh_dispatch::{DispatchWorld, Engine, EngineConfig, ExtractStrategyKind, NoopObserver, TaskAssignOutcome};

/// 4x4 grid, node id = y * 4 + x, every orthogonal neighbor connected.
fn grid() -> (wh_graph::WaypointGraph, impl Fn(u32, u32) -> NodeId) {
    let mut b = WaypointGraphBuilder::new();
    let mut nodes = [[NodeId(0); 4]; 4];
    for y in 0..4u32 {
        for x in 0..4u32 {
            nodes[y as usize][x as usize] = b.add_node(Point2D::new(x as f64, y as f64));
        }
    }
    for y in 0..4u32 {
        for x in 0..4u32 {
            if x + 1 < 4 {
                b.add_aisle(nodes[y as usize][x as usize], nodes[y as usize][(x + 1) as usize], 1.0);
            }
            if y + 1 < 4 {
                b.add_aisle(nodes[y as usize][x as usize], nodes[(y + 1) as usize][x as usize], 1.0);
            }
        }
    }
    let graph = b.build();
    (graph, move |x, y| nodes[y as usize][x as usize])
}

#[test]
fn single_pod_fully_supplies_the_only_order() {
    let (graph, at) = grid();

    let mut bots = BotStore::new(vec![Bot::new(wh_core::BotId(0), 0, at(0, 3))]);
    let mut pods = PodStore::new(vec![Pod::new(
        wh_core::PodId(0),
        0,
        at(0, 0),
        HashMap::from([(ItemId(1), 2)]),
    )]);
    let mut stations = StationStore::new(vec![Station::new(StationId(0), StationKind::Output, 0, at(3, 3), 4)]);

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

    let mut observer = NoopObserver;
    let outcome = engine.request_task(&mut world, &mut observer, wh_core::BotId(0), StationId(0), Tick(0));

    assert_eq!(outcome, TaskAssignOutcome::Enqueued);
    assert_eq!(world.bots.get(wh_core::BotId(0)).task_kind, BotTaskKind::Extract);
    assert_eq!(world.bots.get(wh_core::BotId(0)).carried_pod, Some(wh_core::PodId(0)));

    let task = engine.dispatch().task_for(wh_core::BotId(0)).expect("task enqueued");
    match task {
        wh_model::Task::Extract { pod, requests, .. } => {
            assert_eq!(*pod, wh_core::PodId(0));
            assert_eq!(requests.len(), 2);
            assert!(requests.iter().all(|r| r.item == ItemId(1) && r.order == order_id));
        }
        other => panic!("expected an Extract task, got {other:?}"),
    }

    assert!(!world.backlog.is_pending(order_id));
    assert_eq!(world.stations.get(StationId(0)).queued_orders, vec![order_id]);
}
