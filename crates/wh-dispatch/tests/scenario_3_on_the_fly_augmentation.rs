//! On-the-fly augmentation (§4.7) and fully-supplied discovery (§4.5): a bot
//! is already en route with an Extract task carrying more inventory than
//! its own order needs. Pod `P` holds `{A:3, B:1}` but the first task only
//! asked for `{A:2}` (order `O1`'s full need) — the extra `A` and the `B`
//! sit unclaimed on the pod. A second order `O2={A:1, B:1}` is then
//! submitted; rather than telling the backlog by fiat that `O2` is
//! allocated, a second bot's own task request at the same station is what
//! drives `FullyDemandStrategy`'s own `fully_supplied` step to discover,
//! from the station's real `inbound_pods`, that `P` alone already covers
//! it.

use std::collections::HashMap;

use wh_core::{ItemId, NodeId, Point2D, Rng, StationId, Tick};
use wh_graph::WaypointGraphBuilder;
use wh_model::{Bot, BotStore, OrderStore, Pod, PodStore, Station, StationKind, StationStore, Task};
use wh_orders::{OrderBook, OrderBookConfig};
use wh_select::Backlog;
use wh_dispatch::{DispatchWorld, Engine, EngineConfig, ExtractStrategyKind, NoopObserver, TaskAssignOutcome};

fn one_node_graph() -> (wh_graph::WaypointGraph, NodeId) {
    let mut b = WaypointGraphBuilder::new();
    let n = b.add_node(Point2D::new(0.0, 0.0));
    (b.build(), n)
}

#[test]
fn inbound_pod_absorbs_a_second_order_discovered_via_fully_supplied() {
    let (graph, node) = one_node_graph();

    let mut bots =
        BotStore::new(vec![Bot::new(wh_core::BotId(0), 0, node), Bot::new(wh_core::BotId(1), 0, node)]);
    let mut pods = PodStore::new(vec![Pod::new(
        wh_core::PodId(0),
        0,
        node,
        HashMap::from([(ItemId(1), 3), (ItemId(2), 1)]),
    )]);
    let mut stations = StationStore::new(vec![Station::new(StationId(0), StationKind::Output, 0, node, 10)]);

    let mut order_store = OrderStore::new(vec![]);
    let o1 = order_store.push(vec![(ItemId(1), 2)], Tick(0), Tick(1_000));
    let o2 = order_store.push(vec![(ItemId(1), 1), (ItemId(2), 1)], Tick(0), Tick(1_000));
    let mut book = OrderBook::new(&order_store, OrderBookConfig::default(), Rng::new(1));
    book.submit(o1, Tick(0));

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

    // The one pod alone fully supplies O1; the task only carries 2 A,
    // leaving 1 A and 1 B on the pod genuinely unclaimed. Dispatching it
    // also lists it on the station's own `inbound_pods`.
    let outcome = engine.request_task(&mut world, &mut observer, wh_core::BotId(0), StationId(0), Tick(0));
    assert_eq!(outcome, TaskAssignOutcome::Enqueued);
    assert_eq!(world.stations.get(StationId(0)).inbound_pods, vec![wh_core::PodId(0)]);
    match engine.dispatch().task_for(wh_core::BotId(0)).expect("task enqueued") {
        Task::Extract { requests, .. } => {
            assert_eq!(requests.len(), 2);
            assert!(requests.iter().all(|r| r.item == ItemId(1) && r.order == o1));
        }
        other => panic!("expected an Extract task, got {other:?}"),
    }

    // O2 lands on the backlog — nothing yet allocates it.
    world.backlog.submit(o2, Tick(0));
    assert!(world.backlog.is_pending(o2));

    // Bot 1's own request at the same station is what runs
    // `FullyDemandStrategy`'s fully-supplied preamble step, which resolves
    // station 0's real `inbound_pods` (just pod 0, carried by bot 0) and
    // discovers O2 is fully coverable from its remaining availability —
    // the engine decides this itself, it isn't told.
    let second = engine.request_task(&mut world, &mut observer, wh_core::BotId(1), StationId(0), Tick(0));
    assert!(!world.backlog.is_pending(o2), "fully_supplied should have discovered and allocated O2");
    assert!(world.stations.get(StationId(0)).queued_orders.contains(&o2));

    // Bot 1 itself gets nothing: pod 0 is the only pod and it's already
    // claimed, so no unused pod remains for a fresh pick and no pod-set
    // fallback applies either.
    assert_eq!(second, TaskAssignOutcome::NoTask);

    // The discovery drained pod 0's remaining availability directly as
    // part of resolving coverability, independent of bot 0's own task
    // still only listing O1's two requests.
    assert_eq!(world.pods.get(wh_core::PodId(0)).count_available(ItemId(1)), 0);
    assert_eq!(world.pods.get(wh_core::PodId(0)).count_available(ItemId(2)), 0);
    match engine.dispatch().task_for(wh_core::BotId(0)).expect("task still in flight") {
        Task::Extract { requests, .. } => {
            assert_eq!(requests.len(), 2, "O2's units aren't requested by name against any bot yet");
        }
        other => panic!("expected an Extract task, got {other:?}"),
    }
}
