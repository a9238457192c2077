use std::collections::HashMap;

use wh_core::{BotId, ItemId, NodeId, PodId, Rng, StationId, Tick};
use wh_graph::WaypointGraphBuilder;
use wh_model::{Bot, BotStore, Pod, PodStore, Station, StationKind, StationStore};
use wh_orders::{OrderBook, OrderBookConfig};
use wh_planner::{Planner, PlannerConfig};
use wh_select::Backlog;

use crate::bots::{collect_available_bots, AvailableBot};
use crate::config::SaConfig;
use crate::optimizer::{Optimizer, UpdateOutcome};
use crate::space::{greedy_order_set, search_point_for_pod};

fn graph() -> wh_graph::WaypointGraph {
    let mut b = WaypointGraphBuilder::new();
    b.add_node(wh_core::Point2D::new(0.0, 0.0));
    b.build()
}

fn pod(id: u32, items: &[(u32, u32)]) -> Pod {
    let contained: HashMap<ItemId, u32> = items.iter().map(|&(i, n)| (ItemId(i), n)).collect();
    Pod::new(PodId(id), 0, NodeId(0), contained)
}

fn station(capacity: u32) -> Station {
    Station::new(StationId(0), StationKind::Output, 0, NodeId(0), capacity)
}

#[test]
fn available_bots_splits_by_task_kind() {
    let mut bots = BotStore::new(vec![Bot::new(BotId(0), 0, NodeId(0)), Bot::new(BotId(1), 0, NodeId(0))]);
    bots.get_mut(BotId(1)).task_kind = wh_model::BotTaskKind::Extract;

    let planner = Planner::new(PlannerConfig::default());
    let available = collect_available_bots(&bots, &planner, Tick(10));

    assert_eq!(available.len(), 1);
    assert_eq!(available[0].bot, BotId(0));
    assert_eq!(available[0].ready_at, Tick(10));
}

#[test]
fn greedy_order_set_picks_only_coverable_orders_in_order() {
    let mut store = wh_model::OrderStore::new(vec![]);
    let small = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100));
    let big = store.push(vec![(ItemId(1), 5)], Tick(0), Tick(100));

    let book = OrderBook::new(&store, OrderBookConfig::default(), Rng::new(1));
    let remaining: HashMap<ItemId, u32> = [(ItemId(1), 2)].into_iter().collect();

    let (picked, item_count) = greedy_order_set(&[small, big], &book, remaining);
    assert_eq!(picked, vec![small]);
    assert_eq!(item_count, 1);
}

#[test]
fn search_point_for_pod_requires_full_coverage() {
    let mut store = wh_model::OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 2)], Tick(0), Tick(100));
    let mut book = OrderBook::new(&store, OrderBookConfig::default(), Rng::new(1));
    book.submit(id, Tick(0));

    let s = station(4);
    let candidates = book.candidates(&s);

    let full = pod(0, &[(1, 2)]);
    let partial = pod(1, &[(1, 1)]);

    assert!(search_point_for_pod(&candidates, &book, &full).is_some());
    assert!(search_point_for_pod(&candidates, &book, &partial).is_none());
}

#[test]
fn update_returns_no_eligible_bots_when_none_idle() {
    let graph = graph();
    let mut planner = Planner::new(PlannerConfig::default());
    let mut store = wh_model::OrderStore::new(vec![]);
    let mut book = OrderBook::new(&store, OrderBookConfig::default(), Rng::new(1));
    let mut stations = StationStore::new(vec![station(4)]);
    let mut pods = PodStore::new(vec![pod(0, &[(1, 1)])]);
    let mut bots = BotStore::new(vec![Bot::new(BotId(0), 0, NodeId(0))]);
    bots.get_mut(BotId(0)).task_kind = wh_model::BotTaskKind::Extract;

    let mut rng = Rng::new(1);
    let mut pending = HashMap::new();
    let mut opt = Optimizer::new(SaConfig::default());

    let (outcome, assignments) = opt.update(
        &graph, &mut planner, &mut book, &mut stations, &mut pods, &bots, Tick(0), &mut rng, &mut pending,
    );

    assert_eq!(outcome, UpdateOutcome::NoEligibleBots);
    assert!(assignments.is_empty());
}

#[test]
fn update_emits_assignment_for_single_fulfillable_order() {
    let graph = graph();
    let mut planner = Planner::new(PlannerConfig::default());
    let mut store = wh_model::OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), Rng::new(1));
    book.submit(id, Tick(0));

    let mut stations = StationStore::new(vec![station(4)]);
    let mut pods = PodStore::new(vec![pod(0, &[(1, 1)])]);
    let bots = BotStore::new(vec![Bot::new(BotId(0), 0, NodeId(0))]);

    let mut rng = Rng::new(1);
    let mut pending = HashMap::new();
    let mut opt = Optimizer::new(SaConfig { greedy_method: true, ..SaConfig::default() });

    let (outcome, assignments) = opt.update(
        &graph, &mut planner, &mut book, &mut stations, &mut pods, &bots, Tick(0), &mut rng, &mut pending,
    );

    assert_eq!(outcome, UpdateOutcome::Ran);
    assert_eq!(assignments.len(), 1);
    let a = &assignments[0];
    assert_eq!(a.station, StationId(0));
    assert_eq!(a.pod, PodId(0));
    assert_eq!(a.pod_requests.len(), 1);
    assert!(!book.is_pending(id));
}

#[test]
fn update_exits_early_when_no_station_has_capacity() {
    let graph = graph();
    let mut planner = Planner::new(PlannerConfig::default());
    let store = wh_model::OrderStore::new(vec![]);
    let mut book = OrderBook::new(&store, OrderBookConfig::default(), Rng::new(1));

    let mut full_station = station(2);
    full_station.reserved = 2;
    let mut stations = StationStore::new(vec![full_station]);
    let mut pods = PodStore::new(vec![]);
    let bots = BotStore::new(vec![Bot::new(BotId(0), 0, NodeId(0))]);

    let mut rng = Rng::new(1);
    let mut pending = HashMap::new();
    let mut opt = Optimizer::new(SaConfig::default());

    let (outcome, assignments) = opt.update(
        &graph, &mut planner, &mut book, &mut stations, &mut pods, &bots, Tick(0), &mut rng, &mut pending,
    );

    assert_eq!(outcome, UpdateOutcome::NoCandidateStations);
    assert!(assignments.is_empty());
}

#[test]
fn available_bot_copy_fields_round_trip() {
    let b = AvailableBot { bot: BotId(3), ready_at: Tick(7), start: NodeId(2) };
    let c = b;
    assert_eq!(b.bot, c.bot);
}
