use std::collections::HashMap;

use wh_core::{ItemId, NodeId, PodId, Rng, StationId, Tick};
use wh_model::{OrderStore, Pod, PodStore, Station, StationKind, StationStore};
use wh_select::{Backlog, HadodTable};

use crate::book::OrderBook;
use crate::config::OrderBookConfig;
use crate::hadod::HadodIndex;

fn pod(id: u32, items: &[(u32, u32)]) -> Pod {
    let contained: HashMap<ItemId, u32> = items.iter().map(|&(i, n)| (ItemId(i), n)).collect();
    Pod::new(PodId(id), 0, NodeId(0), contained)
}

fn station(capacity: u32) -> Station {
    Station::new(StationId(0), StationKind::Output, 0, NodeId(0), capacity)
}

fn rng() -> Rng {
    Rng::new(1)
}

#[test]
fn submit_classifies_by_due_time() {
    let mut store = OrderStore::new(vec![]);
    let late = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(10));
    let not_late = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(late, Tick(50));
    book.submit(not_late, Tick(50));

    assert_eq!(book.pending_late_count(), 1);
    assert_eq!(book.pending_not_late_count(), 1);
    assert!(book.is_pending(late));
    assert!(book.is_pending(not_late));
}

#[test]
fn recheck_late_promotes_orders_past_due_time() {
    let mut store = OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(10));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(id, Tick(0));
    assert_eq!(book.pending_not_late_count(), 1);

    book.recheck_late(Tick(20));
    assert_eq!(book.pending_not_late_count(), 0);
    assert_eq!(book.pending_late_count(), 1);
}

#[test]
fn fully_supplied_allocates_coverable_order_and_registers_items() {
    let mut store = OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 2)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(id, Tick(0));

    let mut s = station(4);
    let mut p = pod(0, &[(1, 2)]);
    let mut pods: Vec<&mut Pod> = vec![&mut p];

    let allocated = book.fully_supplied(&mut s, &mut pods);
    assert_eq!(allocated, vec![id]);
    assert!(!book.is_pending(id));
    assert_eq!(s.queued_orders, vec![id]);
    assert_eq!(s.reserved, 2);
    assert_eq!(p.count_registered(ItemId(1)), 2);
}

#[test]
fn fully_supplied_leaves_backlog_untouched_when_nothing_fits() {
    let mut store = OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 5)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(id, Tick(0));

    let mut s = station(4);
    let mut p = pod(0, &[(1, 1)]);
    let mut pods: Vec<&mut Pod> = vec![&mut p];

    let allocated = book.fully_supplied(&mut s, &mut pods);
    assert!(allocated.is_empty());
    assert!(book.is_pending(id));
    assert!(s.queued_orders.is_empty());
}

#[test]
fn allocate_then_deallocate_restores_backlog_and_capacity() {
    let mut store = OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 2)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(id, Tick(0));

    let mut s = station(4);
    book.allocate_order(id, &mut s);
    assert!(!book.is_pending(id));
    assert_eq!(s.reserved, 2);

    book.deallocate_order(id, &mut s, Tick(0));
    assert!(book.is_pending(id));
    assert_eq!(s.reserved, 0);
    assert!(s.queued_orders.is_empty());
}

#[test]
fn late_orders_enough_when_late_backlog_exceeds_remaining_capacity() {
    let mut store = OrderStore::new(vec![]);
    let a = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(5));
    let b = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(5));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(a, Tick(10));
    book.submit(b, Tick(10));

    let mut s = station(2);
    s.reserved = 2; // capacity fully claimed; only late backlog is considered
    assert!(book.late_orders_enough(&s));
}

#[test]
fn extra_decide_pending_orders_claims_against_new_pod_only() {
    let mut store = OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 3)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(id, Tick(0));

    let mut s = station(4);
    let mut new_pod = pod(0, &[(1, 3)]);
    let claimed = book.extra_decide_pending_orders(&mut s, &mut [], &mut new_pod);

    assert_eq!(claimed.len(), 3);
    assert!(claimed.iter().all(|r| r.order == id));
    assert_eq!(new_pod.count_registered(ItemId(1)), 3);
    assert!(!book.is_pending(id));
}

#[test]
fn fast_lane_promotes_order_coverable_by_nearest_pod() {
    let mut store = OrderStore::new(vec![]);
    let far_order = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100));
    let near_order = store.push(vec![(ItemId(2), 1)], Tick(1), Tick(100));

    let mut config = OrderBookConfig::default();
    config.fast_lane = true;
    let mut book = OrderBook::new(&store, config, rng());
    book.submit(far_order, Tick(0));
    book.submit(near_order, Tick(0));

    let mut s = station(4);
    let _ = far_order;

    let nearest_pod = pod(7, &[(2, 1)]);
    let nearest_first: Vec<(PodId, &Pod)> = vec![(PodId(7), &nearest_pod)];
    let promoted = book.fast_lane_promote(&mut s, &nearest_first);

    assert_eq!(promoted, Some(near_order));
    assert_eq!(s.queued_orders.first(), Some(&near_order));
}

#[test]
fn hadod_index_lists_only_pods_with_coverage() {
    let mut store = OrderStore::new(vec![]);
    let id = store.push(vec![(ItemId(1), 1)], Tick(0), Tick(100));

    let mut book = OrderBook::new(&store, OrderBookConfig::default(), rng());
    book.submit(id, Tick(0));

    let stations = StationStore::new(vec![station(4)]);
    let matching = pod(0, &[(1, 1)]);
    let empty = pod(1, &[]);
    let pods = PodStore::new(vec![matching, empty]);

    let index = HadodIndex::build(&book, &stations, &pods);
    let candidates = index.candidates(StationId(0));

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].0, PodId(0));
    assert_eq!(candidates[0].1.len(), 1);
}
