//! `OrderBook` — the fully-supplied order manager (§4.5).
//!
//! Membership in `pending_late`/`pending_not_late` is tracked here; the
//! `Order` data itself lives in `wh_model::OrderStore`, owned by whoever
//! constructs the book (mirrors `PodStore` owning pods while `wh-select`
//! only ever sees ids — see `wh_model::store`'s module doc).

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};

use wh_core::{ItemId, OrderId, PodId, Rng, Tick};
use wh_model::{ExtractRequest, Order, OrderStore, Pod, Station};
use wh_select::Backlog;

use crate::config::{OrderBookConfig, TieBreaker};

pub struct OrderBook<'a> {
    orders: &'a OrderStore,
    pending_late: BTreeSet<(Tick, OrderId)>,
    pending_not_late: BTreeSet<(Tick, OrderId)>,
    pending_ids: HashSet<OrderId>,
    config: OrderBookConfig,
    rng: RefCell<Rng>,
    /// Bumped on every allocation — the seam `wh-dispatch`'s on-the-fly
    /// augmentation polls to know the situation-investigated flags should
    /// be cleared (§4.7).
    generation: u64,
}

impl<'a> OrderBook<'a> {
    pub fn new(orders: &'a OrderStore, config: OrderBookConfig, rng: Rng) -> Self {
        Self {
            orders,
            pending_late: BTreeSet::new(),
            pending_not_late: BTreeSet::new(),
            pending_ids: HashSet::new(),
            config,
            rng: RefCell::new(rng),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Place `id` into the appropriate backlog based on lateness at `now`.
    pub fn submit(&mut self, id: OrderId, now: Tick) {
        let order = self.orders.get(id);
        let key = (order.time_placed, id);
        if order.is_late(now) {
            self.pending_late.insert(key);
        } else {
            self.pending_not_late.insert(key);
        }
        self.pending_ids.insert(id);
    }

    /// Re-evaluate lateness for every pending order, promoting any
    /// `pending_not_late` order that has crossed its due time. Called once
    /// per tick by the host engine.
    pub fn recheck_late(&mut self, now: Tick) {
        let crossed: Vec<(Tick, OrderId)> = self
            .pending_not_late
            .iter()
            .copied()
            .filter(|&(_, id)| self.orders.get(id).is_late(now))
            .collect();
        for key in crossed {
            self.pending_not_late.remove(&key);
            self.pending_late.insert(key);
        }
    }

    pub fn is_pending(&self, id: OrderId) -> bool {
        self.pending_ids.contains(&id)
    }

    pub fn pending_late_count(&self) -> usize {
        self.pending_late.len()
    }

    pub fn pending_not_late_count(&self) -> usize {
        self.pending_not_late.len()
    }

    /// Restore `order` to its backlog and give the station its capacity
    /// back (round-trip inverse of `allocate_order`, §8).
    pub fn deallocate_order(&mut self, id: OrderId, station: &mut Station, now: Tick) {
        let order = self.orders.get(id);
        station.release_capacity(order.total_positions(), true);
        station.queued_orders.retain(|&oid| oid != id);
        station.assigned_orders.retain(|&oid| oid != id);
        let key = (order.time_placed, id);
        if order.is_late(now) {
            self.pending_late.insert(key);
        } else {
            self.pending_not_late.insert(key);
        }
        self.pending_ids.insert(id);
    }

    fn remove_from_backlog(&mut self, id: OrderId) {
        let order = self.orders.get(id);
        let key = (order.time_placed, id);
        self.pending_late.remove(&key);
        self.pending_not_late.remove(&key);
        self.pending_ids.remove(&id);
    }

    fn apply_tie_breaker(&self, mut ids: Vec<OrderId>, tie_breaker: TieBreaker) -> Vec<OrderId> {
        match tie_breaker {
            TieBreaker::Fcfs => ids,
            TieBreaker::EarliestDueTime => {
                ids.sort_by_key(|&id| self.orders.get(id).due_time);
                ids
            }
            TieBreaker::Random => {
                self.rng.borrow_mut().shuffle(&mut ids);
                ids
            }
        }
    }

    fn late_ids(&self) -> Vec<OrderId> {
        self.apply_tie_breaker(
            self.pending_late.iter().map(|&(_, id)| id).collect(),
            self.config.tie_breaker,
        )
    }

    fn not_late_ids(&self) -> Vec<OrderId> {
        self.apply_tie_breaker(
            self.pending_not_late.iter().map(|&(_, id)| id).collect(),
            self.config.tie_breaker,
        )
    }

    /// All backlog ids, late-first, ignoring any particular station's
    /// capacity — used by `oldest_fulfillable` (§4.4 pod-set mode, §4.6
    /// step 5) where no station context is available.
    fn all_ids_late_first(&self) -> Vec<OrderId> {
        let mut ids = self.late_ids();
        ids.extend(self.not_late_ids());
        ids
    }

    pub(crate) fn order_ref(&self, id: OrderId) -> &Order {
        self.orders.get(id)
    }

    pub(crate) fn fast_lane_enabled(&self) -> bool {
        self.config.fast_lane
    }

    pub(crate) fn fast_lane_tie_breaker(&self) -> TieBreaker {
        self.config.fast_lane_tie_breaker
    }

    /// Backlog ids, late-first, each partition ordered by `tie_breaker`
    /// rather than the book's configured default — used by the fast lane,
    /// which has its own tie-breaker setting.
    pub(crate) fn candidates_with_tie_breaker(&self, tie_breaker: TieBreaker) -> Vec<OrderId> {
        let mut ids = self.apply_tie_breaker(self.pending_late.iter().map(|&(_, id)| id).collect(), tie_breaker);
        ids.extend(self.apply_tie_breaker(self.pending_not_late.iter().map(|&(_, id)| id).collect(), tie_breaker));
        ids
    }

    fn coverable(order: &Order, supply: impl Fn(ItemId) -> u32) -> bool {
        order.positions.iter().all(|&(item, n)| supply(item) >= n)
    }

    /// Drain `required` units of `item` from `pods` in order, returning the
    /// units actually taken and registering them on whichever pod supplied
    /// them.
    fn drain_from(pods: &mut [&mut Pod], item: ItemId, required: u32) -> u32 {
        let mut need = required;
        for pod in pods.iter_mut() {
            if need == 0 {
                break;
            }
            let take = need.min(pod.count_available(item));
            if take > 0 {
                pod.register_item(item, take);
                need -= take;
            }
        }
        required - need
    }
}

impl Backlog for OrderBook<'_> {
    fn late_orders_enough(&self, station: &Station) -> bool {
        let remaining = station.capacity.saturating_sub(station.used + station.reserved);
        remaining == 0 || self.pending_late.len() as u32 >= remaining
    }

    fn candidates(&self, station: &Station) -> Vec<OrderId> {
        let late = self.late_ids();
        if self.late_orders_enough(station) {
            return late;
        }
        if self.config.late_before_match {
            let mut combined = late;
            combined.extend(self.not_late_ids());
            combined
        } else {
            self.apply_tie_breaker(self.all_ids_late_first(), self.config.tie_breaker)
        }
    }

    fn order(&self, id: OrderId) -> &Order {
        self.orders.get(id)
    }

    fn fully_supplied(&mut self, station: &mut Station, pods: &mut [&mut Pod]) -> Vec<OrderId> {
        let mut allocated = Vec::new();
        loop {
            let picked = self.candidates(station).into_iter().find(|&oid| {
                let order = self.orders.get(oid);
                Self::coverable(order, |item| pods.iter().map(|p| p.count_available(item)).sum())
            });
            let Some(oid) = picked else { break };

            let positions = self.orders.get(oid).positions.clone();
            for (item, required) in positions {
                let taken = Self::drain_from(pods, item, required);
                if taken != required {
                    log::error!(
                        "fully_supplied: order {:?} under-covered after candidate check, item {item:?}, took {taken}/{required}, pods: {:?}",
                        self.orders.get(oid),
                        pods.iter().map(|p| (p.id, p.count_available(item))).collect::<Vec<_>>(),
                    );
                }
                debug_assert_eq!(taken, required, "fully_supplied: order {oid:?} under-covered after candidate check");
            }
            self.allocate_order(oid, station);
            allocated.push(oid);
        }
        allocated
    }

    fn extra_decide_pending_orders(
        &mut self,
        station: &mut Station,
        pods: &mut [&mut Pod],
        new_pod: &mut Pod,
    ) -> Vec<ExtractRequest> {
        let picked = self.candidates(station).into_iter().find(|&oid| {
            let order = self.orders.get(oid);
            Self::coverable(order, |item| {
                pods.iter().map(|p| p.count_available(item)).sum::<u32>() + new_pod.count_available(item)
            })
        });
        let oid = picked.expect("extra_decide_pending_orders: caller must guarantee a fulfillable order exists");

        let positions = self.orders.get(oid).positions.clone();
        let mut claimed = Vec::new();
        for (item, required) in positions {
            let from_pods = Self::drain_from(pods, item, required);
            let remaining = required - from_pods;
            let from_new = remaining.min(new_pod.count_available(item));
            if from_new > 0 {
                new_pod.register_item(item, from_new);
                for _ in 0..from_new {
                    claimed.push(ExtractRequest { item, order: oid, station: Some(station.id) });
                }
            }
            if from_pods + from_new != required {
                log::error!(
                    "extra_decide_pending_orders: order {:?} under-covered by pods + new_pod, item {item:?}, got {}/{required}, new_pod: {new_pod:?}",
                    self.orders.get(oid),
                    from_pods + from_new,
                );
            }
            debug_assert_eq!(from_pods + from_new, required, "order {oid:?} under-covered by pods + new_pod");
        }
        self.allocate_order(oid, station);
        claimed
    }

    fn extra_decide_pending_order(
        &mut self,
        station: &mut Station,
        pods: &mut [&mut Pod],
        necessary_order: OrderId,
        new_pods: &mut [&mut Pod],
    ) -> HashMap<PodId, Vec<ExtractRequest>> {
        let positions = self.orders.get(necessary_order).positions.clone();
        let mut out: HashMap<PodId, Vec<ExtractRequest>> = HashMap::new();

        for (item, required) in positions {
            let mut need = required;
            for pod in pods.iter_mut().chain(new_pods.iter_mut()) {
                if need == 0 {
                    break;
                }
                let take = need.min(pod.count_available(item));
                if take > 0 {
                    pod.register_item(item, take);
                    let entry = out.entry(pod.id).or_default();
                    for _ in 0..take {
                        entry.push(ExtractRequest { item, order: necessary_order, station: Some(station.id) });
                    }
                    need -= take;
                }
            }
            if need != 0 {
                log::error!(
                    "extra_decide_pending_order: order {:?} under-covered in pod-set allocation, item {item:?}, {need} remaining, pods: {:?}, new_pods: {:?}",
                    self.orders.get(necessary_order),
                    pods.iter().map(|p| (p.id, p.count_available(item))).collect::<Vec<_>>(),
                    new_pods.iter().map(|p| (p.id, p.count_available(item))).collect::<Vec<_>>(),
                );
            }
            debug_assert_eq!(need, 0, "order {necessary_order:?} under-covered in pod-set allocation");
        }
        self.allocate_order(necessary_order, station);
        out
    }

    fn oldest_fulfillable(&self, unused_pods: &[&Pod]) -> Option<OrderId> {
        self.all_ids_late_first().into_iter().find(|&oid| {
            let order = self.orders.get(oid);
            Self::coverable(order, |item| unused_pods.iter().map(|p| p.count_available(item)).sum())
        })
    }

    fn allocate_order(&mut self, order: OrderId, station: &mut Station) {
        self.remove_from_backlog(order);
        let total = self.orders.get(order).total_positions();
        station.reserve_capacity(total);
        station.queued_orders.push(order);
        self.generation += 1;
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
