//! Entity stores: one `Vec<T>` per entity kind, indexed by the entity's id.
//!
//! Unlike a population simulation with millions of homogeneous agents, this
//! domain's entities are heterogeneous and always accessed by name (`Pod`,
//! `Bot`, `Station`, `Order`), so a generic type-erased component map would
//! add indirection with no payoff — plain `Vec<T>` stores are used instead.

use std::collections::HashSet;

use wh_core::{BotId, OrderId, PodId, StationId};

use crate::bot::Bot;
use crate::order::Order;
use crate::pod::{Pod, PodState};
use crate::station::Station;

// ── PodStore ──────────────────────────────────────────────────────────────────

/// Owns all pods and the *unused-pods* set (§3: "`ResourceManager` owns pods
/// and the unused-pods set").
pub struct PodStore {
    pods: Vec<Pod>,
    unused: HashSet<PodId>,
}

impl PodStore {
    pub fn new(pods: Vec<Pod>) -> Self {
        let unused = pods
            .iter()
            .filter(|p| p.state == PodState::Unused)
            .map(|p| p.id)
            .collect();
        Self { pods, unused }
    }

    #[inline]
    pub fn get(&self, id: PodId) -> &Pod {
        &self.pods[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PodId) -> &mut Pod {
        &mut self.pods[id.index()]
    }

    /// Disjoint mutable references to `ids`, e.g. a station's
    /// `inbound_pods` resolved for `Backlog::fully_supplied`. `ids` need
    /// not be sorted; the returned `Vec` matches `ids`' order.
    pub fn get_many_mut(&mut self, ids: &[PodId]) -> Vec<&mut Pod> {
        debug_assert!(
            {
                let seen: HashSet<PodId> = ids.iter().copied().collect();
                seen.len() == ids.len()
            },
            "PodStore::get_many_mut: duplicate pod id"
        );

        let mut order: Vec<usize> = (0..ids.len()).collect();
        order.sort_by_key(|&i| ids[i].index());

        let mut slots: Vec<Option<&mut Pod>> = (0..ids.len()).map(|_| None).collect();
        let mut rest: &mut [Pod] = &mut self.pods;
        let mut consumed = 0usize;
        for i in order {
            let target = ids[i].index();
            let (_, after) = rest.split_at_mut(target - consumed);
            let (head, tail) = after.split_at_mut(1);
            slots[i] = Some(&mut head[0]);
            rest = tail;
            consumed = target + 1;
        }
        slots.into_iter().map(|s| s.expect("every id resolved by the loop above")).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pod> {
        self.pods.iter()
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    /// All pods currently unused, in arbitrary (set) order.
    pub fn unused_pods(&self) -> impl Iterator<Item = PodId> + '_ {
        self.unused.iter().copied()
    }

    pub fn unused_count(&self) -> usize {
        self.unused.len()
    }

    /// Claim a pod: mark it `Claimed`, remove from the unused set. `bot` is
    /// `None` for pod-set allocations claimed before a bot is assigned.
    pub fn claim_pod(&mut self, id: PodId) {
        debug_assert!(self.unused.remove(&id), "claiming a pod that wasn't unused");
        self.pods[id.index()].state = PodState::Claimed;
    }

    /// Promote a claimed pod to physically carried by `bot`.
    pub fn claim_carry(&mut self, id: PodId, bot: BotId) {
        let pod = &mut self.pods[id.index()];
        debug_assert_eq!(pod.state, PodState::Claimed);
        pod.state = PodState::Carried;
        pod.carrier = Some(bot);
    }

    /// Release a pod back to `Unused`.
    ///
    /// # Panics
    /// Panics (debug-mode invariant) if the pod still has pending
    /// registrations (§7: "pending extract non-empty on a pod being
    /// re-entered").
    pub fn release_pod(&mut self, id: PodId) {
        let pod = &mut self.pods[id.index()];
        if !pod.has_no_pending_registrations() {
            log::error!("releasing pod with pending registrations: {pod:?}");
        }
        debug_assert!(
            pod.has_no_pending_registrations(),
            "releasing pod {id:?} with pending registrations"
        );
        pod.state = PodState::Unused;
        pod.carrier = None;
        self.unused.insert(id);
    }
}

// ── BotStore ──────────────────────────────────────────────────────────────────

pub struct BotStore {
    bots: Vec<Bot>,
}

impl BotStore {
    pub fn new(bots: Vec<Bot>) -> Self {
        Self { bots }
    }

    #[inline]
    pub fn get(&self, id: BotId) -> &Bot {
        &self.bots[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: BotId) -> &mut Bot {
        &mut self.bots[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bot> {
        self.bots.iter()
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BotId> + '_ {
        (0..self.bots.len() as u32).map(BotId)
    }
}

// ── StationStore ──────────────────────────────────────────────────────────────

pub struct StationStore {
    stations: Vec<Station>,
}

impl StationStore {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    #[inline]
    pub fn get(&self, id: StationId) -> &Station {
        &self.stations[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: StationId) -> &mut Station {
        &mut self.stations[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = StationId> + '_ {
        (0..self.stations.len() as u16).map(StationId)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }
}

// ── OrderStore ────────────────────────────────────────────────────────────────

/// Owns order records by id. Membership in the pending backlogs is tracked
/// separately by `wh_orders::OrderBook`; this store is just the data.
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    #[inline]
    pub fn get(&self, id: OrderId) -> &Order {
        &self.orders[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: OrderId) -> &mut Order {
        &mut self.orders[id.index()]
    }

    pub fn push(&mut self, positions: Vec<(wh_core::ItemId, u32)>, time_placed: wh_core::Tick, due_time: wh_core::Tick) -> OrderId {
        let id = OrderId(self.orders.len() as u32);
        self.orders.push(Order::new(id, positions, time_placed, due_time));
        id
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
