//! Pod entity: a movable shelf carrying item inventory.

use std::collections::HashMap;

use wh_core::{BotId, ItemId, NodeId, PodId};

/// Lifecycle state of a pod (§3: "unused, claimed, or carried").
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PodState {
    /// Not claimed by any bot or pending pod-set reservation.
    Unused,
    /// Reserved (by a bot or a pod-set allocation) but not yet being carried.
    Claimed,
    /// Physically on a bot.
    Carried,
}

/// A movable storage shelf.
///
/// Invariant: for every item `i`, `0 <= registered(i) <= contained(i)`.
#[derive(Clone, Debug)]
pub struct Pod {
    pub id: PodId,
    pub tier: u8,
    pub node: NodeId,
    pub state: PodState,
    /// The bot physically carrying this pod, if `state == Carried`.
    pub carrier: Option<BotId>,
    contained: HashMap<ItemId, u32>,
    registered: HashMap<ItemId, u32>,
}

impl Pod {
    pub fn new(id: PodId, tier: u8, node: NodeId, contained: HashMap<ItemId, u32>) -> Self {
        Self {
            id,
            tier,
            node,
            state: PodState::Unused,
            carrier: None,
            contained,
            registered: HashMap::new(),
        }
    }

    #[inline]
    pub fn count_contained(&self, item: ItemId) -> u32 {
        self.contained.get(&item).copied().unwrap_or(0)
    }

    #[inline]
    pub fn count_registered(&self, item: ItemId) -> u32 {
        self.registered.get(&item).copied().unwrap_or(0)
    }

    /// `contained(i) - registered(i)`.
    #[inline]
    pub fn count_available(&self, item: ItemId) -> u32 {
        self.count_contained(item) - self.count_registered(item)
    }

    /// Every item this pod physically holds, with its contained count.
    pub fn item_descriptions_contained(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.contained.iter().map(|(&i, &n)| (i, n))
    }

    /// Reserve one unit of `item` against an active extract request.
    ///
    /// # Panics
    /// Panics (debug-mode invariant) if this would make `registered > contained`
    /// — callers must check `count_available` first.
    pub fn register_item(&mut self, item: ItemId, req: u32) {
        let new_reg = self.count_registered(item) + req;
        debug_assert!(
            new_reg <= self.count_contained(item),
            "registering more of item {item:?} than the pod contains"
        );
        self.registered.insert(item, new_reg);
    }

    /// Release one previously registered unit of `item`.
    pub fn unregister_item(&mut self, item: ItemId) {
        let cur = self.count_registered(item);
        debug_assert!(cur > 0, "unregistering item {item:?} with zero registered");
        if cur <= 1 {
            self.registered.remove(&item);
        } else {
            self.registered.insert(item, cur - 1);
        }
    }

    /// Add physically delivered inventory (an Insert task completing).
    pub fn add_contained(&mut self, item: ItemId, n: u32) {
        *self.contained.entry(item).or_insert(0) += n;
    }

    /// Remove physically picked inventory (an Extract task completing).
    pub fn remove_contained(&mut self, item: ItemId, n: u32) {
        let cur = self.contained.entry(item).or_insert(0);
        debug_assert!(*cur >= n, "removing more of item {item:?} than contained");
        *cur -= n;
    }

    /// `true` if nothing is registered — a precondition for re-entering a
    /// pod into `Unused` state (§7: re-entering a pod with pending extracts
    /// is a programmer error).
    pub fn has_no_pending_registrations(&self) -> bool {
        self.registered.values().all(|&n| n == 0)
    }
}
