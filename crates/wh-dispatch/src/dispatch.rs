//! `Dispatch` — per-bot task queues and on-the-fly augmentation (§4.7).
//!
//! A bot carries at most one task at a time (`wh_model::Bot::current_task`
//! is a single slot, not a list), so "per-bot task queues" collapses here to
//! one in-flight `Task` per bot rather than a literal `VecDeque`.

use std::collections::HashMap;

use wh_core::{BotId, PodId, StationId, TaskId};
use wh_model::{BotStore, BotTaskKind, ExtractRequest, InsertRequest, OrderStore, PodStore, StationStore, Task};
use wh_scorers::PathEstimator;
use wh_select::{possible_requests, FilterMode};

/// Tracks dispatched work per bot and the dirty bits that drive on-the-fly
/// augmentation (§4.7 REDESIGN FLAG: a generation counter in place of a
/// `[Station, Bot] -> bool` dictionary).
pub struct Dispatch {
    next_task_id: u64,
    tasks: HashMap<BotId, Task>,
    extract_dirty: bool,
    insert_dirty: bool,
    last_order_generation: u64,
}

/// Drop `pod` from every station's `inbound_pods` list. A pod is inbound to
/// at most one station at a time (wherever it's currently being carried
/// toward), so this is cheap housekeeping before re-adding it elsewhere or
/// before parking it with no station at all.
fn clear_inbound(stations: &mut StationStore, pod: PodId) {
    let ids: Vec<StationId> = stations.ids().collect();
    for sid in ids {
        stations.get_mut(sid).inbound_pods.retain(|&p| p != pod);
    }
}

impl Dispatch {
    pub fn new() -> Self {
        Self {
            next_task_id: 0,
            tasks: HashMap::new(),
            extract_dirty: false,
            insert_dirty: false,
            last_order_generation: 0,
        }
    }

    fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        id
    }

    pub fn task_for(&self, bot: BotId) -> Option<&Task> {
        self.tasks.get(&bot)
    }

    /// Enqueue an Extract task. `requests` must already be registered on
    /// `pod` (every `wh_select`/`wh_sa` pod-selection path guarantees this);
    /// this only claims the pod onto `bot` and commits the station capacity
    /// `allocate_order` reserved earlier into `used` (§3 `Station::
    /// commit_capacity` doc: "once the order is actually being worked").
    pub fn enqueue_extract(
        &mut self,
        bots: &mut BotStore,
        pods: &mut PodStore,
        stations: &mut StationStore,
        bot: BotId,
        station: StationId,
        pod: PodId,
        requests: Vec<ExtractRequest>,
    ) -> TaskId {
        stations.get_mut(station).commit_capacity(requests.len() as u32);
        pods.claim_carry(pod, bot);
        clear_inbound(stations, pod);
        stations.get_mut(station).inbound_pods.push(pod);

        let id = self.next_id();
        let b = bots.get_mut(bot);
        b.carried_pod = Some(pod);
        b.task_kind = BotTaskKind::Extract;
        b.current_task = Some(id);

        self.tasks.insert(bot, Task::Extract { id, pod, station, requests });
        id
    }

    /// Symmetric to [`Dispatch::enqueue_extract`] for input stations.
    pub fn enqueue_insert(
        &mut self,
        bots: &mut BotStore,
        pods: &mut PodStore,
        stations: &mut StationStore,
        bot: BotId,
        station: StationId,
        pod: PodId,
        requests: Vec<InsertRequest>,
    ) -> TaskId {
        stations.get_mut(station).commit_capacity(requests.len() as u32);
        pods.claim_carry(pod, bot);

        let id = self.next_id();
        let b = bots.get_mut(bot);
        b.carried_pod = Some(pod);
        b.task_kind = BotTaskKind::Insert;
        b.current_task = Some(id);

        self.tasks.insert(bot, Task::Insert { id, pod, station, requests });
        id
    }

    /// A carried pod with no more relevant work is parked at `dest`; the
    /// pod stays `Carried` until the outer simulation's motion layer
    /// reports arrival (out of scope here, §1 Non-goals). No station's
    /// extract backlog can count it as inbound any more, so it's dropped
    /// from `inbound_pods` wherever it was listed.
    pub fn enqueue_park_pod(
        &mut self,
        bots: &mut BotStore,
        stations: &mut StationStore,
        bot: BotId,
        pod: PodId,
        dest: wh_core::NodeId,
    ) -> TaskId {
        clear_inbound(stations, pod);
        let id = self.next_id();
        let b = bots.get_mut(bot);
        b.target_node = dest;
        b.task_kind = BotTaskKind::ParkPod;
        b.current_task = Some(id);
        self.tasks.insert(bot, Task::ParkPod { id, pod, dest });
        id
    }

    pub fn enqueue_rest(&mut self, bots: &mut BotStore, bot: BotId) -> TaskId {
        let id = self.next_id();
        let b = bots.get_mut(bot);
        b.task_kind = BotTaskKind::Rest;
        b.current_task = Some(id);
        self.tasks.insert(bot, Task::Rest { id });
        id
    }

    /// Append one more extract request to `bot`'s in-flight Extract task —
    /// the mutation point on-the-fly augmentation calls (§4.7). No-op if
    /// `bot` has no in-flight Extract task.
    pub fn add_extract_request(&mut self, bot: BotId, req: ExtractRequest) {
        if let Some(task) = self.tasks.get_mut(&bot) {
            task.add_extract_request(req);
        }
    }

    pub fn add_insert_request(&mut self, bot: BotId, req: InsertRequest) {
        if let Some(task) = self.tasks.get_mut(&bot) {
            task.add_insert_request(req);
        }
    }

    /// Mark the extract-side situation dirty by hand (e.g. a bot just
    /// picked up a pod, widening what it can now serve).
    pub fn note_pod_pickup(&mut self) {
        self.extract_dirty = true;
    }

    pub fn note_bundle_allocated(&mut self) {
        self.insert_dirty = true;
    }

    /// Poll `wh_orders::OrderBook::generation()`: every order allocation
    /// bumps it, which is exactly the signal the old `[Station, Bot] ->
    /// bool` dictionary existed to carry (§4.7 REDESIGN FLAG).
    pub fn poll_order_generation(&mut self, current_generation: u64) {
        if current_generation != self.last_order_generation {
            self.extract_dirty = true;
            self.last_order_generation = current_generation;
        }
    }

    /// Walk bots with an in-flight Extract task and a carried pod, nearest
    /// to their target station first, appending any extract request the
    /// pod can now additionally serve since it was last dispatched. No-op
    /// unless the extract situation is dirty.
    pub fn run_extract_augmentation(
        &mut self,
        bots: &BotStore,
        pods: &mut PodStore,
        stations: &StationStore,
        orders: &OrderStore,
        filter_mode: FilterMode,
        path_cost: &dyn PathEstimator,
    ) {
        if !self.extract_dirty {
            return;
        }
        self.extract_dirty = false;

        let mut ranked: Vec<(BotId, f64)> = self
            .tasks
            .iter()
            .filter_map(|(&bot_id, task)| {
                let Task::Extract { station, .. } = task else { return None };
                let bot = bots.get(bot_id);
                let dest = stations.get(*station).node;
                let cost = path_cost.estimate(bot.current_node, dest).unwrap_or(f64::INFINITY);
                Some((bot_id, cost))
            })
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        for (bot_id, _) in ranked {
            let Some(Task::Extract { pod, station, requests: existing, .. }) = self.tasks.get(&bot_id) else { continue };
            let (pod_id, station_id) = (*pod, *station);

            let new_requests =
                possible_requests(pods.get(pod_id), stations.get(station_id), orders, filter_mode, existing);
            if new_requests.is_empty() {
                continue;
            }
            let pod_mut = pods.get_mut(pod_id);
            for req in &new_requests {
                pod_mut.register_item(req.item, 1);
            }
            if let Some(task) = self.tasks.get_mut(&bot_id) {
                for req in new_requests {
                    task.add_extract_request(req);
                }
            }
        }
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}
