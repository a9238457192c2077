//! Pod-selection strategies for output (extract) stations (§4.4).
//!
//! A strategy is invoked as `do_extract_for_station(bot, station, ctx)`. The
//! shared preamble in [`extract_preamble`] handles the case where the bot
//! already carries a pod; the strategies differ only in how they pick a
//! *new* pod for an empty-handed bot.

use std::collections::HashMap;

use wh_core::{ItemId, NodeId, PodId, Rng, StationId, Tick};
use wh_graph::WaypointGraph;
use wh_model::{Bot, ExtractRequest, Order, OrderStore, Pod, PodStore, Station, StationStore};
use wh_scorers::{PathEstimator, ScoreContext, ScorerConfig};

use crate::backlog::{Backlog, HadodTable};
use crate::best_of::BestOf;
use crate::possible_requests::{possible_requests, FilterMode};

/// Result of a pod-selection call.
///
/// `TaskEnqueued`'s requests are always already registered against `pod`
/// (`Pod::register_item`) by the time a strategy returns them, regardless of
/// which internal path produced them — callers (`wh-dispatch`) never need to
/// register a request twice.
#[derive(Clone, Debug)]
pub enum TaskOutcome {
    /// Dispatch should enqueue an Extract task for `pod` with `requests`.
    TaskEnqueued { pod: PodId, requests: Vec<ExtractRequest> },
    /// The carried pod has no more relevant work; park it at `dest`.
    ParkPodEnqueued { pod: PodId, dest: NodeId },
    /// Nothing to do for this bot/station pair right now.
    NoTask,
}

/// Everything a strategy needs to resolve one `do_extract_for_station` call.
pub struct ExtractContext<'a> {
    pub graph: &'a WaypointGraph,
    pub stations: &'a mut StationStore,
    pub pods: &'a mut PodStore,
    pub orders: &'a OrderStore,
    pub now: Tick,
    pub filter_mode: FilterMode,
    /// If the carried pod has no relevant request at `station` and
    /// `extend` is set, neighbor stations within `radius` are searched for
    /// one before falling back to a park.
    pub extend: bool,
    pub radius: f64,
    pub global_demand: &'a HashMap<ItemId, u32>,
    pub path_cost: &'a dyn PathEstimator,
    pub rng: &'a mut Rng,
}

pub trait ExtractStrategy {
    fn do_extract_for_station(&mut self, bot: &Bot, station: StationId, ctx: &mut ExtractContext<'_>) -> TaskOutcome;
}

/// `true` if `pod` has at least one extract request `station` could use
/// right now (assigned or queued orders, filled as far as availability
/// allows).
fn any_relevant_request(pod: &Pod, station: &Station, orders: &OrderStore) -> bool {
    !possible_requests(pod, station, orders, FilterMode::AssignedAndQueuedEqually, &[]).is_empty()
}

fn station_orders<'a>(station: &Station, orders: &'a OrderStore) -> Vec<&'a Order> {
    station
        .assigned_orders
        .iter()
        .chain(station.queued_orders.iter())
        .map(|&id| orders.get(id))
        .collect()
}

/// Shared preamble (§4.4): if the bot already carries a pod, either recycle
/// it against `station`, extend the search to a nearby station, or park it.
/// Returns `None` only when the bot is empty-handed, leaving the concrete
/// strategy to pick a new pod.
fn extract_preamble(bot: &Bot, station_id: StationId, ctx: &mut ExtractContext<'_>) -> Option<TaskOutcome> {
    let carried = bot.carried_pod?;

    let station = ctx.stations.get(station_id);
    let pod = ctx.pods.get(carried);
    let requests = possible_requests(pod, station, ctx.orders, ctx.filter_mode, &[]);
    if !requests.is_empty() {
        let pod_mut = ctx.pods.get_mut(carried);
        for req in &requests {
            pod_mut.register_item(req.item, 1);
        }
        return Some(TaskOutcome::TaskEnqueued { pod: carried, requests });
    }

    if ctx.extend {
        let pod_pos = ctx.graph.node_pos[pod.node.index()];
        let mut neighbors: Vec<StationId> = ctx
            .stations
            .ids()
            .filter(|&sid| sid != station_id)
            .filter(|&sid| {
                let s = ctx.stations.get(sid);
                ctx.graph.node_pos[s.node.index()].distance(pod_pos) <= ctx.radius
            })
            .collect();
        neighbors.sort_by_key(|&sid| sid.index());
        for sid in neighbors {
            let s = ctx.stations.get(sid);
            let reqs = possible_requests(ctx.pods.get(carried), s, ctx.orders, ctx.filter_mode, &[]);
            if !reqs.is_empty() {
                let pod_mut = ctx.pods.get_mut(carried);
                for req in &reqs {
                    pod_mut.register_item(req.item, 1);
                }
                return Some(TaskOutcome::TaskEnqueued { pod: carried, requests: reqs });
            }
        }
    }

    // Park where the bot presently stands; a dedicated parking-slot
    // allocator is out of scope here.
    Some(TaskOutcome::ParkPodEnqueued { pod: carried, dest: bot.current_node })
}

/// Builds a `TaskEnqueued` outcome and registers every returned request
/// against the pod, so a caller's own availability checks (and `wh-dispatch`'s
/// on-the-fly augmentation) never see a request twice.
fn enqueue_for(pod_id: PodId, station: &Station, pods: &mut PodStore, orders: &OrderStore, filter_mode: FilterMode) -> TaskOutcome {
    pods.claim_pod(pod_id);
    enqueue_claimed(pod_id, station, pods, orders, filter_mode)
}

/// Like [`enqueue_for`] but for a pod a caller already moved out of `unused`
/// (pod-set staging, SA's `pending_pods`) — claiming it again would trip
/// `PodStore::claim_pod`'s own-unused assertion.
fn enqueue_claimed(pod_id: PodId, station: &Station, pods: &mut PodStore, orders: &OrderStore, filter_mode: FilterMode) -> TaskOutcome {
    let requests = possible_requests(pods.get(pod_id), station, orders, filter_mode, &[]);
    let pod = pods.get_mut(pod_id);
    for req in &requests {
        pod.register_item(req.item, 1);
    }
    TaskOutcome::TaskEnqueued { pod: pod_id, requests }
}

// ── Default ──────────────────────────────────────────────────────────────────

/// Lexicographic `BestOf` over configured scorers, restricted to unused pods
/// with at least one relevant request at `station`.
pub struct DefaultStrategy {
    pub criteria: Vec<ScorerConfig>,
}

impl ExtractStrategy for DefaultStrategy {
    fn do_extract_for_station(&mut self, bot: &Bot, station_id: StationId, ctx: &mut ExtractContext<'_>) -> TaskOutcome {
        if let Some(outcome) = extract_preamble(bot, station_id, ctx) {
            return outcome;
        }

        let station = ctx.stations.get(station_id).clone();
        let candidates: Vec<PodId> = ctx
            .pods
            .unused_pods()
            .filter(|&pid| any_relevant_request(ctx.pods.get(pid), &station, ctx.orders))
            .collect();
        if candidates.is_empty() {
            return TaskOutcome::NoTask;
        }

        let relevant_orders = station_orders(&station, ctx.orders);
        let mut best = BestOf::new(self.criteria.clone());
        for &pid in &candidates {
            let score_ctx = ScoreContext {
                graph: ctx.graph,
                bot,
                pod: ctx.pods.get(pid),
                station: &station,
                now: ctx.now,
                relevant_orders: &relevant_orders,
                global_demand: ctx.global_demand,
                path_cost: ctx.path_cost,
                random_draw: ctx.rng.gen_range(0.0..1.0),
            };
            best.consider(pid, &score_ctx);
        }

        match best.into_best() {
            Some(pid) => enqueue_for(pid, &station, ctx.pods, ctx.orders, ctx.filter_mode),
            None => TaskOutcome::NoTask,
        }
    }
}

// ── Fully-Demand ─────────────────────────────────────────────────────────────

/// Iterates the backlog (late first unless `late_orders_enough`), trying to
/// fulfill whole orders from a single pod before falling back to pod-set
/// mode (§4.4).
pub struct FullyDemandStrategy<'b, B: Backlog> {
    pub backlog: &'b mut B,
    /// Leftover pods from a prior pod-set claim at this station, dispensed
    /// one per subsequent bot request before any new scoring happens.
    pub pending_pods: &'b mut HashMap<StationId, Vec<PodId>>,
}

impl<B: Backlog> ExtractStrategy for FullyDemandStrategy<'_, B> {
    fn do_extract_for_station(&mut self, bot: &Bot, station_id: StationId, ctx: &mut ExtractContext<'_>) -> TaskOutcome {
        if let Some(outcome) = extract_preamble(bot, station_id, ctx) {
            return outcome;
        }

        if let Some(queue) = self.pending_pods.get_mut(&station_id) {
            if let Some(pid) = queue.pop() {
                let station = ctx.stations.get(station_id).clone();
                return enqueue_claimed(pid, &station, ctx.pods, ctx.orders, ctx.filter_mode);
            }
        }

        {
            // 1. Drain whatever the station's own inbound pods (carried by
            // other bots already en route) already fully cover before
            // scoring a new pod at all.
            let inbound_ids = ctx.stations.get(station_id).inbound_pods.clone();
            let mut inbound = ctx.pods.get_many_mut(&inbound_ids);
            let station = ctx.stations.get_mut(station_id);
            let _ = self.backlog.fully_supplied(station, &mut inbound);
        }

        let station = ctx.stations.get(station_id).clone();
        let unused: Vec<PodId> = ctx.pods.unused_pods().collect();
        if unused.is_empty() {
            return TaskOutcome::NoTask;
        }

        // 2. score each unused pod by how many backlog orders it alone
        // would let the station fully fulfill.
        let mut best_pod = None;
        let mut best_count = 0usize;
        for &pid in &unused {
            let pod = ctx.pods.get(pid);
            let count = self
                .backlog
                .candidates(&station)
                .into_iter()
                .filter(|&oid| {
                    let order = self.backlog.order(oid);
                    order
                        .positions
                        .iter()
                        .all(|&(item, n)| pod.count_available(item) >= n)
                })
                .count();
            if count > best_count {
                best_count = count;
                best_pod = Some(pid);
            }
        }

        if let Some(pid) = best_pod {
            ctx.pods.claim_pod(pid);
            let requests = {
                let station_mut = ctx.stations.get_mut(station_id);
                let pod_mut = ctx.pods.get_mut(pid);
                self.backlog.extra_decide_pending_orders(station_mut, &mut [], pod_mut)
            };
            return TaskOutcome::TaskEnqueued { pod: pid, requests };
        }

        // 3. pod-set mode.
        let unused_pods: Vec<&Pod> = unused.iter().map(|&pid| ctx.pods.get(pid)).collect();
        let Some(order_id) = self.backlog.oldest_fulfillable(&unused_pods) else {
            return TaskOutcome::NoTask;
        };
        let order = self.backlog.order(order_id).clone();
        let claimed = crate::pod_set::reserve_pod_set_for_order(&order, &unused_pods);
        for &pid in &claimed {
            ctx.pods.claim_pod(pid);
        }
        let first = claimed[0];
        let requests = possible_requests(ctx.pods.get(first), &station, ctx.orders, ctx.filter_mode, &[]);
        let pod = ctx.pods.get_mut(first);
        for req in &requests {
            pod.register_item(req.item, 1);
        }
        self.backlog.allocate_order(order_id, ctx.stations.get_mut(station_id));
        self.pending_pods.entry(station_id).or_default().extend(claimed[1..].iter().rev());
        TaskOutcome::TaskEnqueued { pod: first, requests }
    }
}

// ── HADOD ────────────────────────────────────────────────────────────────────

/// Picks the unused pod in the HADOD order manager's precomputed table
/// minimizing composed shortest-path distance (bot→pod, pod→station).
pub struct HadodStrategy<'b, H: HadodTable> {
    pub table: &'b H,
}

impl<H: HadodTable> ExtractStrategy for HadodStrategy<'_, H> {
    fn do_extract_for_station(&mut self, bot: &Bot, station_id: StationId, ctx: &mut ExtractContext<'_>) -> TaskOutcome {
        if let Some(outcome) = extract_preamble(bot, station_id, ctx) {
            return outcome;
        }

        let candidates = self.table.candidates(station_id);
        let mut best: Option<(PodId, Vec<ExtractRequest>, f64)> = None;
        for (pid, requests) in candidates {
            if requests.is_empty() {
                continue;
            }
            let pod = ctx.pods.get(pid);
            let leg1 = ctx.path_cost.estimate(bot.current_node, pod.node);
            let leg2 = ctx.path_cost.estimate(pod.node, ctx.stations.get(station_id).node);
            let (Some(a), Some(b)) = (leg1, leg2) else { continue };
            let dist = a + b;
            if best.as_ref().map_or(true, |&(_, _, best_dist)| dist < best_dist) {
                best = Some((pid, requests, dist));
            }
        }

        match best {
            Some((pid, requests, _)) => {
                ctx.pods.claim_pod(pid);
                let pod = ctx.pods.get_mut(pid);
                for req in &requests {
                    pod.register_item(req.item, 1);
                }
                TaskOutcome::TaskEnqueued { pod: pid, requests }
            }
            None => TaskOutcome::NoTask,
        }
    }
}

// ── Simulated Annealing delegate ─────────────────────────────────────────────

/// Dispenses a pod the SA optimizer already prepared for this station; if
/// none is ready, falls back to the greedy (non-pod-set) variant of
/// Fully-Demand (§4.4).
pub struct SimulatedAnnealingStrategy<'b, B: Backlog> {
    pub backlog: &'b mut B,
    /// Pods the SA optimizer has staged per station (§4.6 step 8), drained
    /// here as bots request tasks.
    pub pending_pods: &'b mut HashMap<StationId, Vec<PodId>>,
}

impl<B: Backlog> ExtractStrategy for SimulatedAnnealingStrategy<'_, B> {
    fn do_extract_for_station(&mut self, bot: &Bot, station_id: StationId, ctx: &mut ExtractContext<'_>) -> TaskOutcome {
        if let Some(outcome) = extract_preamble(bot, station_id, ctx) {
            return outcome;
        }

        if let Some(queue) = self.pending_pods.get_mut(&station_id) {
            if let Some(pid) = queue.pop() {
                let station = ctx.stations.get(station_id).clone();
                return enqueue_claimed(pid, &station, ctx.pods, ctx.orders, ctx.filter_mode);
            }
        }

        let station = ctx.stations.get(station_id).clone();
        let unused: Vec<PodId> = ctx.pods.unused_pods().collect();
        let mut best_pod = None;
        let mut best_count = 0usize;
        for &pid in &unused {
            let pod = ctx.pods.get(pid);
            let count = self
                .backlog
                .candidates(&station)
                .into_iter()
                .filter(|&oid| {
                    let order = self.backlog.order(oid);
                    order.positions.iter().all(|&(item, n)| pod.count_available(item) >= n)
                })
                .count();
            if count > best_count {
                best_count = count;
                best_pod = Some(pid);
            }
        }

        match best_pod {
            Some(pid) => {
                ctx.pods.claim_pod(pid);
                let requests = {
                    let station_mut = ctx.stations.get_mut(station_id);
                    let pod_mut = ctx.pods.get_mut(pid);
                    self.backlog.extra_decide_pending_orders(station_mut, &mut [], pod_mut)
                };
                TaskOutcome::TaskEnqueued { pod: pid, requests }
            }
            None => TaskOutcome::NoTask,
        }
    }
}
