//! Pod-selection for input (insert) stations — symmetric to [`crate::strategy`]
//! with `InsertRequest` in place of `ExtractRequest` and a narrower scorer
//! set (§4.4: "For input stations the logic is symmetric with
//! `AnyRelevantInsertRequests` and a narrower scorer set").
//!
//! Only the `Default` (`BestOf`) variant is spelled out here; Fully-Demand,
//! HADOD, and the SA delegate follow the identical structure shown in
//! [`crate::strategy`] with bundles substituted for picks, and are left for
//! a future pass since no caller in this engine currently selects them for
//! insert stations.

use std::collections::HashMap;

use wh_core::{ItemId, NodeId, PodId, Rng, StationId, Tick};
use wh_graph::WaypointGraph;
use wh_model::{Bot, InsertRequest, Pod, PodStore, Station, StationStore};
use wh_scorers::{PathEstimator, ScoreContext, ScorerConfig};

use crate::best_of::BestOf;

/// Result of an insert-side pod-selection call.
#[derive(Clone, Debug)]
pub enum InsertOutcome {
    TaskEnqueued { pod: PodId, requests: Vec<InsertRequest> },
    ParkPodEnqueued { pod: PodId, dest: NodeId },
    NoTask,
}

pub struct InsertContext<'a> {
    pub graph: &'a WaypointGraph,
    pub stations: &'a mut StationStore,
    pub pods: &'a mut PodStore,
    /// Bundles awaiting a home pod, grouped by item — the insert-side
    /// counterpart of `OrderStore`'s backlog.
    pub pending_bundles: &'a HashMap<ItemId, u32>,
    pub now: Tick,
    pub global_demand: &'a HashMap<ItemId, u32>,
    pub path_cost: &'a dyn PathEstimator,
    pub rng: &'a mut Rng,
}

pub trait InsertStrategy {
    fn do_insert_for_station(&mut self, bot: &Bot, station: StationId, ctx: &mut InsertContext<'_>) -> InsertOutcome;
}

/// `true` if at least one pending bundle item still needs a home pod. A pod
/// has no modeled per-item capacity cap, so any unused pod is eligible.
fn any_relevant_insert_request(pending: &HashMap<ItemId, u32>) -> bool {
    pending.values().any(|&n| n > 0)
}

fn possible_insert_requests(pod: &Pod, _station: &Station, pending: &HashMap<ItemId, u32>) -> Vec<InsertRequest> {
    pending
        .iter()
        .filter(|&(_, &n)| n > 0)
        .map(|(&item, _)| InsertRequest { item, pod: pod.id, station: None })
        .collect()
}

fn insert_preamble(bot: &Bot, _station_id: StationId, ctx: &mut InsertContext<'_>) -> Option<InsertOutcome> {
    let carried = bot.carried_pod?;
    let pod = ctx.pods.get(carried);
    let requests = possible_insert_requests(pod, ctx.stations.get(_station_id), ctx.pending_bundles);
    if !requests.is_empty() {
        return Some(InsertOutcome::TaskEnqueued { pod: carried, requests });
    }
    Some(InsertOutcome::ParkPodEnqueued { pod: carried, dest: bot.current_node })
}

/// Lexicographic `BestOf` over a narrower scorer set, restricted to unused
/// pods with spare capacity for at least one pending bundle.
pub struct DefaultInsertStrategy {
    pub criteria: Vec<ScorerConfig>,
}

impl InsertStrategy for DefaultInsertStrategy {
    fn do_insert_for_station(&mut self, bot: &Bot, station_id: StationId, ctx: &mut InsertContext<'_>) -> InsertOutcome {
        if let Some(outcome) = insert_preamble(bot, station_id, ctx) {
            return outcome;
        }

        let station = ctx.stations.get(station_id).clone();
        if !any_relevant_insert_request(ctx.pending_bundles) {
            return InsertOutcome::NoTask;
        }
        let candidates: Vec<PodId> = ctx.pods.unused_pods().collect();
        if candidates.is_empty() {
            return InsertOutcome::NoTask;
        }

        let mut best = BestOf::new(self.criteria.clone());
        for &pid in &candidates {
            let score_ctx = ScoreContext {
                graph: ctx.graph,
                bot,
                pod: ctx.pods.get(pid),
                station: &station,
                now: ctx.now,
                relevant_orders: &[],
                global_demand: ctx.global_demand,
                path_cost: ctx.path_cost,
                random_draw: ctx.rng.gen_range(0.0..1.0),
            };
            best.consider(pid, &score_ctx);
        }

        match best.into_best() {
            Some(&pid) => {
                ctx.pods.claim_pod(pid);
                let requests = possible_insert_requests(ctx.pods.get(pid), &station, ctx.pending_bundles);
                InsertOutcome::TaskEnqueued { pod: pid, requests }
            }
            None => InsertOutcome::NoTask,
        }
    }
}
