//! `create_solution`: turn a search-space point into a concrete plan by
//! actually path-searching the scheduled table (§4.6 "`create_solution(point)`
//! contract").

use std::collections::HashSet;

use wh_core::{BotId, OrderId, PodId, StationId, Tick};
use wh_graph::WaypointGraph;
use wh_model::{Pod, Station};
use wh_planner::Planner;
use wh_select::Backlog;

use crate::bots::AvailableBot;
use crate::space::{greedy_order_set, pod_availability, SearchPoint};

/// A concrete, timed candidate plan for one station: which bot fetches
/// which pod, which backlog orders it would cover, and the projected
/// throughput rate that plan buys the station.
#[derive(Clone, Debug)]
pub struct Solution {
    pub station: StationId,
    pub bot: BotId,
    pub pod: PodId,
    pub orders: Vec<OrderId>,
    pub item_count: u32,
    pub rate: f64,
    pub arrival_time: Tick,
}

/// Build a `Solution` for `point` at `station`, carried by `bot`.
///
/// Returns `None` if every order in `point.orders` is already claimed by
/// another station's solution, or if either path leg (bot→pod, pod→station)
/// has no route within the planner's window — the two failure modes named
/// by the contract.
#[allow(clippy::too_many_arguments)]
pub fn create_solution<B: Backlog>(
    graph: &WaypointGraph,
    planner: &mut Planner,
    station_id: StationId,
    station: &Station,
    backlog: &B,
    point: &SearchPoint,
    pod: &Pod,
    bot: AvailableBot,
    claimed: &HashSet<OrderId>,
    now: Tick,
    pod_transfer_time: f64,
    pick_time: f64,
) -> Option<Solution> {
    let available: Vec<OrderId> = point.orders.iter().copied().filter(|o| !claimed.contains(o)).collect();
    if available.is_empty() {
        return None;
    }

    let (fulfillable, item_count) = greedy_order_set(&available, backlog, pod_availability(pod));
    if fulfillable.is_empty() {
        return None;
    }

    let leg1_end = planner.schedule_path(graph, bot.bot, bot.ready_at, bot.start, pod.node, None)?;
    let leg2_start = leg1_end.offset(pod_transfer_time.round() as u64);
    let arrival_time = planner.schedule_path(graph, bot.bot, leg2_start, pod.node, station.node, None)?;

    let elapsed = arrival_time.since(now) as f64;
    let queue_time = station.reserved as f64 * pick_time;
    let rate = item_count as f64 / (elapsed.max(queue_time) + item_count as f64 * pick_time);

    Some(Solution {
        station: station_id,
        bot: bot.bot,
        pod: point.pod,
        orders: fulfillable,
        item_count,
        rate,
        arrival_time,
    })
}
