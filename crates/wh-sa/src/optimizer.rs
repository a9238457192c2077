//! The simulated-annealing optimizer (§4.6): one `update` call per
//! `update_period` of simulated time, producing a pod per candidate station
//! for `wh_select::SimulatedAnnealingStrategy` to dispense.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use log::warn;
use wh_core::{OrderId, PodId, Rng, StationId, Tick};
use wh_graph::WaypointGraph;
use wh_model::{BotStore, ExtractRequest, PodStore, StationStore};
use wh_planner::Planner;
use wh_select::{reserve_pod_set_for_order, Backlog};

use crate::bots::{self, AvailableBot};
use crate::config::SaConfig;
use crate::solution::{create_solution, Solution};
use crate::space::{search_point_for_pod, SearchSpace};

/// One station's outcome from a completed `update` call, ready for
/// `wh-dispatch` to turn into an enqueued Extract task.
#[derive(Clone, Debug)]
pub struct StationAssignment {
    pub station: StationId,
    pub bot: wh_core::BotId,
    pub pod: PodId,
    pub pod_requests: Vec<ExtractRequest>,
    /// Requests against pods already inbound at the station rather than the
    /// newly fetched one. Always empty in this optimizer: inbound-pod
    /// co-draining is left to on-the-fly augmentation, matching the
    /// simplification `wh_select::strategy::FullyDemandStrategy` and
    /// `SimulatedAnnealingStrategy` already make at dispatch time.
    pub inbound_requests: HashMap<PodId, Vec<ExtractRequest>>,
}

/// Why an `update` call produced no new assignments, for the caller's log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Ran to completion (possibly with zero assignments if nothing panned
    /// out); see the returned assignment list.
    Ran,
    /// §4.6 step 2: no station had both free capacity and no pending
    /// pod-set reservation.
    NoCandidateStations,
    /// §4.6 step 3: no `None`/`Rest` bot existed anywhere.
    NoEligibleBots,
}

pub struct Optimizer {
    config: SaConfig,
}

impl Optimizer {
    pub fn new(config: SaConfig) -> Self {
        Self { config }
    }

    /// Run one optimization pass. `pending_pods` is the same map
    /// `wh_select::SimulatedAnnealingStrategy` drains from; stations whose
    /// queue is non-empty are not candidates this round.
    #[allow(clippy::too_many_arguments)]
    pub fn update<B: Backlog>(
        &mut self,
        graph: &WaypointGraph,
        planner: &mut Planner,
        backlog: &mut B,
        stations: &mut StationStore,
        pods: &mut PodStore,
        bots: &BotStore,
        now: Tick,
        rng: &mut Rng,
        pending_pods: &mut HashMap<StationId, Vec<PodId>>,
    ) -> (UpdateOutcome, Vec<StationAssignment>) {
        let start_wall = Instant::now();

        // 1. Preamble: drain whatever each station's own inbound pods
        // already fully cover before spending any search effort.
        let station_ids: Vec<StationId> = stations.ids().collect();
        for sid in station_ids {
            let inbound_ids = stations.get(sid).inbound_pods.clone();
            let mut inbound = pods.get_many_mut(&inbound_ids);
            let station = stations.get_mut(sid);
            backlog.fully_supplied(station, &mut inbound);
        }

        // 2. Candidate stations.
        let candidate_stations: Vec<StationId> = stations
            .ids()
            .filter(|&sid| {
                let s = stations.get(sid);
                pending_pods.get(&sid).map_or(true, |v| v.is_empty()) && s.used + s.reserved < s.capacity
            })
            .collect();
        if candidate_stations.is_empty() {
            return (UpdateOutcome::NoCandidateStations, Vec::new());
        }

        // 3. Available bots.
        if !bots::has_idle_or_resting(bots) {
            return (UpdateOutcome::NoEligibleBots, Vec::new());
        }
        let mut pool = bots::collect_available_bots(bots, planner, now);

        // Nearest-available-bot-per-station, greedy, each bot used once.
        // §4.6 names the bot pool but not a matching rule between pool and
        // stations; resolved here the way `wh_scorers`'s `Nearest` scorer
        // already ranks pod/station pairs (see DESIGN.md).
        let mut station_bot: HashMap<StationId, AvailableBot> = HashMap::new();
        for &sid in &candidate_stations {
            if pool.is_empty() {
                break;
            }
            let station_pos = graph.node_pos[stations.get(sid).node.index()];
            let (idx, _) = pool
                .iter()
                .enumerate()
                .map(|(i, b)| (i, graph.node_pos[b.start.index()].manhattan(station_pos)))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                .expect("pool checked non-empty above");
            station_bot.insert(sid, pool.remove(idx));
        }

        // 4. Build per-station search spaces.
        planner.schedule_init();
        let mut used_pods: HashSet<PodId> = HashSet::new();
        let mut spaces: HashMap<StationId, SearchSpace> = HashMap::new();

        for &sid in &candidate_stations {
            let Some(&bot) = station_bot.get(&sid) else { continue };
            let station = stations.get(sid).clone();
            let candidate_orders = backlog.candidates(&station);

            let mut points = Vec::new();
            for pid in pods.unused_pods() {
                if used_pods.contains(&pid) {
                    continue;
                }
                let pod = pods.get(pid);
                if let Some(mut point) = search_point_for_pod(&candidate_orders, backlog, pod) {
                    let arrival = planner
                        .schedule_path(graph, bot.bot, bot.ready_at, bot.start, pod.node, None)
                        .unwrap_or(bot.ready_at.offset(u32::MAX as u64));
                    let travel = graph.node_pos[bot.start.index()].manhattan(graph.node_pos[pod.node.index()])
                        + graph.node_pos[pod.node.index()].manhattan(graph.node_pos[station.node.index()]);
                    let elapsed = (arrival.since(now) as f64).max(travel);
                    let queue_time = station.reserved as f64 * self.config.pick_time;
                    point.rate = point.item_count as f64
                        / (elapsed.max(queue_time) + point.item_count as f64 * self.config.pick_time);
                    if point.rate > 0.0 {
                        points.push(point);
                    }
                }
            }

            points.sort_by(|a, b| b.item_count.cmp(&a.item_count));
            points.truncate(self.config.search_pod_num);
            points.sort_by(|a, b| b.rate.partial_cmp(&a.rate).unwrap());
            spaces.insert(sid, SearchSpace { points });
        }

        // 5. Empty search spaces: fall back to pod-set mode for one oldest
        // fulfillable order, stealing pods from other spaces as consumed.
        for &sid in &candidate_stations {
            let is_empty = spaces.get(&sid).map_or(true, SearchSpace::is_empty);
            let has_bot = station_bot.contains_key(&sid);
            if !is_empty || !has_bot {
                continue;
            }
            let unused_ids: Vec<PodId> = pods.unused_pods().filter(|p| !used_pods.contains(p)).collect();
            let unused_refs: Vec<&wh_model::Pod> = unused_ids.iter().map(|&pid| pods.get(pid)).collect();
            let Some(order_id) = backlog.oldest_fulfillable(&unused_refs) else {
                continue;
            };
            let order = backlog.order(order_id).clone();
            let claimed = reserve_pod_set_for_order(&order, &unused_refs);
            for &pid in &claimed {
                pods.claim_pod(pid);
                used_pods.insert(pid);
            }
            backlog.allocate_order(order_id, stations.get_mut(sid));
            pending_pods.entry(sid).or_default().extend(claimed.into_iter().rev());

            for (&other, space) in spaces.iter_mut() {
                if other != sid {
                    space.points.retain(|p| !used_pods.contains(&p.pod));
                }
            }
        }

        // 6. Initial solutions: smallest search space first, first point
        // whose create_solution succeeds.
        let mut claimed_orders: HashSet<OrderId> = HashSet::new();
        let mut solutions: HashMap<StationId, Solution> = HashMap::new();

        let mut order_spaces: Vec<StationId> =
            spaces.iter().filter(|(_, s)| !s.is_empty()).map(|(&sid, _)| sid).collect();
        order_spaces.sort_by_key(|sid| spaces[sid].len());

        for sid in order_spaces {
            let Some(&bot) = station_bot.get(&sid) else { continue };
            let station = stations.get(sid).clone();
            let space = spaces.get(&sid).unwrap();
            for point in &space.points {
                let pod = pods.get(point.pod);
                if let Some(sol) = create_solution(
                    graph,
                    planner,
                    sid,
                    &station,
                    backlog,
                    point,
                    pod,
                    bot,
                    &claimed_orders,
                    now,
                    self.config.pod_transfer_time,
                    self.config.pick_time,
                ) {
                    claimed_orders.extend(sol.orders.iter().copied());
                    solutions.insert(sid, sol);
                    break;
                }
            }
        }

        if self.config.greedy_method || solutions.is_empty() {
            return (UpdateOutcome::Ran, self.emit(backlog, stations, pods, solutions));
        }

        // 7. Metropolis loop / brute-force alternate.
        if self.config.brute_force_method {
            self.brute_force(
                graph,
                planner,
                backlog,
                stations,
                pods,
                &station_bot,
                &spaces,
                &mut solutions,
                &mut claimed_orders,
                now,
            );
        } else {
            self.metropolis(
                graph,
                planner,
                backlog,
                stations,
                pods,
                &station_bot,
                &spaces,
                &mut solutions,
                &mut claimed_orders,
                now,
                rng,
                start_wall,
            );
        }

        (UpdateOutcome::Ran, self.emit(backlog, stations, pods, solutions))
    }

    /// §4.6 step 7: Metropolis loop over random station/point proposals.
    #[allow(clippy::too_many_arguments)]
    fn metropolis<B: Backlog>(
        &self,
        graph: &WaypointGraph,
        planner: &mut Planner,
        backlog: &B,
        stations: &StationStore,
        pods: &PodStore,
        station_bot: &HashMap<StationId, AvailableBot>,
        spaces: &HashMap<StationId, SearchSpace>,
        solutions: &mut HashMap<StationId, Solution>,
        claimed_orders: &mut HashSet<OrderId>,
        now: Tick,
        rng: &mut Rng,
        start_wall: Instant,
    ) {
        let stations_with_spaces: Vec<StationId> =
            spaces.iter().filter(|(_, s)| !s.is_empty()).map(|(&sid, _)| sid).collect();
        if stations_with_spaces.is_empty() {
            return;
        }

        let mut temperature = self.config.init_temp;
        let mut iterations = 0u32;
        let mut last_delta = f64::MAX;

        while temperature >= self.config.min_temp
            && iterations < self.config.max_iteration
            && METROPOLIS_WALL_BUDGET.saturating_sub(start_wall.elapsed()) > METROPOLIS_RESERVE
        {
            iterations += 1;

            let Some(&sid) = rng.choose(&stations_with_spaces) else { break };
            let space = &spaces[&sid];
            let Some(point_idx) = space.sample(rng) else { break };
            let point = &space.points[point_idx];
            let Some(&bot) = station_bot.get(&sid) else { continue };
            let station = stations.get(sid).clone();

            let proposed_owner = solutions.iter().find_map(|(&other, sol)| {
                if other != sid && sol.pod == point.pod { Some(other) } else { None }
            });

            let accepted_delta = if let Some(other_sid) = proposed_owner {
                // Swap: try each station claiming the other's current pod.
                let other_bot = station_bot.get(&other_sid).copied();
                let Some(other_bot) = other_bot else { continue };
                let other_station = stations.get(other_sid).clone();
                let other_space = &spaces[&other_sid];

                let this_pod = solutions.get(&sid).map(|s| s.pod);
                let Some(this_pod) = this_pod else { continue };
                let Some(mirrored) = other_space.point_for_pod(this_pod) else { continue };

                let old_rate_a = solutions.get(&sid).map_or(0.0, |s| s.rate);
                let old_rate_b = solutions.get(&other_sid).map_or(0.0, |s| s.rate);

                let mut trial_claimed = claimed_orders.clone();
                if let Some(sol) = solutions.get(&sid) {
                    for o in &sol.orders {
                        trial_claimed.remove(o);
                    }
                }
                if let Some(sol) = solutions.get(&other_sid) {
                    for o in &sol.orders {
                        trial_claimed.remove(o);
                    }
                }

                let new_a = create_solution(
                    graph, planner, sid, &station, backlog, mirrored, pods.get(this_pod), bot,
                    &trial_claimed, now, self.config.pod_transfer_time, self.config.pick_time,
                );
                let new_b = create_solution(
                    graph, planner, other_sid, &other_station, backlog, point, pods.get(point.pod),
                    other_bot, &trial_claimed, now, self.config.pod_transfer_time, self.config.pick_time,
                );
                let (Some(new_a), Some(new_b)) = (new_a, new_b) else { continue };
                let delta = (old_rate_a - new_a.rate) + (old_rate_b - new_b.rate);

                if accept(delta, temperature, rng) {
                    if let Some(sol) = solutions.get(&sid) {
                        claimed_orders.retain(|o| !sol.orders.contains(o));
                    }
                    if let Some(sol) = solutions.get(&other_sid) {
                        claimed_orders.retain(|o| !sol.orders.contains(o));
                    }
                    claimed_orders.extend(new_a.orders.iter().copied());
                    claimed_orders.extend(new_b.orders.iter().copied());
                    solutions.insert(sid, new_a);
                    solutions.insert(other_sid, new_b);
                }
                Some(delta)
            } else {
                let already_here = solutions.get(&sid).map_or(false, |s| s.pod == point.pod);
                let old_rate = solutions.get(&sid).map_or(0.0, |s| s.rate);

                let mut trial_claimed = claimed_orders.clone();
                if let Some(sol) = solutions.get(&sid) {
                    for o in &sol.orders {
                        trial_claimed.remove(o);
                    }
                }

                let Some(new_sol) = create_solution(
                    graph, planner, sid, &station, backlog, point, pods.get(point.pod), bot,
                    &trial_claimed, now, self.config.pod_transfer_time, self.config.pick_time,
                ) else { continue };

                // Replan (same pod) or replace (different pod): both use
                // the same acceptance rule against the prior rate.
                let _ = already_here;
                let delta = old_rate - new_sol.rate;

                if accept(delta, temperature, rng) {
                    if let Some(sol) = solutions.get(&sid) {
                        claimed_orders.retain(|o| !sol.orders.contains(o));
                    }
                    claimed_orders.extend(new_sol.orders.iter().copied());
                    solutions.insert(sid, new_sol);
                }
                Some(delta)
            };

            if let Some(delta) = accepted_delta {
                if delta.abs() < self.config.min_difference && last_delta.abs() < self.config.min_difference {
                    break;
                }
                last_delta = delta;
            }

            temperature *= self.config.cooling_rate;
        }
    }

    /// Brute-force alternate to the Metropolis loop: up to 5 full passes
    /// over every point in every search space, keeping only strict
    /// improvements; stops early on a no-change pass.
    #[allow(clippy::too_many_arguments)]
    fn brute_force<B: Backlog>(
        &self,
        graph: &WaypointGraph,
        planner: &mut Planner,
        backlog: &B,
        stations: &StationStore,
        pods: &PodStore,
        station_bot: &HashMap<StationId, AvailableBot>,
        spaces: &HashMap<StationId, SearchSpace>,
        solutions: &mut HashMap<StationId, Solution>,
        claimed_orders: &mut HashSet<OrderId>,
        now: Tick,
    ) {
        for _ in 0..5 {
            let mut changed = false;
            for (&sid, space) in spaces {
                let Some(&bot) = station_bot.get(&sid) else { continue };
                let station = stations.get(sid).clone();
                let old_rate = solutions.get(&sid).map_or(0.0, |s| s.rate);

                for point in &space.points {
                    let mut trial_claimed = claimed_orders.clone();
                    if let Some(sol) = solutions.get(&sid) {
                        for o in &sol.orders {
                            trial_claimed.remove(o);
                        }
                    }
                    let Some(candidate) = create_solution(
                        graph, planner, sid, &station, backlog, point, pods.get(point.pod), bot,
                        &trial_claimed, now, self.config.pod_transfer_time, self.config.pick_time,
                    ) else { continue };

                    if candidate.rate > old_rate {
                        if let Some(sol) = solutions.get(&sid) {
                            claimed_orders.retain(|o| !sol.orders.contains(o));
                        }
                        claimed_orders.extend(candidate.orders.iter().copied());
                        solutions.insert(sid, candidate);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// §4.6 step 8: turn each station's final solution into an assignment,
    /// registering items on the chosen pod and allocating its orders.
    fn emit<B: Backlog>(
        &self,
        backlog: &mut B,
        stations: &mut StationStore,
        pods: &mut PodStore,
        solutions: HashMap<StationId, Solution>,
    ) -> Vec<StationAssignment> {
        let mut out = Vec::new();
        for (sid, sol) in solutions {
            pods.claim_pod(sol.pod);
            let mut requests = Vec::new();
            for &order_id in &sol.orders {
                let station = stations.get_mut(sid);
                let pod = pods.get_mut(sol.pod);
                let order = backlog.order(order_id).clone();
                for &(item, required) in &order.positions {
                    let avail = pod.count_available(item);
                    if avail == 0 {
                        continue;
                    }
                    let take = avail.min(required);
                    pod.register_item(item, take);
                    for _ in 0..take {
                        requests.push(ExtractRequest { item, order: order_id, station: Some(sid) });
                    }
                }
                backlog.allocate_order(order_id, station);
            }
            if requests.is_empty() {
                warn!("SA solution for station {sid:?} produced no extract requests; dropping");
                continue;
            }
            out.push(StationAssignment {
                station: sid,
                bot: sol.bot,
                pod: sol.pod,
                pod_requests: requests,
                inbound_requests: HashMap::new(),
            });
        }
        out
    }
}

fn accept(delta: f64, temperature: f64, rng: &mut Rng) -> bool {
    if delta < 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    let acceptance = (-10_000.0 * delta / temperature).exp();
    acceptance > rng.gen_range(0.0..1.0)
}

/// Overall wall-clock allowance for one Metropolis loop. `SaConfig` has no
/// explicit overall-budget field (only `update_period`, which governs how
/// often `update` is called, not how long one call may run) — resolved
/// here as a fixed allowance with the 10 ms reserve the spec's stopping
/// condition names, analogous to `wh_planner::PlannerConfig`'s own
/// wall-clock budgets.
const METROPOLIS_WALL_BUDGET: Duration = Duration::from_millis(50);
const METROPOLIS_RESERVE: Duration = Duration::from_millis(10);
