//! The `Planner`: windowed hierarchical cooperative A* (WHCA*) over a
//! committed reservation table, plus a speculative "scheduled" table used by
//! the SA optimizer to try candidate plans without perturbing committed
//! state (§4.1, §8 "speculative isolation").

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::warn;
use wh_core::{BotId, Interval, NodeId, Rng, Tick};
use wh_graph::WaypointGraph;

use crate::rra::RraCache;
use crate::reservation::ReservationTable;
use crate::spacetime::{self, PathStep, SearchOutcome};

/// One bot's request to `find_paths`: where it is, where it wants to go, and
/// how urgently.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub bot: BotId,
    pub start: NodeId,
    pub destination: NodeId,
    pub priority: u32,
    pub carrying_pod: bool,
}

/// Tuning knobs for the planner, corresponding to the path-planning block of
/// the engine configuration (§6).
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Ticks one wait action spans (`length_of_a_wait_step`).
    pub wait_ticks: u64,
    /// WHCA* search horizon in ticks from each agent's own start
    /// (`length_of_a_window`); `None` searches unboundedly.
    pub window_ticks: Option<u64>,
    /// Hard cap on state expansions per single-agent search, a backstop
    /// independent of wall-clock budget.
    pub max_expansions_per_agent: usize,
    /// Wall-clock budget for one agent's search (`runtime_limit_per_agent`).
    pub runtime_limit_per_agent: Duration,
    /// Wall-clock budget for one whole `find_paths` call (`run_time_limit_overall`).
    pub run_time_limit_overall: Duration,
    /// How many times a blocked agent's priority is escalated and retried
    /// before the deadlock handler (or final failure) takes over.
    pub max_priority_retries: u32,
    /// Ticks of continuous waiting that trigger the deadlock handler
    /// (`MaximumWaitTime`).
    pub max_wait_before_deadlock: u64,
    pub use_deadlock_handler: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            wait_ticks: 1,
            window_ticks: Some(64),
            max_expansions_per_agent: 20_000,
            runtime_limit_per_agent: Duration::from_millis(20),
            run_time_limit_overall: Duration::from_millis(200),
            max_priority_retries: 4,
            max_wait_before_deadlock: 8,
            use_deadlock_handler: true,
        }
    }
}

/// Result of a multi-agent `find_paths` call.
pub struct FindPathsOutcome {
    /// Each agent that found a path this call, in committed order.
    pub paths: HashMap<BotId, SearchOutcome>,
    /// `true` if the overall wall-clock budget was exhausted before every
    /// agent was resolved — the planner returns its best effort rather than
    /// blocking further (§7: "Planner failure ... escalate to caller on
    /// overall timeout").
    pub timed_out: bool,
}

/// Which reservation table a search runs against.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Table {
    Committed,
    Scheduled,
}

pub struct Planner {
    committed: ReservationTable,
    scheduled: ReservationTable,
    /// Per-bot reservations currently held in the *scheduled* table, so
    /// `schedule_path` can "temporarily ignore the agent's own prior
    /// scheduled path" by removing and later restoring exactly these.
    scheduled_by_agent: HashMap<BotId, Vec<(NodeId, Interval)>>,
    heuristic: RraCache,
    priorities: HashMap<BotId, u32>,
    /// Consecutive ticks an agent has spent only waiting, for the deadlock
    /// handler's `MaximumWaitTime` trigger.
    standing_ticks: HashMap<BotId, u64>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            committed: ReservationTable::new(),
            scheduled: ReservationTable::new(),
            scheduled_by_agent: HashMap::new(),
            heuristic: RraCache::new(),
            priorities: HashMap::new(),
            standing_ticks: HashMap::new(),
            config,
        }
    }

    pub fn committed_table(&self) -> &ReservationTable {
        &self.committed
    }

    pub fn scheduled_table(&self) -> &ReservationTable {
        &self.scheduled
    }

    /// Single-agent estimate against the committed table, without reserving
    /// anything. Used by scorers to price a candidate pod/station
    /// assignment (§4.1: "estimator for scorers").
    pub fn find_path(
        &mut self,
        graph: &WaypointGraph,
        bot: BotId,
        now: Tick,
        start: NodeId,
        goal: NodeId,
    ) -> Option<Tick> {
        spacetime::search(
            graph,
            &self.committed,
            &mut self.heuristic,
            bot,
            start,
            goal,
            now,
            self.config.wait_ticks,
            self.config.window_ticks,
            self.config.max_expansions_per_agent,
        )
        .map(|outcome| outcome.end_time)
    }

    /// Resolve paths for every requested agent against the committed table,
    /// reserving as each one succeeds (priority-ordered cooperative A*).
    ///
    /// Agents are visited in descending priority order, ties broken by
    /// ascending RRA* heuristic distance (closer agents go first, per
    /// §4.1). An agent whose search is blocked is retried with escalated
    /// priority after `wait_steps_before_start = 2^k / 2` ticks of delay for
    /// retry number `k`; after `max_priority_retries` failures the deadlock
    /// handler (if enabled) shoves it one hop aside instead of leaving it
    /// stuck in place indefinitely.
    pub fn find_paths(
        &mut self,
        graph: &WaypointGraph,
        now: Tick,
        agents: &[AgentRequest],
        rng: &mut Rng,
    ) -> FindPathsOutcome {
        let start_wall = Instant::now();
        let mut order: Vec<&AgentRequest> = agents.iter().collect();
        order.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| self.heuristic_rank(graph, a).cmp(&self.heuristic_rank(graph, b)))
        });

        let mut paths = HashMap::new();
        let mut timed_out = false;

        let requested = agents.len();
        for req in order {
            if start_wall.elapsed() > self.config.run_time_limit_overall {
                timed_out = true;
                break;
            }
            self.priorities.insert(req.bot, req.priority);

            match self.resolve_one(graph, now, req, rng) {
                Some(outcome) => {
                    self.standing_ticks.remove(&req.bot);
                    self.reserve_committed(&outcome.steps);
                    paths.insert(req.bot, outcome);
                }
                None => {
                    *self.standing_ticks.entry(req.bot).or_insert(0) += 1;
                }
            }
        }

        if timed_out {
            warn!(
                "find_paths exceeded run_time_limit_overall ({:?}); resolved {}/{} agents this call",
                self.config.run_time_limit_overall,
                paths.len(),
                requested,
            );
        }

        FindPathsOutcome { paths, timed_out }
    }

    fn heuristic_rank(&mut self, graph: &WaypointGraph, req: &AgentRequest) -> u32 {
        self.heuristic
            .estimate(graph, req.bot, req.destination, req.start)
            .unwrap_or(u32::MAX)
    }

    fn resolve_one(
        &mut self,
        graph: &WaypointGraph,
        now: Tick,
        req: &AgentRequest,
        rng: &mut Rng,
    ) -> Option<SearchOutcome> {
        let deadline = Instant::now() + self.config.runtime_limit_per_agent;

        for retry in 0..=self.config.max_priority_retries {
            if Instant::now() > deadline {
                break;
            }
            let wait_steps_before_start = 2u64.pow(retry) / 2;
            let start_time = now.offset(wait_steps_before_start);

            if let Some(outcome) = spacetime::search(
                graph,
                &self.committed,
                &mut self.heuristic,
                req.bot,
                req.start,
                req.destination,
                start_time,
                self.config.wait_ticks,
                self.config.window_ticks,
                self.config.max_expansions_per_agent,
            ) {
                return Some(outcome);
            }
        }

        let standing = self.standing_ticks.get(&req.bot).copied().unwrap_or(0);
        if self.config.use_deadlock_handler && standing >= self.config.max_wait_before_deadlock {
            return self.deadlock_detour(graph, now, req, rng);
        }
        None
    }

    /// Push a stuck agent one hop aside to break a standoff, and invalidate
    /// its RRA* field so the next `find_paths` call re-roots the heuristic
    /// from its (unchanged) real destination (§4.1: "deadlock handler ...
    /// random one-hop detour + RRA* reset").
    fn deadlock_detour(
        &mut self,
        graph: &WaypointGraph,
        now: Tick,
        req: &AgentRequest,
        rng: &mut Rng,
    ) -> Option<SearchOutcome> {
        let candidates: Vec<NodeId> = graph
            .out_edges(req.start)
            .map(|e| graph.edge_to[e.index()])
            .filter(|&n| self.committed.is_free(n, Interval::new(now, now.offset(1))))
            .collect();
        let detour = *rng.choose(&candidates)?;

        self.heuristic.invalidate(req.bot);
        self.standing_ticks.remove(&req.bot);

        Some(SearchOutcome {
            steps: vec![
                PathStep { node: req.start, tick: now },
                PathStep { node: detour, tick: now.offset(1) },
            ],
            end_time: now.offset(1),
        })
    }

    fn reserve_committed(&mut self, steps: &[PathStep]) {
        for (node, interval) in intervals_for_path(steps) {
            self.committed.add(node, interval);
        }
    }

    // ── Speculative "scheduled" table (used by SA) ──────────────────────

    /// Deep-copy the committed table into the scheduled table, discarding
    /// any prior speculative state. Must be called before a round of
    /// `schedule_path` calls (§4.1, §8 "speculative isolation": calling
    /// this then performing no scheduled ops must reproduce the
    /// committed-only result exactly).
    pub fn schedule_init(&mut self) {
        self.scheduled = self.committed.clone();
        self.scheduled_by_agent.clear();
    }

    /// Search against the scheduled table for a candidate plan, temporarily
    /// ignoring `bot`'s own previously scheduled path (if any) so it
    /// doesn't block itself, and optionally appending `extra_path` (e.g. a
    /// park-pod tail hold) to the reservations made on success.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule_path(
        &mut self,
        graph: &WaypointGraph,
        bot: BotId,
        start_time: Tick,
        start: NodeId,
        goal: NodeId,
        extra_path: Option<Vec<PathStep>>,
    ) -> Option<Tick> {
        let removed = self.scheduled_by_agent.remove(&bot).unwrap_or_default();
        for &(node, interval) in &removed {
            self.scheduled.remove(node, interval);
        }

        let outcome = spacetime::search(
            graph,
            &self.scheduled,
            &mut self.heuristic,
            bot,
            start,
            goal,
            start_time,
            self.config.wait_ticks,
            self.config.window_ticks,
            self.config.max_expansions_per_agent,
        );

        match outcome {
            Some(outcome) => {
                let mut steps = outcome.steps;
                if let Some(extra) = extra_path {
                    steps.extend(extra);
                }
                let mut held = Vec::new();
                for (node, interval) in intervals_for_path(&steps) {
                    if self.scheduled.add(node, interval) {
                        held.push((node, interval));
                    }
                }
                let end_time = steps.last().map(|s| s.tick).unwrap_or(start_time);
                self.scheduled_by_agent.insert(bot, held);
                Some(end_time)
            }
            None => {
                // Restore what we removed; the attempt failed and must not
                // change observable state.
                for &(node, interval) in &removed {
                    self.scheduled.add(node, interval);
                }
                self.scheduled_by_agent.insert(bot, removed);
                None
            }
        }
    }

    /// Replace `bot`'s scheduled reservations outright with those implied by
    /// `path`, without re-searching (used once SA has committed to a plan
    /// for that bot within the current optimization pass).
    pub fn overwrite_scheduled_path(&mut self, bot: BotId, path: &[PathStep]) {
        if let Some(old) = self.scheduled_by_agent.remove(&bot) {
            for (node, interval) in old {
                self.scheduled.remove(node, interval);
            }
        }
        let mut held = Vec::new();
        for (node, interval) in intervals_for_path(path) {
            if self.scheduled.add(node, interval) {
                held.push((node, interval));
            }
        }
        self.scheduled_by_agent.insert(bot, held);
    }

    /// Start of the long-running tail reservation at `node` in the
    /// committed table, if any (used to estimate when a parked pod's spot
    /// frees up).
    pub fn find_end_reservation(&self, node: NodeId) -> Option<Tick> {
        self.committed.find_end_reservation(node)
    }

    pub fn update_agent_priority(&mut self, bot: BotId, priority: u32) {
        self.priorities.insert(bot, priority);
    }

    pub fn output_scheduled_priority(&self, bot: BotId) -> u32 {
        self.priorities.get(&bot).copied().unwrap_or(0)
    }
}

/// Convert a step sequence into per-node occupancy intervals. A trailing
/// step with `tick == Tick(u64::MAX)` (added by park-pod callers) produces
/// an indefinite tail interval instead of a one-tick hold.
fn intervals_for_path(steps: &[PathStep]) -> Vec<(NodeId, Interval)> {
    let mut out = Vec::new();
    for pair in steps.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        out.push((to.node, Interval::new(from.tick, to.tick)));
    }
    out
}
