//! Bridges wh-scorers' `Congestion`/`Nearest{ShortestPath,ShortestTime}`
//! scorer variants to the real planner (§4.1 "estimator for scorers").
//!
//! `wh_scorers::PathEstimator::estimate` takes `&self`, but the underlying
//! search wants its own RRA* cache to mutate across calls. A `RefCell`
//! bridges the two without forcing every scorer call site to thread a
//! `&mut Planner` through `BestOf`.

use std::cell::RefCell;

use wh_core::{BotId, NodeId, Tick};
use wh_graph::WaypointGraph;
use wh_planner::{search, ReservationTable, RraCache};
use wh_scorers::PathEstimator;

/// A [`PathEstimator`] backed by the same space-time A* search the planner
/// itself uses, read against a snapshot reservation table (typically
/// `Planner::committed_table()` or `Planner::scheduled_table()`).
///
/// Estimates here do not share the planner's own RRA* cache — scoring calls
/// are bursty (one `BestOf` round per candidate) rather than continuous, so
/// a private cache local to the estimator's lifetime is the simpler choice.
pub struct PlannerPathEstimator<'a> {
    graph: &'a WaypointGraph,
    reservations: &'a ReservationTable,
    bot: BotId,
    now: Tick,
    wait_ticks: u64,
    window_ticks: Option<u64>,
    max_expansions: usize,
    heuristic: RefCell<RraCache>,
}

impl<'a> PlannerPathEstimator<'a> {
    pub fn new(
        graph: &'a WaypointGraph,
        reservations: &'a ReservationTable,
        bot: BotId,
        now: Tick,
        wait_ticks: u64,
        window_ticks: Option<u64>,
        max_expansions: usize,
    ) -> Self {
        Self {
            graph,
            reservations,
            bot,
            now,
            wait_ticks,
            window_ticks,
            max_expansions,
            heuristic: RefCell::new(RraCache::new()),
        }
    }
}

impl PathEstimator for PlannerPathEstimator<'_> {
    fn estimate(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let mut heuristic = self.heuristic.borrow_mut();
        let outcome = search(
            self.graph,
            self.reservations,
            &mut heuristic,
            self.bot,
            from,
            to,
            self.now,
            self.wait_ticks,
            self.window_ticks,
            self.max_expansions,
        )?;
        Some(outcome.end_time.since(self.now) as f64)
    }
}
