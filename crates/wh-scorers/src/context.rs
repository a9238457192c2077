//! Read-only scoring context passed to every scorer callback.
//!
//! Replaces the mutable `_currentBot`/`_currentPod`/`_currentStation`
//! scratch fields a naive port would carry over: every value a scorer needs
//! is an explicit, immutably-borrowed field here instead (§9 design note).

use std::collections::HashMap;

use wh_core::{ItemId, Tick};
use wh_graph::WaypointGraph;
use wh_model::{Bot, Order, Pod, Station};

/// Abstracts "cost to travel between two nodes" so scorers can price a
/// candidate without depending on `wh-planner` directly — the caller (
/// `wh-select`, which does depend on the planner) supplies an
/// implementation backed by `Planner::find_path`.
pub trait PathEstimator {
    /// Estimated travel cost from `from` to `to`, or `None` if no path
    /// exists (the Congestion scorer treats this as `+∞`).
    fn estimate(&self, from: wh_core::NodeId, to: wh_core::NodeId) -> Option<f64>;
}

/// A `PathEstimator` that always fails — useful in tests that don't
/// exercise the Congestion family.
pub struct NoPathEstimator;

impl PathEstimator for NoPathEstimator {
    fn estimate(&self, _from: wh_core::NodeId, _to: wh_core::NodeId) -> Option<f64> {
        None
    }
}

/// Everything a scorer might need to evaluate one candidate
/// (bot, pod, station) triple.
pub struct ScoreContext<'a> {
    pub graph: &'a WaypointGraph,
    pub bot: &'a Bot,
    pub pod: &'a Pod,
    pub station: &'a Station,
    pub now: Tick,
    /// Orders this pod/station pair is relevant to (candidates the caller
    /// has already filtered down by `possible_requests`).
    pub relevant_orders: &'a [&'a Order],
    /// Outstanding system-wide demand per item, for the Demand family.
    pub global_demand: &'a HashMap<ItemId, u32>,
    pub path_cost: &'a dyn PathEstimator,
    /// A uniform `[0, 1)` sample drawn once by the caller for this
    /// candidate — keeps `score` itself a pure function of its inputs, per
    /// §4.2 ("pure functions (context) → f64").
    pub random_draw: f64,
}
