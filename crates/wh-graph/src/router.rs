//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `wh-planner` calls routing via the [`Router`] trait, so applications can
//! swap in custom implementations (contraction hierarchies, precomputed
//! distance oracles) without touching the planner.  The default
//! [`DijkstraRouter`] is sufficient for warehouse-scale graphs (hundreds to
//! low thousands of nodes).
//!
//! # Cost units
//!
//! All costs are in **metres** (edge length), converted to travel time by
//! the planner using the bot's speed. `Route` exposes `total_length_m: f32`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use wh_core::{EdgeId, NodeId};

use crate::network::WaypointGraph;
use crate::SpatialError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of `EdgeId`s and the total
/// length.
#[derive(Debug, Clone)]
pub struct Route {
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    /// Cumulative length in metres.
    pub total_length_m: f32,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Per-node shortest distance from a single source, in metres.  `None` for
/// nodes unreachable from the source.  Produced by [`Router::distances_from`]
/// and consumed by the planner's RRA* heuristic.
pub struct DistanceField {
    dist: Vec<f32>,
}

impl DistanceField {
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<f32> {
        let d = self.dist[node.index()];
        if d.is_finite() {
            Some(d)
        } else {
            None
        }
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implement this trait to replace the default Dijkstra with a contraction
/// hierarchy or a precomputed distance oracle for very large graphs.
pub trait Router: Send + Sync {
    /// Compute an untimed shortest route from `from` to `to`.
    ///
    /// Returns `Err(SpatialError::NoRoute)` if no path exists. `from == to`
    /// is handled as an empty (trivial) route rather than an error.
    fn route(&self, graph: &WaypointGraph, from: NodeId, to: NodeId) -> Result<Route, SpatialError>;

    /// Compute shortest distances from `source` to every reachable node.
    /// Used by the planner to build its reverse-resumable A* heuristic.
    fn distances_from(&self, graph: &WaypointGraph, source: NodeId) -> DistanceField;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR waypoint graph, using
/// `edge_length_m` as cost.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &WaypointGraph, from: NodeId, to: NodeId) -> Result<Route, SpatialError> {
        dijkstra(graph, from, to)
    }

    fn distances_from(&self, graph: &WaypointGraph, source: NodeId) -> DistanceField {
        DistanceField {
            dist: dijkstra_all(graph, source),
        }
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Bit-identical cost used in both ordering keys: metres scaled to an
/// integer to keep the binary heap free of float-ordering pitfalls.
#[inline]
fn cost_key(length_m: f32) -> u32 {
    (length_m * 1000.0).round() as u32
}

fn dijkstra_all(graph: &WaypointGraph, source: NodeId) -> Vec<f32> {
    let n = graph.node_count();
    let mut dist = vec![u32::MAX; n];
    dist[source.index()] = 0;

    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, source)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if cost > dist[node.index()] {
            continue;
        }
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost.saturating_add(cost_key(graph.edge_length_m[edge.index()]));
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    dist.into_iter()
        .map(|d| if d == u32::MAX { f32::INFINITY } else { d as f32 / 1000.0 })
        .collect()
}

fn dijkstra(graph: &WaypointGraph, from: NodeId, to: NodeId) -> Result<Route, SpatialError> {
    if from == to {
        return Ok(Route {
            edges: vec![],
            total_length_m: 0.0,
        });
    }

    let n = graph.node_count();
    let mut dist = vec![u32::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0;

    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, prev_edge, to, cost));
        }
        if cost > dist[node.index()] {
            continue;
        }
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost.saturating_add(cost_key(graph.edge_length_m[edge.index()]));
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(graph: &WaypointGraph, prev_edge: Vec<EdgeId>, to: NodeId, total_key: u32) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    Route {
        edges,
        total_length_m: total_key as f32 / 1000.0,
    }
}
