//! Reverse-Resumable A* heuristic cache.
//!
//! Each bot's space-time A* search is guided by a lower bound on the number
//! of ticks remaining to its destination. Recomputing that bound node by
//! node during the search would be wasteful, so it is precomputed once per
//! (bot, destination) pair as a full breadth-first hop-count field rooted at
//! the destination and reused for every expansion — "reverse" because the
//! field is grown from the goal backwards, "resumable" because it survives
//! across calls to `find_path`/`schedule_path` for the same bot until its
//! destination changes or the deadlock handler forces a reset (§4.1).
//!
//! Hop count, not metre distance, is the right unit here: the space-time
//! search costs every edge traversal and every wait step at exactly one
//! tick (the WHCA* grid-step convention), so an admissible heuristic must be
//! expressed in the same unit. The field is grown with a forward BFS from
//! the destination, which coincides with true backward distance because
//! aisles are built bidirectional (`WaypointGraphBuilder::add_aisle`).

use std::collections::{HashMap, VecDeque};

use wh_core::{BotId, NodeId};
use wh_graph::WaypointGraph;

struct CachedField {
    destination: NodeId,
    hops: Vec<Option<u32>>,
}

/// Per-bot cache of RRA* hop-count fields.
#[derive(Default)]
pub struct RraCache {
    fields: HashMap<BotId, CachedField>,
}

impl RraCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached field for `bot`, forcing recomputation on next use.
    /// Called when the deadlock handler resets a bot's plan (§4.1).
    pub fn invalidate(&mut self, bot: BotId) {
        self.fields.remove(&bot);
    }

    /// Admissible remaining-tick estimate from `node` to `bot`'s
    /// `destination`. Recomputes the cached field if `bot` has none yet or
    /// its destination changed; otherwise reuses the cached field.
    ///
    /// Returns `None` if `node` cannot reach `destination`.
    pub fn estimate(&mut self, graph: &WaypointGraph, bot: BotId, destination: NodeId, node: NodeId) -> Option<u32> {
        let needs_refresh = match self.fields.get(&bot) {
            Some(cached) => cached.destination != destination,
            None => true,
        };
        if needs_refresh {
            let hops = bfs_hops(graph, destination);
            self.fields.insert(bot, CachedField { destination, hops });
        }
        self.fields[&bot].hops[node.index()]
    }
}

fn bfs_hops(graph: &WaypointGraph, source: NodeId) -> Vec<Option<u32>> {
    let mut hops = vec![None; graph.node_count()];
    hops[source.index()] = Some(0);
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(node) = queue.pop_front() {
        let d = hops[node.index()].unwrap();
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if hops[neighbor.index()].is_none() {
                hops[neighbor.index()] = Some(d + 1);
                queue.push_back(neighbor);
            }
        }
    }
    hops
}
