//! Space-time A*: single-agent path search over `(node, tick)` states
//! against a reservation table, with waiting as a first-class action.
//!
//! # Cost model
//!
//! Every action — crossing one edge or waiting in place — costs exactly one
//! tick, times `wait_ticks` for waiting (the grid-step convention WHCA* was
//! originally designed around, see `length_of_a_wait_step` in §6). The
//! reservation table only tracks node occupancy (§3's "Reservation Interval
//! (node, start, end)" has no edge field), so this search enforces vertex
//! conflicts but not edge-swap conflicts — two bots trading places in the
//! same tick is not detected. Warehouse aisles are wide enough relative to
//! bot footprint that this is an accepted simplification, not an oversight.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use wh_core::{BotId, Interval, NodeId, Tick};
use wh_graph::WaypointGraph;

use crate::rra::RraCache;
use crate::reservation::ReservationTable;

/// One step of a found path: the node occupied, and the tick at which
/// occupancy begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeId,
    pub tick: Tick,
}

/// A complete space-time path from the search's start to its goal.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Steps including the start (at the search's `start_time`) and the goal.
    pub steps: Vec<PathStep>,
    /// Tick at which the agent reaches the goal.
    pub end_time: Tick,
}

#[allow(clippy::too_many_arguments)]
pub fn search(
    graph: &WaypointGraph,
    reservations: &ReservationTable,
    heuristic: &mut RraCache,
    bot: BotId,
    start: NodeId,
    goal: NodeId,
    start_time: Tick,
    wait_ticks: u64,
    window_ticks: Option<u64>,
    max_expansions: usize,
) -> Option<SearchOutcome> {
    let wait_ticks = wait_ticks.max(1);
    let horizon = window_ticks.map(|w| start_time.offset(w));

    let h0 = heuristic.estimate(graph, bot, goal, start)? as u64;

    let mut open: BinaryHeap<Reverse<(u64, u64, NodeId, Tick)>> = BinaryHeap::new();
    let mut g_score: HashMap<(NodeId, Tick), u64> = HashMap::new();
    let mut came_from: HashMap<(NodeId, Tick), (NodeId, Tick)> = HashMap::new();

    g_score.insert((start, start_time), 0);
    open.push(Reverse((h0, 0, start, start_time)));

    let mut expansions = 0usize;

    while let Some(Reverse((_f, g, node, tick))) = open.pop() {
        if node == goal {
            return Some(reconstruct(came_from, node, tick, start, start_time));
        }

        expansions += 1;
        if expansions > max_expansions {
            return None;
        }
        if g_score.get(&(node, tick)).is_some_and(|&best| g > best) {
            continue;
        }

        // Wait in place.
        push_candidate(
            graph,
            reservations,
            heuristic,
            bot,
            goal,
            node,
            tick,
            node,
            tick.offset(wait_ticks),
            g,
            wait_ticks,
            horizon,
            &mut g_score,
            &mut came_from,
            &mut open,
        );

        // Move along each outgoing edge.
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            push_candidate(
                graph,
                reservations,
                heuristic,
                bot,
                goal,
                node,
                tick,
                neighbor,
                tick.offset(1),
                g,
                1,
                horizon,
                &mut g_score,
                &mut came_from,
                &mut open,
            );
        }
    }

    None
}

#[allow(clippy::too_many_arguments)]
fn push_candidate(
    graph: &WaypointGraph,
    reservations: &ReservationTable,
    heuristic: &mut RraCache,
    bot: BotId,
    goal: NodeId,
    from_node: NodeId,
    from_tick: Tick,
    to_node: NodeId,
    to_tick: Tick,
    g: u64,
    step_cost: u64,
    horizon: Option<Tick>,
    g_score: &mut HashMap<(NodeId, Tick), u64>,
    came_from: &mut HashMap<(NodeId, Tick), (NodeId, Tick)>,
    open: &mut BinaryHeap<Reverse<(u64, u64, NodeId, Tick)>>,
) {
    if let Some(h) = horizon {
        if to_tick > h {
            return;
        }
    }
    if !reservations.is_free(to_node, Interval::new(from_tick, to_tick)) {
        return;
    }
    let Some(h) = heuristic.estimate(graph, bot, goal, to_node) else {
        return;
    };
    let new_g = g + step_cost;
    let better = g_score
        .get(&(to_node, to_tick))
        .map_or(true, |&best| new_g < best);
    if better {
        g_score.insert((to_node, to_tick), new_g);
        came_from.insert((to_node, to_tick), (from_node, from_tick));
        open.push(Reverse((new_g + h as u64, new_g, to_node, to_tick)));
    }
}

fn reconstruct(
    came_from: HashMap<(NodeId, Tick), (NodeId, Tick)>,
    goal: NodeId,
    goal_tick: Tick,
    start: NodeId,
    start_time: Tick,
) -> SearchOutcome {
    let mut steps = vec![PathStep {
        node: goal,
        tick: goal_tick,
    }];
    let mut cur = (goal, goal_tick);
    while cur != (start, start_time) {
        let prev = came_from[&cur];
        steps.push(PathStep {
            node: prev.0,
            tick: prev.1,
        });
        cur = prev;
    }
    steps.reverse();
    SearchOutcome {
        steps,
        end_time: goal_tick,
    }
}
