//! Unit tests for wh-planner.

use wh_core::{BotId, Interval, NodeId, Rng, Tick};
use wh_graph::WaypointGraphBuilder;

use crate::planner::{AgentRequest, Planner, PlannerConfig};
use crate::reservation::ReservationTable;

/// A 1x5 corridor: node 0 — node 1 — node 2 — node 3 — node 4, each hop 1 m.
fn corridor() -> wh_graph::WaypointGraph {
    let mut b = WaypointGraphBuilder::new();
    let nodes: Vec<NodeId> = (0..5).map(|i| b.add_node(wh_core::Point2D::new(i as f64, 0.0))).collect();
    for pair in nodes.windows(2) {
        b.add_aisle(pair[0], pair[1], 1.0);
    }
    b.build()
}

fn planner(config: PlannerConfig) -> Planner {
    Planner::new(config)
}

// ── ReservationTable ──────────────────────────────────────────────────────────

#[cfg(test)]
mod reservation_table {
    use super::*;

    #[test]
    fn disjoint_intervals_at_a_node_both_succeed() {
        let mut table = ReservationTable::new();
        assert!(table.add(NodeId(0), Interval::new(Tick(0), Tick(5))));
        assert!(table.add(NodeId(0), Interval::new(Tick(5), Tick(10))));
    }

    #[test]
    fn overlapping_interval_is_rejected() {
        let mut table = ReservationTable::new();
        assert!(table.add(NodeId(0), Interval::new(Tick(0), Tick(5))));
        assert!(!table.add(NodeId(0), Interval::new(Tick(4), Tick(8))));
    }

    #[test]
    fn add_then_remove_restores_free_state() {
        let mut table = ReservationTable::new();
        let interval = Interval::new(Tick(0), Tick(5));
        table.add(NodeId(0), interval);
        table.remove(NodeId(0), interval);
        assert!(table.is_free(NodeId(0), interval));
    }

    #[test]
    fn find_end_reservation_reports_tail_start() {
        let mut table = ReservationTable::new();
        table.add(NodeId(2), Interval::new(Tick(10), Tick(u64::MAX)));
        assert_eq!(table.find_end_reservation(NodeId(2)), Some(Tick(10)));
        assert_eq!(table.find_end_reservation(NodeId(3)), None);
    }
}

// ── Single-agent search ────────────────────────────────────────────────────────

#[cfg(test)]
mod single_agent {
    use super::*;

    #[test]
    fn finds_direct_path_on_empty_table() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        let end = p.find_path(&graph, BotId(0), Tick(0), NodeId(0), NodeId(4));
        assert_eq!(end, Some(Tick(4)));
    }

    #[test]
    fn find_path_does_not_reserve_anything() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        p.find_path(&graph, BotId(0), Tick(0), NodeId(0), NodeId(4));
        assert!(p.committed_table().is_free(NodeId(2), Interval::new(Tick(0), Tick(10))));
    }
}

// ── find_paths: priority and reservation ──────────────────────────────────────

#[cfg(test)]
mod find_paths {
    use super::*;

    #[test]
    fn single_bot_reserves_its_route() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        let mut rng = Rng::new(1);
        let agents = vec![AgentRequest {
            bot: BotId(0),
            start: NodeId(0),
            destination: NodeId(4),
            priority: 10,
            carrying_pod: false,
        }];
        let outcome = p.find_paths(&graph, Tick(0), &agents, &mut rng);
        assert!(!outcome.timed_out);
        let path = outcome.paths.get(&BotId(0)).expect("path found");
        assert_eq!(path.end_time, Tick(4));
        // The committed table now holds that bot's occupancy.
        assert!(!p.committed_table().is_free(NodeId(4), Interval::new(Tick(3), Tick(4))));
    }

    #[test]
    fn higher_priority_agent_is_scheduled_first() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        let mut rng = Rng::new(7);
        let agents = vec![
            AgentRequest { bot: BotId(0), start: NodeId(0), destination: NodeId(4), priority: 1, carrying_pod: false },
            AgentRequest { bot: BotId(1), start: NodeId(4), destination: NodeId(0), priority: 100, carrying_pod: false },
        ];
        let outcome = p.find_paths(&graph, Tick(0), &agents, &mut rng);
        // Both get paths in this corridor (wide enough windows), but bot 1
        // (higher priority) must have been reserved without being displaced.
        assert!(outcome.paths.contains_key(&BotId(1)));
    }
}

// ── Speculative scheduled-table isolation ──────────────────────────────────────

#[cfg(test)]
mod speculative_isolation {
    use super::*;

    #[test]
    fn schedule_init_deep_copies_committed() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        let mut rng = Rng::new(3);
        let agents = vec![AgentRequest {
            bot: BotId(0),
            start: NodeId(0),
            destination: NodeId(2),
            priority: 5,
            carrying_pod: false,
        }];
        p.find_paths(&graph, Tick(0), &agents, &mut rng);

        p.schedule_init();
        // Scheduled table must reject exactly what committed rejects.
        let interval = Interval::new(Tick(0), Tick(1));
        assert_eq!(
            p.committed_table().is_free(NodeId(0), interval),
            p.scheduled_table().is_free(NodeId(0), interval)
        );
    }

    #[test]
    fn schedule_path_without_emit_does_not_touch_committed() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        p.schedule_init();
        p.schedule_path(&graph, BotId(9), Tick(0), NodeId(0), NodeId(4), None);

        // Committed table is untouched by a purely-scheduled operation.
        assert!(p.committed_table().is_free(NodeId(2), Interval::new(Tick(0), Tick(10))));
    }

    #[test]
    fn schedule_path_ignores_its_own_agent_prior_reservation() {
        let graph = corridor();
        let mut p = planner(PlannerConfig::default());
        p.schedule_init();

        p.schedule_path(&graph, BotId(0), Tick(0), NodeId(0), NodeId(4), None);
        // Re-planning the same bot from the same start must succeed even
        // though its own prior scheduled reservations occupy the corridor.
        let second = p.schedule_path(&graph, BotId(0), Tick(0), NodeId(0), NodeId(4), None);
        assert!(second.is_some());
    }
}

// ── Priority escalation scenario (§8 scenario 4) ──────────────────────────────

#[cfg(test)]
mod priority_escalation {
    #[test]
    fn wait_steps_before_start_follows_two_to_the_k_over_two() {
        // retry k -> wait_steps_before_start = 2^k / 2, per §4.1.
        let expect = |k: u32| 2u64.pow(k) / 2;
        assert_eq!(expect(0), 0);
        assert_eq!(expect(1), 1);
        assert_eq!(expect(2), 2);
        assert_eq!(expect(3), 4);
    }
}
