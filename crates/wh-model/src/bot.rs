//! Bot entity: a mobile agent that carries at most one pod.

use wh_core::{BotId, NodeId, PodId, TaskId};

/// What a bot is currently doing, from the planner/dispatch point of view.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BotTaskKind {
    #[default]
    None,
    Rest,
    Extract,
    Insert,
    ParkPod,
}

/// An autonomous agent that moves on the waypoint graph.
///
/// Invariant: `carried_pod.is_some()` implies the referenced pod's `carrier`
/// equals this bot's id — enforced by [`crate::store::PodStore::claim_carry`].
#[derive(Clone, Debug)]
pub struct Bot {
    pub id: BotId,
    pub tier: u8,
    pub current_node: NodeId,
    pub target_node: NodeId,
    pub carried_pod: Option<PodId>,
    pub current_task: Option<TaskId>,
    pub task_kind: BotTaskKind,
    /// Retry-priority used by the planner; 0 means "no scheduled priority".
    /// Raised on space-time A* failure (§4.1).
    pub priority: u32,
}

impl Bot {
    pub fn new(id: BotId, tier: u8, current_node: NodeId) -> Self {
        Self {
            id,
            tier,
            current_node,
            target_node: current_node,
            carried_pod: None,
            current_task: None,
            task_kind: BotTaskKind::None,
            priority: 0,
        }
    }

    /// Eligible for the SA optimizer's bot pool: idle, resting, or parking
    /// with no queued future tasks (§4.6 step 3).
    pub fn sa_eligible(&self) -> bool {
        matches!(
            self.task_kind,
            BotTaskKind::None | BotTaskKind::Rest | BotTaskKind::ParkPod
        )
    }
}
