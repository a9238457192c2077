//! Collects the pool of bots eligible for a new SA-driven assignment this
//! update (§4.6 step 3).

use wh_core::{BotId, NodeId, Tick};
use wh_model::{BotStore, BotTaskKind};
use wh_planner::Planner;

/// A bot ready to be handed a new Extract task, with where and when it
/// becomes available.
///
/// `Bot` tracks only a single `current_task` (no queued-task list), so the
/// "no queued future tasks" half of the eligibility rule in §4.6 step 3 is
/// automatically satisfied by `Bot::sa_eligible` — there is nowhere for a
/// queued task to live in this model.
#[derive(Clone, Copy, Debug)]
pub struct AvailableBot {
    pub bot: BotId,
    pub ready_at: Tick,
    pub start: NodeId,
}

/// `None`/`Rest` bots are available immediately from their current node.
/// A `ParkPod` bot becomes available once its tail reservation at its
/// target node ends, starting from that parked position.
pub fn collect_available_bots(bots: &BotStore, planner: &Planner, now: Tick) -> Vec<AvailableBot> {
    let mut out = Vec::new();
    for bot in bots.iter() {
        if !bot.sa_eligible() {
            continue;
        }
        match bot.task_kind {
            BotTaskKind::None | BotTaskKind::Rest => {
                out.push(AvailableBot { bot: bot.id, ready_at: now, start: bot.current_node });
            }
            BotTaskKind::ParkPod => {
                let ready_at = planner.find_end_reservation(bot.target_node).unwrap_or(now);
                out.push(AvailableBot { bot: bot.id, ready_at, start: bot.target_node });
            }
            _ => {}
        }
    }
    out
}

/// `true` if at least one bot in the pool is genuinely idle or resting
/// (not merely finishing a park) — the condition under which §4.6 step 3
/// allows the update to proceed at all.
pub fn has_idle_or_resting(bots: &BotStore) -> bool {
    bots.iter().any(|b| matches!(b.task_kind, BotTaskKind::None | BotTaskKind::Rest))
}
