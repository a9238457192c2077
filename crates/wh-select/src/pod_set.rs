//! Shared pod-set assembly (§4.4 pod-set mode, §9 "pending-pod-set logic is
//! currently replicated across four strategies; extract into a single
//! helper").

use std::collections::{HashMap, HashSet};

use wh_core::{ItemId, PodId};
use wh_model::{Order, Pod};

/// Greedily assembles a set of unused pods able to fulfill `order`: repeatedly
/// claims the pod contributing the most remaining-item coverage until the
/// order is fully satisfiable.
///
/// The caller dispenses `result[0]` immediately and stashes the rest in
/// `pending_pods[station]` for subsequent bot requests (§4.4).
///
/// # Panics
/// Panics (debug-mode invariant) if no subset of `unused_pods` can satisfy
/// `order` — callers must confirm fulfillability first, e.g. via
/// `Backlog::oldest_fulfillable`.
pub fn reserve_pod_set_for_order(order: &Order, unused_pods: &[&Pod]) -> Vec<PodId> {
    let mut remaining: HashMap<ItemId, u32> = order.positions.iter().copied().collect();
    let mut claimed_set: HashSet<PodId> = HashSet::new();
    let mut claimed = Vec::new();

    while remaining.values().any(|&n| n > 0) {
        let next = unused_pods
            .iter()
            .filter(|p| !claimed_set.contains(&p.id))
            .map(|p| {
                let contribution: u32 = remaining
                    .iter()
                    .map(|(&item, &need)| need.min(p.count_available(item)))
                    .sum();
                (p.id, contribution)
            })
            .filter(|&(_, contribution)| contribution > 0)
            .max_by_key(|&(_, contribution)| contribution);

        let Some((pod_id, _)) = next else {
            debug_assert!(false, "no subset of unused pods can satisfy order {:?}", order.id);
            break;
        };

        let pod = unused_pods.iter().find(|p| p.id == pod_id).expect("pod_id came from unused_pods");
        for (&item, need) in remaining.iter_mut() {
            let take = (*need).min(pod.count_available(item));
            *need -= take;
        }
        claimed_set.insert(pod_id);
        claimed.push(pod_id);
    }

    claimed
}
