//! Fitting-request materialization (§4.4): which extract requests a pod can
//! actually serve for a station, given its available inventory.

use std::collections::HashMap;

use wh_core::ItemId;
use wh_model::{ExtractRequest, Order, OrderStore, Pod, Station};

/// Which of the station's queued (not-yet-assigned) orders are admitted
/// alongside its already-assigned ones.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FilterMode {
    /// Only the station's `assigned_orders` are considered.
    AssignedOnly,
    /// Assigned orders, then queued orders, both filled greedily per item.
    AssignedAndQueuedEqually,
    /// Assigned orders, then queued orders — but a queued order is only
    /// admitted if every one of its item requirements fits in full.
    AssignedAndCompleteQueued,
}

/// Fill extract requests for `pod` against `station`'s orders, up to the
/// pod's `count_available(item)` for each item. Assigned orders are always
/// consumed first (in station order); queued orders are then considered
/// per `filter_mode`.
///
/// `already` is whatever this pod has already been asked to pull — empty
/// for a fresh dispatch, the in-flight task's own `requests` when called
/// again by on-the-fly augmentation (§4.7). Without it a re-invocation
/// against the same `assigned_orders` would recompute each order's full
/// requirement from scratch and re-request units it was already given.
pub fn possible_requests(
    pod: &Pod,
    station: &Station,
    orders: &OrderStore,
    filter_mode: FilterMode,
    already: &[ExtractRequest],
) -> Vec<ExtractRequest> {
    let mut remaining: HashMap<ItemId, u32> = pod
        .item_descriptions_contained()
        .map(|(item, _)| (item, pod.count_available(item)))
        .collect();
    let mut requests = Vec::new();

    for &order_id in &station.assigned_orders {
        take_from_order(orders.get(order_id), &mut remaining, station, already, &mut requests);
    }

    if filter_mode == FilterMode::AssignedOnly {
        return requests;
    }

    for &order_id in &station.queued_orders {
        let order = orders.get(order_id);
        let admit = match filter_mode {
            FilterMode::AssignedAndQueuedEqually => true,
            FilterMode::AssignedAndCompleteQueued => order
                .positions
                .iter()
                .all(|&(item, n)| remaining.get(&item).copied().unwrap_or(0) >= n),
            FilterMode::AssignedOnly => unreachable!(),
        };
        if admit {
            take_from_order(order, &mut remaining, station, already, &mut requests);
        }
    }

    requests
}

fn take_from_order(
    order: &Order,
    remaining: &mut HashMap<ItemId, u32>,
    station: &Station,
    already: &[ExtractRequest],
    out: &mut Vec<ExtractRequest>,
) {
    for &(item, required) in &order.positions {
        let already_taken = already.iter().filter(|r| r.order == order.id && r.item == item).count() as u32;
        let required = required.saturating_sub(already_taken);
        let avail = remaining.entry(item).or_insert(0);
        let take = required.min(*avail);
        *avail -= take;
        for _ in 0..take {
            out.push(ExtractRequest {
                item,
                order: order.id,
                station: Some(station.id),
            });
        }
    }
}
