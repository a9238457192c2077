//! HADOD's precomputed `_Ziops[station][pod]` table (§4.4, §9): for each
//! candidate station, which unused pods could serve which backlog orders,
//! snapshotted once per tick rather than recomputed live.
//!
//! §9 Open Question resolution: the table is built in one pass over
//! `(station, pod)` pairs up front (`HadodIndex::build`) instead of being
//! mutated while the HADOD strategy iterates it — avoids the
//! non-deterministic removal order a live, shared table would produce.

use std::collections::HashMap;

use wh_core::{ItemId, OrderId, PodId, StationId};
use wh_model::{ExtractRequest, Pod, PodStore, Station, StationStore};
use wh_select::{Backlog, HadodTable};

use crate::book::OrderBook;

pub struct HadodIndex {
    table: HashMap<StationId, Vec<(PodId, Vec<ExtractRequest>)>>,
}

impl HadodIndex {
    /// Snapshot request coverage for every (candidate station, unused pod)
    /// pair against that station's current backlog candidates.
    pub fn build(book: &OrderBook<'_>, stations: &StationStore, pods: &PodStore) -> Self {
        let mut table = HashMap::new();
        for station_id in stations.ids() {
            let station = stations.get(station_id);
            let candidate_orders = book.candidates(station);
            let mut per_pod = Vec::new();
            for pod_id in pods.unused_pods() {
                let pod = pods.get(pod_id);
                let requests = requests_for_pod(book, pod, station, &candidate_orders);
                if !requests.is_empty() {
                    per_pod.push((pod_id, requests));
                }
            }
            table.insert(station_id, per_pod);
        }
        Self { table }
    }
}

fn requests_for_pod(
    book: &OrderBook<'_>,
    pod: &Pod,
    station: &Station,
    candidate_orders: &[OrderId],
) -> Vec<ExtractRequest> {
    let mut remaining: HashMap<ItemId, u32> =
        pod.item_descriptions_contained().map(|(item, _)| (item, pod.count_available(item))).collect();
    let mut requests = Vec::new();
    for &oid in candidate_orders {
        let order = book.order_ref(oid);
        for &(item, required) in &order.positions {
            let avail = remaining.entry(item).or_insert(0);
            let take = required.min(*avail);
            *avail -= take;
            for _ in 0..take {
                requests.push(ExtractRequest { item, order: oid, station: Some(station.id) });
            }
        }
    }
    requests
}

impl HadodTable for HadodIndex {
    fn candidates(&self, station: StationId) -> Vec<(PodId, Vec<ExtractRequest>)> {
        self.table.get(&station).cloned().unwrap_or_default()
    }
}
