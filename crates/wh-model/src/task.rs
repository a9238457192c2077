//! Task: the unit of work `Dispatch` enqueues on a bot.

use wh_core::{NodeId, PodId, StationId, TaskId};

use crate::order::{ExtractRequest, InsertRequest};

/// A unit of dispatched work.
#[derive(Clone, Debug)]
pub enum Task {
    Extract {
        id: TaskId,
        pod: PodId,
        station: StationId,
        requests: Vec<ExtractRequest>,
    },
    Insert {
        id: TaskId,
        pod: PodId,
        station: StationId,
        requests: Vec<InsertRequest>,
    },
    ParkPod {
        id: TaskId,
        pod: PodId,
        dest: NodeId,
    },
    Rest {
        id: TaskId,
    },
}

impl Task {
    pub fn id(&self) -> TaskId {
        match self {
            Task::Extract { id, .. }
            | Task::Insert { id, .. }
            | Task::ParkPod { id, .. }
            | Task::Rest { id } => *id,
        }
    }

    pub fn pod(&self) -> Option<PodId> {
        match self {
            Task::Extract { pod, .. } | Task::Insert { pod, .. } | Task::ParkPod { pod, .. } => Some(*pod),
            Task::Rest { .. } => None,
        }
    }

    pub fn station(&self) -> Option<StationId> {
        match self {
            Task::Extract { station, .. } | Task::Insert { station, .. } => Some(*station),
            Task::ParkPod { .. } | Task::Rest { .. } => None,
        }
    }

    /// Append an extract request to an in-flight Extract task — used by
    /// on-the-fly augmentation.
    pub fn add_extract_request(&mut self, req: ExtractRequest) {
        if let Task::Extract { requests, .. } = self {
            requests.push(req);
        } else {
            debug_assert!(false, "add_extract_request called on non-Extract task");
        }
    }

    /// Append an insert request to an in-flight Insert task.
    pub fn add_insert_request(&mut self, req: InsertRequest) {
        if let Task::Insert { requests, .. } = self {
            requests.push(req);
        } else {
            debug_assert!(false, "add_insert_request called on non-Insert task");
        }
    }
}
