use wh_core::BotId;
use wh_graph::SpatialError;
use thiserror::Error;

/// Planner-level failures.
///
/// Per-agent path-finding failure is *not* represented here — it is a value
/// (`find_path`/`find_paths` return a `found: bool` flag, §4.1), not an
/// error, since a single bot failing to find a path is routine and handled
/// by priority escalation. `PlannerError` is reserved for conditions that
/// mean the planner itself cannot proceed.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("graph routing failed: {0}")]
    Routing(#[from] SpatialError),

    #[error("agent {0:?} has no RRA* destination set")]
    NoDestination(BotId),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
