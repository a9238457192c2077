//! `wh-planner` — windowed hierarchical cooperative A* (WHCA*) path planning
//! over a committed reservation table, with a speculative "scheduled" table
//! the SA optimizer uses to try candidate plans in isolation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|------------------------------------------------------------|
//! | [`reservation`]  | `ReservationTable` — per-node disjoint occupancy intervals |
//! | [`rra`]          | `RraCache` — reverse-resumable A* heuristic                |
//! | [`spacetime`]    | Single-agent space-time A* search                           |
//! | [`planner`]      | `Planner`, `AgentRequest`, `PlannerConfig`                  |
//! | [`error`]        | `PlannerError`, `PlannerResult`                             |

pub mod error;
pub mod planner;
pub mod reservation;
pub mod rra;
pub mod spacetime;

#[cfg(test)]
mod tests;

pub use error::{PlannerError, PlannerResult};
pub use planner::{AgentRequest, FindPathsOutcome, Planner, PlannerConfig};
pub use reservation::ReservationTable;
pub use rra::RraCache;
pub use spacetime::{search, PathStep, SearchOutcome};
