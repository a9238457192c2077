//! `wh-select` — `BestOf` lexicographic candidate selection and the
//! pod-selection strategies (Default, Fully-Demand, HADOD, Simulated
//! Annealing delegate) that pick a pod for an idle bot requesting work at a
//! station (§4.3, §4.4).
//!
//! # Crate layout
//!
//! | Module               | Contents                                               |
//! |-----------------------|--------------------------------------------------------|
//! | [`best_of`]           | `BestOf` — lexicographic multi-criterion selector      |
//! | [`path_estimator`]    | `PlannerPathEstimator` — `wh_scorers::PathEstimator` over `wh_planner` |
//! | [`possible_requests`] | Fitting-request materialization for extract stations   |
//! | [`pod_set`]           | `reserve_pod_set_for_order` — shared pod-set assembly   |
//! | [`backlog`]           | `Backlog`, `HadodTable` — seam traits toward `wh-orders`|
//! | [`strategy`]          | Extract-station strategies                              |
//! | [`insert`]            | Insert-station strategies (symmetric, narrower scope)   |
//! | [`error`]             | `SelectError`, `SelectResult<T>`                        |

pub mod backlog;
pub mod best_of;
pub mod error;
pub mod insert;
pub mod path_estimator;
pub mod pod_set;
pub mod possible_requests;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use backlog::{Backlog, HadodTable};
pub use best_of::BestOf;
pub use error::{SelectError, SelectResult};
pub use insert::{DefaultInsertStrategy, InsertContext, InsertOutcome, InsertStrategy};
pub use path_estimator::PlannerPathEstimator;
pub use pod_set::reserve_pod_set_for_order;
pub use possible_requests::{possible_requests, FilterMode};
pub use strategy::{
    DefaultStrategy, ExtractContext, ExtractStrategy, FullyDemandStrategy, HadodStrategy,
    SimulatedAnnealingStrategy, TaskOutcome,
};
