//! `wh-core` — foundational types for the warehouse task-allocation engine.
//!
//! This crate is a dependency of every other `wh-*` crate.  It intentionally
//! has no `wh-*` dependencies and minimal external ones (only `rand`, `log`,
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `ItemId`, `PodId`, `BotId`, `StationId`, `OrderId`, `TaskId`, `NodeId`, `EdgeId` |
//! | [`geo`]   | `Point2D`, Euclidean/Manhattan distance                |
//! | [`time`]  | `Tick`, `Interval`, `TickClock`                         |
//! | [`rng`]   | `Rng` — deterministic, seedable                         |
//! | [`error`] | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point2D;
pub use ids::{BotId, EdgeId, ItemId, NodeId, OrderId, PodId, StationId, TaskId};
pub use rng::{Randomizer, Rng};
pub use time::{Clock, Interval, Tick, TickClock};
