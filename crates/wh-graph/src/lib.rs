//! `wh-graph` — warehouse waypoint graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                               |
//! |-------------|----------------------------------------------------------|
//! | [`network`] | `WaypointGraph` (CSR + R-tree), `WaypointGraphBuilder`  |
//! | [`router`]  | `Router` trait, `Route`, `DistanceField`, `DijkstraRouter` |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use network::{WaypointGraph, WaypointGraphBuilder};
pub use router::{DijkstraRouter, DistanceField, Route, Router};
