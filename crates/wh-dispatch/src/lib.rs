//! `wh-dispatch` — the outer orchestrator: per-bot task dispatch, on-the-fly
//! augmentation, and the two entry points (`request_task`, `on_tick`) the
//! embedding simulation drives (§4.7).
//!
//! # Division of labor
//!
//! `Engine` does not own the warehouse's entity stores or order backlog —
//! see [`DispatchWorld`][engine::DispatchWorld]'s doc comment for why —
//! so every call threads them through as explicit parameters, the same
//! pattern `wh_sa::Optimizer::update` already uses one layer down.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_dispatch::{DispatchWorld, Engine, EngineConfig, NoopObserver};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! let mut world = DispatchWorld { graph: &graph, bots: &mut bots, pods: &mut pods,
//!     stations: &mut stations, orders: &orders, backlog: &mut book };
//! let mut observer = NoopObserver;
//! engine.request_task(&mut world, &mut observer, bot_id, station_id, now);
//! engine.on_tick(&mut world, &mut observer, now);
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod observer;


pub use config::{EngineConfig, ExtractStrategyKind, InsertStrategyKind};
pub use dispatch::Dispatch;
pub use engine::{DispatchWorld, Engine, TaskAssignOutcome};
pub use error::{DispatchError, DispatchResult};
pub use observer::{NoopObserver, Observer};
