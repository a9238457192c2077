//! `wh-model` — pod, bot, station, order, and task entities for the
//! warehouse task-allocation engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                             |
//! |-------------|-----------------------------------------------------------|
//! | [`pod`]     | `Pod`, `PodState`                                      |
//! | [`bot`]     | `Bot`, `BotTaskKind`                                    |
//! | [`station`] | `Station`, `StationKind`                                |
//! | [`order`]   | `Order`, `OrderStatus`, `ExtractRequest`, `InsertRequest` |
//! | [`task`]    | `Task`                                                  |
//! | [`store`]   | `PodStore`, `BotStore`, `StationStore`, `OrderStore`    |
//! | [`builder`] | `World`, `WorldBuilder`                                 |

pub mod bot;
pub mod builder;
pub mod order;
pub mod pod;
pub mod station;
pub mod store;
pub mod task;


pub use bot::{Bot, BotTaskKind};
pub use builder::{World, WorldBuilder};
pub use order::{ExtractRequest, InsertRequest, Order, OrderStatus};
pub use pod::{Pod, PodState};
pub use station::{Station, StationKind};
pub use store::{BotStore, OrderStore, PodStore, StationStore};
pub use task::Task;
