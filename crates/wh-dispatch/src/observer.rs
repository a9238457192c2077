//! `Observer` — callbacks invoked as `Engine` assigns tasks and completes
//! ticks (§6: "the engine emits typed records through an `Observer`
//! trait... it never writes CSV/Parquet/SQLite itself"), adapted from
//! `dt_sim`'s `SimObserver`/`NoopObserver` split.
//!
//! All methods have default no-op implementations so implementors only
//! need to override what they care about.

use wh_core::{BotId, StationId, Tick};

use crate::engine::TaskAssignOutcome;

/// Callbacks invoked around the embedding simulation's own calls into
/// [`crate::Engine`]. The engine never advances its own clock or loops over
/// ticks itself (§5: single-threaded cooperative, driven by the caller) —
/// these hooks exist purely for observability, mirroring the division of
/// labor between `dt_sim::SimObserver` and `dt_output::SimOutputObserver`.
pub trait Observer {
    /// Called right before an `Engine::request_task` call.
    fn on_task_requested(&mut self, _bot: BotId, _station: StationId, _now: Tick) {}

    /// Called right after `Engine::request_task` resolves.
    fn on_task_assigned(&mut self, _bot: BotId, _station: StationId, _outcome: TaskAssignOutcome) {}

    /// Called after `Engine::on_tick` finishes processing for `tick`.
    fn on_tick_end(&mut self, _tick: Tick) {}
}

/// An [`Observer`] that does nothing. Use when you need the hook points but
/// don't want callbacks.
pub struct NoopObserver;

impl Observer for NoopObserver {}
