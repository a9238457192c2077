//! `Engine` — the top-level orchestrator (§4.7): owns the planner, the
//! dispatch table, and (optionally) the simulated-annealing optimizer, and
//! exposes the two entry points the host simulation calls, `request_task`
//! and `on_tick`.
//!
//! Mirrors `dt_sim::Sim` in shape but not in ownership: `dt_sim::Sim` owns
//! its `AgentStore` outright, while here the order backlog
//! (`wh_orders::OrderBook<'a>`) borrows from an `OrderStore` the caller
//! owns. A struct cannot hold both an owner and a borrow into itself
//! without self-referential tricks this stack doesn't reach for, so
//! `Engine` — like `wh_sa::Optimizer` before it — owns no entity stores or
//! backlog at all; every call threads them through as parameters.

use std::collections::HashMap;

use log::{debug, warn};
use wh_core::{BotId, PodId, StationId, Tick, TickClock};
use wh_graph::WaypointGraph;
use wh_model::{Bot, BotStore, BotTaskKind, OrderStore, PodStore, StationKind, StationStore};
use wh_orders::HadodIndex;
use wh_planner::Planner;
use wh_sa::Optimizer;
use wh_select::{
    Backlog, DefaultInsertStrategy, DefaultStrategy, ExtractContext, ExtractStrategy, FullyDemandStrategy,
    HadodStrategy, InsertContext, InsertOutcome, InsertStrategy, PlannerPathEstimator, SimulatedAnnealingStrategy,
    TaskOutcome,
};

use crate::config::{EngineConfig, ExtractStrategyKind, InsertStrategyKind};
use crate::dispatch::Dispatch;
use crate::error::DispatchResult;
use crate::observer::Observer;

/// Everything a `request_task`/`on_tick` call needs that lives outside
/// `Engine` itself — the entity stores and the order backlog, owned by the
/// caller (§4.7, see the module doc for why `Engine` can't own these).
pub struct DispatchWorld<'w, B: Backlog> {
    pub graph: &'w WaypointGraph,
    pub bots: &'w mut BotStore,
    pub pods: &'w mut PodStore,
    pub stations: &'w mut StationStore,
    pub orders: &'w OrderStore,
    pub backlog: &'w mut B,
}

/// Outcome of one `Engine::request_task` call, mirroring
/// `wh_select::TaskOutcome`/`InsertOutcome` but reporting whether Dispatch
/// actually enqueued something.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskAssignOutcome {
    Enqueued,
    ParkPod,
    NoTask,
}

pub struct Engine {
    config: EngineConfig,
    clock: TickClock,
    rng: wh_core::Rng,
    planner: Planner,
    dispatch: Dispatch,
    sa: Option<Optimizer>,
    pending_pods: HashMap<StationId, Vec<PodId>>,
    hadod: Option<HadodIndex>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> DispatchResult<Self> {
        config.validate()?;
        let clock = TickClock::new(config.tick_step_secs);
        let rng = wh_core::Rng::new(config.seed);
        let planner = Planner::new(config.planner.clone());
        let sa = config.sa.clone().map(Optimizer::new);
        Ok(Self {
            config,
            clock,
            rng,
            planner,
            dispatch: Dispatch::new(),
            sa,
            pending_pods: HashMap::new(),
            hadod: None,
        })
    }

    pub fn clock(&self) -> TickClock {
        self.clock
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Hand `Engine` a freshly built HADOD index for this tick, when
    /// `extract_strategy` is [`ExtractStrategyKind::Hadod`]. Build it with
    /// `wh_orders::HadodIndex::build(&order_book, stations, pods)` after
    /// allocating orders for the tick.
    pub fn set_hadod_index(&mut self, index: HadodIndex) {
        self.hadod = Some(index);
    }

    /// §4.7: a bot idle at `station` requests its next task.
    ///
    /// Built as one big method rather than several `&mut self` helpers:
    /// the path estimator below borrows `self.planner` for the whole call,
    /// and the strategy dispatch that follows needs `self.hadod` and
    /// `self.pending_pods` at the same time, so those fields are threaded
    /// through as disjoint borrows instead of going through a `&mut self`
    /// method that would reborrow the whole struct.
    ///
    /// `observer` is notified before the pick (`on_task_requested`) and
    /// after it lands (`on_task_assigned`), whatever the outcome — §6's
    /// statistics records are a caller-side concern built from these
    /// callbacks, not something this method aggregates itself.
    pub fn request_task<B: Backlog, O: Observer>(
        &mut self,
        world: &mut DispatchWorld<'_, B>,
        observer: &mut O,
        bot: BotId,
        station: StationId,
        now: Tick,
    ) -> TaskAssignOutcome {
        observer.on_task_requested(bot, station, now);
        let kind = world.bots.get(bot).task_kind;
        match kind {
            BotTaskKind::Extract | BotTaskKind::Insert => {
                debug_assert!(false, "request_task called for bot {bot:?} with a pending task already in flight");
                observer.on_task_assigned(bot, station, TaskAssignOutcome::NoTask);
                return TaskAssignOutcome::NoTask;
            }
            _ => {}
        }

        let global_demand: HashMap<wh_core::ItemId, u32> = HashMap::new();
        let estimator = PlannerPathEstimator::new(
            world.graph,
            self.planner.committed_table(),
            bot,
            now,
            self.config.planner.wait_ticks,
            self.config.planner.window_ticks,
            self.config.estimator_max_expansions,
        );
        let bot_snapshot = world.bots.get(bot).clone();

        let outcome = match world.stations.get(station).kind {
            StationKind::Output => {
                let mut ctx = ExtractContext {
                    graph: world.graph,
                    stations: world.stations,
                    pods: world.pods,
                    orders: world.orders,
                    now,
                    filter_mode: self.config.extract_filter_mode,
                    extend: self.config.extend_search,
                    radius: self.config.extend_radius,
                    global_demand: &global_demand,
                    path_cost: &estimator,
                    rng: &mut self.rng,
                };
                let task = run_extract_strategy(
                    &self.config.extract_strategy,
                    &self.config.extract_criteria,
                    &self.hadod,
                    &mut self.pending_pods,
                    world.backlog,
                    &bot_snapshot,
                    station,
                    &mut ctx,
                );
                ExtractOrInsert::Extract(task)
            }
            StationKind::Input => {
                let pending_bundles = HashMap::new();
                let mut ctx = InsertContext {
                    graph: world.graph,
                    stations: world.stations,
                    pods: world.pods,
                    pending_bundles: &pending_bundles,
                    now,
                    global_demand: &global_demand,
                    path_cost: &estimator,
                    rng: &mut self.rng,
                };
                let task = match self.config.insert_strategy {
                    InsertStrategyKind::Default => {
                        let mut s = DefaultInsertStrategy { criteria: self.config.insert_criteria.clone() };
                        s.do_insert_for_station(&bot_snapshot, station, &mut ctx)
                    }
                };
                ExtractOrInsert::Insert(task)
            }
        };

        let assigned = self.apply_outcome(world, bot, station, outcome);
        observer.on_task_assigned(bot, station, assigned);
        assigned
    }

    fn apply_outcome<B: Backlog>(
        &mut self,
        world: &mut DispatchWorld<'_, B>,
        bot: BotId,
        station: StationId,
        outcome: ExtractOrInsert,
    ) -> TaskAssignOutcome {
        let _ = station;
        match outcome {
            ExtractOrInsert::Extract(TaskOutcome::TaskEnqueued { pod, requests }) => {
                self.dispatch.enqueue_extract(world.bots, world.pods, world.stations, bot, station, pod, requests);
                self.dispatch.note_pod_pickup();
                TaskAssignOutcome::Enqueued
            }
            ExtractOrInsert::Extract(TaskOutcome::ParkPodEnqueued { pod, dest }) => {
                self.dispatch.enqueue_park_pod(world.bots, world.stations, bot, pod, dest);
                TaskAssignOutcome::ParkPod
            }
            ExtractOrInsert::Extract(TaskOutcome::NoTask) => {
                self.dispatch.enqueue_rest(world.bots, bot);
                TaskAssignOutcome::NoTask
            }
            ExtractOrInsert::Insert(InsertOutcome::TaskEnqueued { pod, requests }) => {
                self.dispatch.enqueue_insert(world.bots, world.pods, world.stations, bot, station, pod, requests);
                self.dispatch.note_bundle_allocated();
                TaskAssignOutcome::Enqueued
            }
            ExtractOrInsert::Insert(InsertOutcome::ParkPodEnqueued { pod, dest }) => {
                self.dispatch.enqueue_park_pod(world.bots, world.stations, bot, pod, dest);
                TaskAssignOutcome::ParkPod
            }
            ExtractOrInsert::Insert(InsertOutcome::NoTask) => {
                self.dispatch.enqueue_rest(world.bots, bot);
                TaskAssignOutcome::NoTask
            }
        }
    }

    /// §4.7 outer tick entry point: run the SA optimizer if its
    /// `update_period` has elapsed, then run on-the-fly augmentation.
    pub fn on_tick<B: Backlog, O: Observer>(&mut self, world: &mut DispatchWorld<'_, B>, observer: &mut O, now: Tick) {
        self.run_sa_if_due(world, now);

        // A new order allocated anywhere since the last tick (whether by
        // `request_task`'s own strategies above or by the host simulation
        // submitting/allocating orders between ticks) bumps the backlog's
        // generation counter; treat that as reason to re-examine every
        // in-flight bot's carried pod below (§4.7).
        self.dispatch.poll_order_generation(world.backlog.generation());

        if self.config.extract_strategy == ExtractStrategyKind::Hadod && self.hadod.is_none() {
            // Building the index requires a concrete `wh_orders::OrderBook`,
            // not the `Backlog` seam trait this module is written against —
            // callers running the Hadod manager build it themselves and
            // hand it in via `Engine::set_hadod_index` after allocating
            // orders each tick.
            warn!("Hadod extract strategy configured but no index has been supplied this tick");
        }

        // A single shared estimator for ranking augmentation candidates by
        // distance; since this only orders which bot gets checked first it
        // does not need to be specific to any one bot's own reservations.
        let estimator = PlannerPathEstimator::new(
            world.graph,
            self.planner.committed_table(),
            BotId::INVALID,
            now,
            self.config.planner.wait_ticks,
            self.config.planner.window_ticks,
            self.config.estimator_max_expansions,
        );
        self.dispatch.run_extract_augmentation(
            world.bots,
            world.pods,
            world.stations,
            world.orders,
            self.config.extract_filter_mode,
            &estimator,
        );
        observer.on_tick_end(now);
    }

    fn run_sa_if_due<B: Backlog>(&mut self, world: &mut DispatchWorld<'_, B>, now: Tick) {
        let Some(period) = self.config.sa.as_ref().map(|c| c.update_period) else { return };
        if period == 0 || now.0 % period != 0 {
            return;
        }
        let Some(sa) = &mut self.sa else { return };

        let (outcome, assignments) = sa.update(
            world.graph,
            &mut self.planner,
            world.backlog,
            world.stations,
            world.pods,
            world.bots,
            now,
            &mut self.rng,
            &mut self.pending_pods,
        );
        debug!("SA optimizer pass at {now:?}: {outcome:?}, {} assignments", assignments.len());

        for assignment in assignments {
            self.dispatch.enqueue_extract(
                world.bots,
                world.pods,
                world.stations,
                assignment.bot,
                assignment.station,
                assignment.pod,
                assignment.pod_requests,
            );
            self.dispatch.note_pod_pickup();
        }
    }
}

enum ExtractOrInsert {
    Extract(TaskOutcome),
    Insert(InsertOutcome),
}

/// Dispatches to the configured extract-side manager (§4.4). A free
/// function rather than an `Engine` method: its caller still holds a live
/// borrow of `self.planner` through `ctx.path_cost`, so the fields this
/// needs (`hadod`, `pending_pods`) are threaded in individually instead of
/// through a `&mut self` that would reborrow the whole struct.
#[allow(clippy::too_many_arguments)]
fn run_extract_strategy<B: Backlog>(
    kind: &ExtractStrategyKind,
    criteria: &[wh_scorers::ScorerConfig],
    hadod: &Option<HadodIndex>,
    pending_pods: &mut HashMap<StationId, Vec<PodId>>,
    backlog: &mut B,
    bot: &Bot,
    station: StationId,
    ctx: &mut ExtractContext<'_>,
) -> TaskOutcome {
    match kind {
        ExtractStrategyKind::Default => {
            let mut s = DefaultStrategy { criteria: criteria.to_vec() };
            s.do_extract_for_station(bot, station, ctx)
        }
        ExtractStrategyKind::FullyDemand => {
            let mut s = FullyDemandStrategy { backlog, pending_pods };
            s.do_extract_for_station(bot, station, ctx)
        }
        ExtractStrategyKind::Hadod => match hadod {
            Some(table) => {
                let mut s = HadodStrategy { table };
                s.do_extract_for_station(bot, station, ctx)
            }
            None => {
                warn!("Hadod extract strategy requested before the index was built this tick");
                TaskOutcome::NoTask
            }
        },
        ExtractStrategyKind::SimulatedAnnealing => {
            let mut s = SimulatedAnnealingStrategy { backlog, pending_pods };
            s.do_extract_for_station(bot, station, ctx)
        }
    }
}
