//! `EngineConfig` — a plain record of every tunable the engine needs, mirroring
//! `dt_core::SimConfig`'s style (a flat struct of plain fields, no file
//! parsing or env lookup here).

use wh_orders::OrderBookConfig;
use wh_planner::PlannerConfig;
use wh_sa::SaConfig;
use wh_scorers::ScorerConfig;
use wh_select::FilterMode;

/// Which pod-selection manager runs `request_task`'s extract-side decisions
/// (§4.4's named managers).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExtractStrategyKind {
    /// Lexicographic `BestOf` over `extract_criteria`.
    #[default]
    Default,
    /// Fully-Demand: whole-order-from-one-pod first, pod-set fallback.
    FullyDemand,
    /// HADOD: precomputed per-(station, pod) table, rebuilt once per tick.
    Hadod,
    /// Dispenses pods the simulated-annealing optimizer already staged.
    SimulatedAnnealing,
}

/// Which pod-selection manager runs `request_task`'s insert-side decisions.
/// Only `Default` is implemented (§9, `wh_select::insert` module doc).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InsertStrategyKind {
    #[default]
    Default,
}

/// Everything `Engine` needs to construct its strategies, planner, and
/// optimizer, plus the seams each one threads through per call.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Simulated seconds per planning tick; feeds `wh_core::TickClock`.
    pub tick_step_secs: f64,
    /// Master RNG seed. The same seed always reproduces the same decisions.
    pub seed: u64,

    pub extract_strategy: ExtractStrategyKind,
    pub insert_strategy: InsertStrategyKind,
    pub extract_criteria: Vec<ScorerConfig>,
    pub insert_criteria: Vec<ScorerConfig>,
    pub extract_filter_mode: FilterMode,
    /// §4.4 preamble: search a nearby station before parking a carried pod
    /// with no relevant request at the requesting station.
    pub extend_search: bool,
    pub extend_radius: f64,

    /// Simulated-annealing tuning; `None` disables the optimizer entirely
    /// (a bot requesting work at a station with `ExtractStrategyKind::
    /// SimulatedAnnealing` then always falls back to the greedy branch).
    pub sa: Option<SaConfig>,
    pub order_book: OrderBookConfig,
    pub planner: PlannerConfig,

    /// Planner path-estimate search budget reused by `PlannerPathEstimator`
    /// for scorer calls, separate from `planner`'s own WHCA* budget since
    /// scoring happens far more often per tick than actual path commits.
    pub estimator_max_expansions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_step_secs: 1.0,
            seed: 1,
            extract_strategy: ExtractStrategyKind::default(),
            insert_strategy: InsertStrategyKind::default(),
            extract_criteria: vec![ScorerConfig::Nearest {
                metric: wh_scorers::NearestMetric::ShortestPath,
                prefer_same_tier: true,
                tier_penalty: 1.0,
            }],
            insert_criteria: vec![ScorerConfig::Nearest {
                metric: wh_scorers::NearestMetric::ShortestPath,
                prefer_same_tier: true,
                tier_penalty: 1.0,
            }],
            extract_filter_mode: FilterMode::AssignedAndQueuedEqually,
            extend_search: false,
            extend_radius: 0.0,
            sa: None,
            order_book: OrderBookConfig::default(),
            planner: PlannerConfig::default(),
            estimator_max_expansions: 2_000,
        }
    }
}

impl EngineConfig {
    /// §7's construction-time validation: incompatible manager combinations
    /// are a configuration error, not a panic.
    pub fn validate(&self) -> Result<(), crate::error::DispatchError> {
        if self.extract_strategy == ExtractStrategyKind::SimulatedAnnealing && self.sa.is_none() {
            return Err(crate::error::DispatchError::InvalidConfig(
                "extract_strategy is SimulatedAnnealing but no SaConfig was supplied".into(),
            ));
        }
        if self.tick_step_secs <= 0.0 {
            return Err(crate::error::DispatchError::InvalidConfig("tick_step_secs must be positive".into()));
        }
        if self.extend_search && self.extend_radius <= 0.0 {
            return Err(crate::error::DispatchError::InvalidConfig(
                "extend_search is set but extend_radius is not positive".into(),
            ));
        }
        Ok(())
    }
}
