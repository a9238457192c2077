//! `wh-scorers` — pure scoring functions for candidate (bot, pod, station)
//! triples, used by `BestOf` selection in `wh-select`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|-----------------------------------------------------------|
//! | [`config`]  | `ScorerConfig` — tagged-variant scorer description       |
//! | [`context`] | `ScoreContext`, `PathEstimator`                           |
//! | [`scorer`]  | `score(config, ctx) -> f64`                               |
//! | [`tier`]    | Tier-mismatch penalty shared across scorer families        |
//! | [`error`]   | `ScorerError`, `ScorerResult<T>`                           |
//!
//! Every scorer follows the **minimization convention**: a lower score is a
//! better candidate (§4.2).

pub mod config;
pub mod context;
pub mod error;
pub mod scorer;
pub mod tier;


pub use config::{NearestMetric, ScorerConfig, ValueMetric};
pub use context::{NoPathEstimator, PathEstimator, ScoreContext};
pub use error::{ScorerError, ScorerResult};
pub use scorer::score;
