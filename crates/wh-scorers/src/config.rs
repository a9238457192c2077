//! `ScorerConfig` — a tagged-variant description of which scorer to run and
//! how, replacing what a naive port would express as a set of classes
//! resolved via runtime downcast dispatch (§9 design note).

/// Distance metric used by the `Nearest` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearestMetric {
    Euclidean,
    Manhattan,
    /// Untimed shortest-path length via `ScoreContext::path_cost`.
    ShortestPath,
    /// Shortest-time estimate (planner space-time search) via
    /// `ScoreContext::path_cost`.
    ShortestTime,
}

/// Which quantity the `WorkAmount` family rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMetric {
    /// Count of item units the pod can realize against `relevant_orders`.
    Picks,
    /// Sum of `now - time_placed` over `relevant_orders`.
    OrderAge,
    /// Sum of `due_time - now` over `relevant_orders`; if `clip_lateness`,
    /// an already-late order contributes zero instead of a negative value.
    OrderDueTime { clip_lateness: bool },
}

/// Which scorer to evaluate and its parameters (§4.2).
///
/// All scorers follow the minimization convention: a lower score is a
/// better candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScorerConfig {
    /// `±U[0, 1)`, negated (made more attractive) when the tier preference
    /// is satisfied.
    Random { prefer_same_tier: bool },
    /// Distance by `metric`, plus a tier-mismatch penalty when no direct
    /// route exists and the fallback Manhattan estimate is used.
    Nearest { metric: NearestMetric, prefer_same_tier: bool, tier_penalty: f64 },
    /// Negative picks-realizable or negative sum-of-order-ages/due-times —
    /// a "bigger is better" quantity expressed as a score to minimize.
    WorkAmount { value: ValueMetric },
    /// `-Σ min(global_demand[item], pod_offer[item])` over the pod's
    /// contents.
    Demand,
    /// `-`count of `relevant_orders` the pod alone can fully complete.
    Completeable,
    /// Prefers the fullest or emptiest pod, by total contained item count.
    Fill { prefer_full: bool, analog: bool },
    /// Sum of planner path-cost estimates bot→pod and pod→station; `+∞` if
    /// either leg has no route.
    Congestion,
}
