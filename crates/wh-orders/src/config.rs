//! Fully-supplied order-book configuration (spec §6: "Fully-supplied:
//! `{tie_breaker, fast_lane, fast_lane_tie_breaker, late_before_match}`").

/// How to order otherwise-equal candidates: `candidates()` traversal order
/// and the fast-lane pick among several nearest-pod-coverable orders.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TieBreaker {
    Random,
    EarliestDueTime,
    Fcfs,
}

#[derive(Clone, Debug)]
pub struct OrderBookConfig {
    pub tie_breaker: TieBreaker,
    pub fast_lane: bool,
    pub fast_lane_tie_breaker: TieBreaker,
    /// If set, the late backlog is always drained before the not-late one;
    /// if clear, `late_orders_enough` alone decides whether to skip the
    /// not-late backlog this round.
    pub late_before_match: bool,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            tie_breaker: TieBreaker::Fcfs,
            fast_lane: false,
            fast_lane_tie_breaker: TieBreaker::Fcfs,
            late_before_match: true,
        }
    }
}
