//! Scorer evaluation: `score(config, context) -> f64`, minimization
//! convention throughout (§4.2).

use crate::config::{NearestMetric, ScorerConfig, ValueMetric};
use crate::context::ScoreContext;
use crate::tier::{same_tier, tier_penalty};

/// Evaluate `config` against `ctx`. Lower is better.
pub fn score(config: &ScorerConfig, ctx: &ScoreContext<'_>) -> f64 {
    match config {
        ScorerConfig::Random { prefer_same_tier } => random(ctx, *prefer_same_tier),
        ScorerConfig::Nearest { metric, prefer_same_tier, tier_penalty: penalty } => {
            nearest(ctx, *metric, *prefer_same_tier, *penalty)
        }
        ScorerConfig::WorkAmount { value } => work_amount(ctx, *value),
        ScorerConfig::Demand => demand(ctx),
        ScorerConfig::Completeable => completeable(ctx),
        ScorerConfig::Fill { prefer_full, analog } => fill(ctx, *prefer_full, *analog),
        ScorerConfig::Congestion => congestion(ctx),
    }
}

fn random(ctx: &ScoreContext<'_>, prefer_same_tier: bool) -> f64 {
    let signed = ctx.random_draw * 2.0 - 1.0; // map [0,1) -> [-1,1)
    let tier_ok = same_tier(ctx.bot.tier, ctx.pod.tier, ctx.station.tier);
    if prefer_same_tier && tier_ok {
        -signed.abs()
    } else {
        signed
    }
}

fn nearest(ctx: &ScoreContext<'_>, metric: NearestMetric, prefer_same_tier: bool, penalty: f64) -> f64 {
    let bot_pos = ctx.graph.node_pos[ctx.bot.current_node.index()];
    let pod_pos = ctx.graph.node_pos[ctx.pod.node.index()];
    let station_pos = ctx.graph.node_pos[ctx.station.node.index()];

    let direct = match metric {
        NearestMetric::Euclidean => bot_pos.distance(pod_pos) + pod_pos.distance(station_pos),
        NearestMetric::Manhattan => bot_pos.manhattan(pod_pos) + pod_pos.manhattan(station_pos),
        NearestMetric::ShortestPath | NearestMetric::ShortestTime => {
            let leg1 = ctx.path_cost.estimate(ctx.bot.current_node, ctx.pod.node);
            let leg2 = ctx.path_cost.estimate(ctx.pod.node, ctx.station.node);
            match (leg1, leg2) {
                (Some(a), Some(b)) => a + b,
                // No route at all: fall back to the Manhattan estimate and
                // add the tier penalty regardless of tier agreement, since
                // the absence of a route is itself treated as a tier-style
                // mismatch fallback (§4.2 Nearest family).
                _ => {
                    return bot_pos.manhattan(pod_pos) + pod_pos.manhattan(station_pos) + penalty;
                }
            }
        }
    };

    direct + tier_penalty(ctx.bot.tier, ctx.pod.tier, ctx.station.tier, prefer_same_tier, penalty)
}

fn work_amount(ctx: &ScoreContext<'_>, value: ValueMetric) -> f64 {
    match value {
        ValueMetric::Picks => {
            let realizable: u32 = ctx
                .relevant_orders
                .iter()
                .flat_map(|o| o.positions.iter())
                .map(|&(item, required)| required.min(ctx.pod.count_available(item)))
                .sum();
            -(realizable as f64)
        }
        ValueMetric::OrderAge => {
            let age: u64 = ctx.relevant_orders.iter().map(|o| o.time_stay(ctx.now)).sum();
            -(age as f64)
        }
        ValueMetric::OrderDueTime { clip_lateness } => {
            let sum: i64 = ctx
                .relevant_orders
                .iter()
                .map(|o| {
                    let remaining = o.due_time.0 as i64 - ctx.now.0 as i64;
                    if clip_lateness {
                        remaining.max(0)
                    } else {
                        remaining
                    }
                })
                .sum();
            -(sum as f64)
        }
    }
}

fn demand(ctx: &ScoreContext<'_>) -> f64 {
    let total: u32 = ctx
        .pod
        .item_descriptions_contained()
        .map(|(item, offered)| {
            let global = ctx.global_demand.get(&item).copied().unwrap_or(0);
            global.min(offered)
        })
        .sum();
    -(total as f64)
}

fn completeable(ctx: &ScoreContext<'_>) -> f64 {
    let count = ctx
        .relevant_orders
        .iter()
        .filter(|o| o.positions.iter().all(|&(item, n)| ctx.pod.count_available(item) >= n))
        .count();
    -(count as f64)
}

fn fill(ctx: &ScoreContext<'_>, prefer_full: bool, analog: bool) -> f64 {
    let total: u32 = ctx.pod.item_descriptions_contained().map(|(_, n)| n).sum();
    if analog {
        if prefer_full {
            -(total as f64)
        } else {
            total as f64
        }
    } else {
        let is_full_side = if prefer_full { total > 0 } else { total == 0 };
        if is_full_side {
            -1.0
        } else {
            0.0
        }
    }
}

fn congestion(ctx: &ScoreContext<'_>) -> f64 {
    let leg1 = ctx.path_cost.estimate(ctx.bot.current_node, ctx.pod.node);
    let leg2 = ctx.path_cost.estimate(ctx.pod.node, ctx.station.node);
    match (leg1, leg2) {
        (Some(a), Some(b)) => a + b,
        _ => f64::INFINITY,
    }
}
