//! Tier-mismatch penalty shared by every scorer family that supports
//! `prefer_same_tier` (§4.2: "add once per mismatched pair among
//! {bot-tier, pod-tier, station-tier}").

/// Penalty contribution for the three pairwise tier comparisons among a
/// bot, a pod, and a station. Returns `0.0` if `!prefer_same_tier`.
pub fn tier_penalty(bot_tier: u8, pod_tier: u8, station_tier: u8, prefer_same_tier: bool, penalty: f64) -> f64 {
    if !prefer_same_tier {
        return 0.0;
    }
    let mut mismatches = 0u32;
    if bot_tier != pod_tier {
        mismatches += 1;
    }
    if pod_tier != station_tier {
        mismatches += 1;
    }
    if bot_tier != station_tier {
        mismatches += 1;
    }
    mismatches as f64 * penalty
}

/// `true` if all three tiers agree.
pub fn same_tier(bot_tier: u8, pod_tier: u8, station_tier: u8) -> bool {
    bot_tier == pod_tier && pod_tier == station_tier
}
