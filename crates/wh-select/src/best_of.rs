//! `BestOf` — lexicographic multi-criterion candidate selection (§4.3).
//!
//! A list of scorer configs acts as a primary criterion followed by one or
//! more tie-breakers. A candidate replaces the current best only if it is
//! strictly better on the first criterion where the two differ; ties all
//! the way down keep the first-seen candidate.

use std::cmp::Ordering;

use wh_scorers::{score, ScoreContext, ScorerConfig};

/// Accumulates the best candidate seen so far under a fixed lexicographic
/// criteria list.
pub struct BestOf<T> {
    criteria: Vec<ScorerConfig>,
    best: Option<T>,
    /// Scores of the current best, one per criterion actually evaluated
    /// when it won (lazy short-circuiting means a decisive win on an early
    /// criterion can leave later slots unset — callers needing full
    /// telemetry should put the scorer they care about first).
    best_scores: Vec<f64>,
}

impl<T> BestOf<T> {
    pub fn new(criteria: Vec<ScorerConfig>) -> Self {
        Self {
            criteria,
            best: None,
            best_scores: Vec::new(),
        }
    }

    /// Discard the current best, starting a fresh selection round.
    pub fn recycle(&mut self) {
        self.best = None;
        self.best_scores.clear();
    }

    pub fn best(&self) -> Option<&T> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<T> {
        self.best
    }

    pub fn best_scores(&self) -> &[f64] {
        &self.best_scores
    }

    /// Evaluate `candidate` against the current best, replacing it if
    /// `candidate` wins lexicographically. Criteria are evaluated in order
    /// and comparison stops at the first criterion where the scores
    /// differ — later (more expensive) tie-breakers are only computed when
    /// every earlier criterion tied exactly.
    pub fn consider(&mut self, candidate: T, ctx: &ScoreContext<'_>) {
        let mut scores = Vec::with_capacity(self.criteria.len());
        let mut verdict = if self.best.is_none() { Some(true) } else { None };

        for (i, cfg) in self.criteria.iter().enumerate() {
            if verdict == Some(false) {
                break;
            }
            let s = score(cfg, ctx);
            scores.push(s);
            if verdict.is_none() {
                if let Some(&best_s) = self.best_scores.get(i) {
                    verdict = match s.partial_cmp(&best_s) {
                        Some(Ordering::Less) => Some(true),
                        Some(Ordering::Greater) => Some(false),
                        _ => None, // tie on this criterion, keep comparing
                    };
                }
            }
        }

        if verdict.unwrap_or(false) {
            self.best = Some(candidate);
            self.best_scores = scores;
        }
    }
}
