//! Deterministic RNG wrapper for the engine.
//!
//! Unlike a population simulation with millions of independent agents, this
//! engine's randomness needs (SA neighbor-move selection, HADOD tie-breaking,
//! deadlock-detour choice) are all driven from one place per tick, so a
//! single seeded source suffices — no per-agent seed mixing is needed here.
//! The same seed always reproduces the same sequence of decisions.

use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng};

/// Deterministic, `rand`-backed randomness source.
///
/// `!Sync` by virtue of `SmallRng`'s internal state not being designed for
/// concurrent access — the engine is single-threaded cooperative (see
/// the concurrency model), so this is never an issue in practice.
pub struct Rng(SmallRng);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `Rng` with a different seed offset — useful for
    /// seeding a sub-component (e.g. the SA optimizer) deterministically
    /// from the engine's root seed.
    pub fn child(&mut self, offset: u64) -> Rng {
        const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        Rng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]) — used by the SA
    /// optimizer's Metropolis acceptance test.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a non-empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Sample an index from `weights` proportional to their CDF — used by
    /// the SA optimizer's weighted neighbor-move selection.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let mut x = self.gen_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if x < *w {
                return Some(i);
            }
            x -= *w;
        }
        weights.len().checked_sub(1)
    }
}

/// Object-safe randomness abstraction: lets an embedding simulator inject
/// its own seeded source at the external boundary. `Rng`'s own methods are
/// generic (`gen_range<T, R>`) and so not object-safe; this trait exposes
/// just the two operations the engine's hot paths need through a trait
/// object — SA's Metropolis accept test and `BestOf`'s tie-break draw.
/// Internally the engine always holds a concrete `Rng` on its hot paths.
pub trait Randomizer {
    /// Uniform draw in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
    /// `true` with probability `p`.
    fn bool_with_prob(&mut self, p: f64) -> bool;
}

impl Randomizer for Rng {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.gen_range(lo..hi)
    }

    fn bool_with_prob(&mut self, p: f64) -> bool {
        self.gen_bool(p)
    }
}
