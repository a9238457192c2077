//! Tuning knobs for the simulated-annealing optimizer (§4.6, §6 "Simulated-
//! annealing" configuration block).

/// Configuration for one [`crate::optimizer::Optimizer`] instance.
#[derive(Clone, Debug)]
pub struct SaConfig {
    pub init_temp: f64,
    pub min_temp: f64,
    pub cooling_rate: f64,
    pub min_difference: f64,
    pub max_iteration: u32,
    /// Top-N points kept per search space after the initial ranking pass.
    pub search_pod_num: usize,
    /// How often (in ticks) `Optimizer::update` should be invoked by the
    /// caller; the optimizer itself does not schedule its own wakeups.
    pub update_period: u64,
    /// Skip the Metropolis loop entirely and commit the first viable
    /// solution per station (§4.6 step 6 only).
    pub greedy_method: bool,
    /// Replace the Metropolis loop with up to 5 improve-only passes.
    pub brute_force_method: bool,
    /// Reserved for a future alternate seeding strategy for initial
    /// solutions; currently always smallest-space-first (§4.6 step 6).
    pub init_solution_method: bool,
    /// Ticks charged per item picked, used to project station throughput
    /// rate. Not part of the distilled configuration surface but required
    /// by the rate formula in step 4 — ambient constant, not a tunable the
    /// original config block exposes.
    pub pick_time: f64,
    /// Ticks charged for a bot to transfer a pod into its grip once it
    /// arrives, inserted between the two `schedule_path` legs of
    /// `create_solution`.
    pub pod_transfer_time: f64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            init_temp: 100.0,
            min_temp: 0.01,
            cooling_rate: 0.95,
            min_difference: 1e-4,
            max_iteration: 10_000,
            search_pod_num: 8,
            update_period: 50,
            greedy_method: false,
            brute_force_method: false,
            init_solution_method: false,
            pick_time: 3.0,
            pod_transfer_time: 2.0,
        }
    }
}
