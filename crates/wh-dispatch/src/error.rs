use thiserror::Error;

/// Engine/Dispatch-level failures (§7).
///
/// Per-bot path-finding and pod-selection failure are *not* represented
/// here — they are values (`TaskOutcome::NoTask`, a timed-out
/// `FindPathsOutcome`), not errors, handled by the caller's own retry policy.
/// `DispatchError` is reserved for conditions that mean construction itself
/// cannot proceed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Returned from `Engine::new`/`Dispatch::new` — an invalid or
    /// internally inconsistent `EngineConfig` (e.g. an incompatible
    /// pod-selection manager combination), same shape as
    /// `dt_sim::SimError::Config`.
    #[error("invalid dispatch configuration: {0}")]
    InvalidConfig(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
