use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaError {
    #[error("simulated-annealing configuration error: {0}")]
    Config(String),
}

pub type SaResult<T> = Result<T, SaError>;
