use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("scorer configuration error: {0}")]
    Config(String),
}

pub type ScorerResult<T> = Result<T, ScorerError>;
