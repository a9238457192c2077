use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("select configuration error: {0}")]
    Config(String),

    #[error("backlog invariant violated: {0}")]
    Backlog(String),
}

pub type SelectResult<T> = Result<T, SelectError>;
