use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersError {
    #[error("orders configuration error: {0}")]
    Config(String),
}

pub type OrdersResult<T> = Result<T, OrdersError>;
