//! Shared error type.
//!
//! Sub-crates define their own error enums and convert into `CoreError` via
//! `From` impls, or keep them separate and wrap `CoreError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::{BotId, NodeId};

/// The top-level error type for `wh-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("bot {0} not found")]
    BotNotFound(BotId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `wh-*` crates that don't define their own error.
pub type CoreResult<T> = Result<T, CoreError>;
