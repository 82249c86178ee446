//! Error types for scoring and selection.

use thiserror::Error;

pub type SelectionResult<T> = Result<T, SelectionError>;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("sentiment capability unreachable: {0}")]
    SentimentUnavailable(String),
}
