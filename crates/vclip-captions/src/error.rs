//! Error types for the caption compiler.

use thiserror::Error;

pub type CaptionResult<T> = Result<T, CaptionError>;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("template references an unknown animation recipe: {0}")]
    UnknownRecipe(String),

    #[error("cannot compile captions for an empty word list")]
    NoWords,

    #[error("translation capability failed: {0}")]
    TranslationFailed(String),
}
