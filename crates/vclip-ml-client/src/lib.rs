//! Optional HTTP-backed implementations of the sentiment and translation
//! capabilities the hook scorer and caption compiler consult. Neither
//! component is required to function without them: absent any capability,
//! the scorer contributes zero emotion points and the compiler passes text
//! through unconverted.

pub mod error;
pub mod sentiment;
pub mod translation;

pub use error::{MlError, MlResult};
pub use sentiment::HttpSentimentClient;
pub use translation::HttpTranslationClient;
