//! Hook scorer and clip selector: picks the top-N engagement-worthy windows
//! from a timed transcript.

pub mod error;
pub mod scorer;
pub mod selector;
pub mod sentiment;

pub use error::{SelectionError, SelectionResult};
pub use scorer::score;
pub use selector::{rank, segment, select_top};
pub use sentiment::{SentimentCapability, SentimentLabel, SentimentResult};
