//! Request handlers.

pub mod clips;
pub mod health;
pub mod jobs;
pub mod outputs;
pub mod templates;
pub mod video_info;

pub use clips::*;
pub use health::*;
pub use jobs::*;
pub use outputs::*;
pub use templates::*;
pub use video_info::*;
