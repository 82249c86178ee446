//! Redis Streams job broker.
//!
//! One stream, one payload type (`vclip_models::Job`). A status cache alongside
//! it gives pollers the `{state, progress, result?, error?}` view `GET /jobs/{id}`
//! needs without going through the stream at all.

pub mod error;
pub mod queue;
pub mod status;
pub mod stream;

pub use error::{QueueError, QueueResult};
pub use queue::{Claim, JobQueue, QueueConfig};
pub use status::{JOB_STATUS_TTL_SECS, STALE_GRACE_PERIOD_SECS, STALE_THRESHOLD_SECS, WORKER_REGISTRY_TTL_SECS};
