//! Output store: a read-only view onto the directory finished clips, the
//! status sidecar, and clip-metadata JSON are written to by the worker.

pub mod error;
pub mod outputs;

pub use error::{StorageError, StorageResult};
pub use outputs::{ClipFile, OutputStore};
