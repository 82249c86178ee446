//! Local-filesystem output store.
//!
//! Workers write finished clips, the status sidecar, and clip-metadata JSON
//! directly under a job's `output_dir`. This crate is the control API's
//! read-only view onto that directory tree: list finished clips and stream
//! one back by name.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::File;
use tracing::warn;

use crate::error::{StorageError, StorageResult};

/// A finished clip file discovered under the output root.
#[derive(Debug, Clone, Serialize)]
pub struct ClipFile {
    pub filename: String,
    pub size_bytes: u64,
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Read-only view over the directory finished clips are written to.
#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every `.mp4` directly under the output root, newest first.
    pub async fn list_clips(&self) -> StorageResult<Vec<ClipFile>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut clips = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp4") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    warn!(filename, "failed to stat clip file: {}", e);
                    continue;
                }
            };
            let modified = metadata.modified().ok().map(chrono::DateTime::<chrono::Utc>::from);
            clips.push(ClipFile {
                filename: filename.to_string(),
                size_bytes: metadata.len(),
                modified,
            });
        }

        clips.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(clips)
    }

    /// Resolve `filename` to a path under the output root, rejecting any
    /// attempt to escape it (`..`, absolute paths, embedded separators).
    pub fn resolve(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename == ".."
            || filename.starts_with('.')
        {
            return Err(StorageError::invalid_filename(filename));
        }
        Ok(self.root.join(filename))
    }

    /// Open a finished clip for streaming.
    pub async fn open_clip(&self, filename: &str) -> StorageResult<File> {
        let path = self.resolve(filename)?;
        File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::not_found(filename)
            } else {
                StorageError::Io(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_clips_filters_non_mp4() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("clip_1.mp4"), b"data").await.unwrap();
        tokio::fs::write(dir.path().join("job_status.json"), b"{}").await.unwrap();

        let store = OutputStore::new(dir.path());
        let clips = store.list_clips().await.unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].filename, "clip_1.mp4");
    }

    #[test]
    fn test_resolve_rejects_path_traversal() {
        let store = OutputStore::new("/tmp/out");
        assert!(store.resolve("../secret.mp4").is_err());
        assert!(store.resolve("a/b.mp4").is_err());
        assert!(store.resolve(".hidden").is_err());
        assert!(store.resolve("clip_1.mp4").is_ok());
    }
}
