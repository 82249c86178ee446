//! Progress snapshot types for polling and the status sidecar.
//!
//! A `JobStatusCache` is the cached, broker-resident counterpart of a job's
//! latest `ProgressSnapshot`; it adds the bookkeeping (heartbeat, started_at)
//! needed to detect a worker that has stopped making progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clip::ClipRecord;

/// Job processing status, as observed by a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed,
    /// Worker stopped sending heartbeats; the job will be reclaimed.
    Stale,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Stale => "stale",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A progress snapshot: each update replaces the previous one wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub percentage: u8,
    pub stage: String,
    pub message: String,
    #[serde(default)]
    pub clips: Vec<ClipRecord>,
    pub timestamp: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn new(percentage: u8, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            percentage: percentage.min(100),
            stage: stage.into(),
            message: message.into(),
            clips: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_clips(mut self, clips: Vec<ClipRecord>) -> Self {
        self.clips = clips;
        self
    }
}

/// Cached job status, the broker-resident record `update_progress`/`get` operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusCache {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub stage: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub clips: Vec<ClipRecord>,
    pub error_message: Option<String>,
    /// Full traceback string, populated only for internal errors.
    pub traceback: Option<String>,
    /// Worker id holding the current claim, set on dequeue and cleared on completion.
    pub claimed_by: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_heartbeat: Option<DateTime<Utc>>,
    /// Monotonically increasing, bumped on every mutation, for event ordering.
    pub event_seq: u64,
}

impl JobStatusCache {
    pub fn new(job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            job_id: job_id.into(),
            status: JobStatus::Queued,
            progress: 0,
            stage: None,
            message: None,
            clips: Vec::new(),
            error_message: None,
            traceback: None,
            claimed_by: None,
            started_at: now,
            updated_at: now,
            last_heartbeat: None,
            event_seq: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record a claim: the broker calls this when a worker dequeues the job.
    pub fn mark_running(&mut self, worker_id: impl Into<String>) {
        self.status = JobStatus::Processing;
        self.claimed_by = Some(worker_id.into());
        self.last_heartbeat = Some(Utc::now());
        self.updated_at = Utc::now();
        self.event_seq += 1;
    }

    pub fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.status = JobStatus::Processing;
        self.progress = snapshot.percentage;
        self.stage = Some(snapshot.stage.clone());
        self.message = Some(snapshot.message.clone());
        self.clips = snapshot.clips.clone();
        self.updated_at = Utc::now();
        self.event_seq += 1;
    }

    pub fn record_heartbeat(&mut self) {
        self.last_heartbeat = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, clips: Vec<ClipRecord>) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.stage = Some("done".into());
        self.clips = clips;
        self.updated_at = Utc::now();
        self.event_seq += 1;
    }

    pub fn fail(&mut self, error: impl Into<String>, traceback: Option<String>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(error.into());
        self.traceback = traceback;
        self.updated_at = Utc::now();
        self.event_seq += 1;
    }

    pub fn mark_stale(&mut self) {
        self.status = JobStatus::Stale;
        self.error_message = Some("Worker stopped responding; the job will be reclaimed.".into());
        self.updated_at = Utc::now();
        self.event_seq += 1;
    }

    /// A job is stale if it is non-terminal and either:
    /// - no heartbeat has arrived yet and it has been running longer than `grace_period_secs`, or
    /// - the last heartbeat is older than `stale_threshold_secs`.
    pub fn is_stale(&self, stale_threshold_secs: i64, grace_period_secs: i64) -> bool {
        if self.is_terminal() {
            return false;
        }
        let now = Utc::now();
        match self.last_heartbeat {
            Some(hb) => (now - hb).num_seconds() > stale_threshold_secs,
            None => (now - self.started_at).num_seconds() > grace_period_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_cache_creation() {
        let cache = JobStatusCache::new("job-1");
        assert_eq!(cache.status, JobStatus::Queued);
        assert!(!cache.is_terminal());
    }

    #[test]
    fn test_apply_snapshot_transitions_to_processing() {
        let mut cache = JobStatusCache::new("job-1");
        let snapshot = ProgressSnapshot::new(40, "transcription", "transcribing audio");
        cache.apply_snapshot(&snapshot);
        assert_eq!(cache.status, JobStatus::Processing);
        assert_eq!(cache.progress, 40);
        assert_eq!(cache.event_seq, 1);
    }

    #[test]
    fn test_complete_sets_full_progress() {
        let mut cache = JobStatusCache::new("job-1");
        cache.complete(vec![]);
        assert_eq!(cache.status, JobStatus::Completed);
        assert_eq!(cache.progress, 100);
        assert!(cache.is_terminal());
    }

    #[test]
    fn test_stale_detection() {
        let mut cache = JobStatusCache::new("job-1");
        cache.status = JobStatus::Processing;

        assert!(!cache.is_stale(60, 120));

        cache.started_at = Utc::now() - chrono::Duration::seconds(200);
        assert!(cache.is_stale(60, 120));

        cache.record_heartbeat();
        assert!(!cache.is_stale(60, 120));
    }
}
