//! Public job-queue facade: `enqueue`, `dequeue_blocking`, `heartbeat`, `fail`,
//! `complete`, `update_progress`, `get` — the seven operations a worker and the
//! control API need, composed from the stream (unclaimed work) and the status
//! store (the cached, pollable record of each job's progress).

use std::time::Duration;

use tracing::info;
use vclip_models::{ClipRecord, Job, JobId, JobStatusCache, ProgressSnapshot};

use crate::error::{QueueError, QueueResult};
use crate::status::StatusStore;
use crate::stream::{JobStream, StreamConfig};

pub use crate::stream::StreamConfig as QueueConfig;

/// A claimed job: the stream message id (needed to ack/dlq it later) plus the payload.
#[derive(Debug, Clone)]
pub struct Claim {
    pub message_id: String,
    pub job: Job,
}

pub struct JobQueue {
    stream: JobStream,
    status: StatusStore,
}

impl JobQueue {
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        let status = StatusStore::new(&config.redis_url)?;
        let stream = JobStream::new(config)?;
        Ok(Self { stream, status })
    }

    pub fn from_env() -> QueueResult<Self> {
        Self::new(StreamConfig::from_env())
    }

    pub async fn init(&self) -> QueueResult<()> {
        self.stream.init().await
    }

    pub fn config(&self) -> &QueueConfig {
        self.stream.config()
    }

    /// Atomically register `job` under its own id; rejects if the id already
    /// names a job that hasn't reached a terminal state.
    pub async fn enqueue(&self, job: &Job) -> QueueResult<String> {
        if let Some(existing) = self.status.get(&job.id).await? {
            if !existing.is_terminal() {
                return Err(QueueError::DuplicateJob(job.id.to_string()));
            }
        }

        let message_id = self.stream.push(job).await?;
        self.status.init(&job.id).await?;
        info!(job_id = %job.id, message_id = %message_id, "Enqueued job");
        Ok(message_id)
    }

    /// FIFO claim: blocks up to `timeout` for the next available job. On claim
    /// the status cache is flipped to running and tagged with `worker_id`.
    pub async fn dequeue_blocking(&self, worker_id: &str, timeout: Duration) -> QueueResult<Option<Claim>> {
        let block_ms = timeout.as_millis() as u64;
        match self.stream.read_blocking(worker_id, block_ms).await? {
            Some((message_id, job)) => {
                self.status.mark_claimed(&job.id, worker_id).await?;
                Ok(Some(Claim { message_id, job }))
            }
            None => Ok(None),
        }
    }

    /// Reclaim jobs abandoned by a worker that stopped heartbeating, making
    /// them available to `dequeue_blocking` again.
    pub async fn reclaim_stale_claims(&self, worker_id: &str) -> QueueResult<Vec<Claim>> {
        let min_idle_ms = self.stream.config().visibility_timeout.as_millis() as u64;
        let claimed = self.stream.claim_pending(worker_id, min_idle_ms, 100).await?;
        let mut claims = Vec::with_capacity(claimed.len());
        for (message_id, job) in claimed {
            self.status.mark_claimed(&job.id, worker_id).await?;
            claims.push(Claim { message_id, job });
        }
        Ok(claims)
    }

    /// Periodic liveness token for `worker_id`. Workers missing heartbeats past
    /// `visibility_timeout` have their stream claims released via `reclaim_stale_claims`.
    pub async fn heartbeat(&self, worker_id: &str) -> QueueResult<()> {
        self.status.heartbeat(worker_id).await
    }

    /// Keep a long-running job's stream message from being reclaimed mid-work.
    pub async fn refresh_claim(&self, worker_id: &str, message_id: &str) -> QueueResult<()> {
        self.stream.refresh_visibility(worker_id, message_id).await
    }

    /// Delete a prior registration for `worker_id`. Call once at worker startup.
    pub async fn clear_worker_registration(&self, worker_id: &str) -> QueueResult<()> {
        self.status.clear_worker_registration(worker_id).await
    }

    /// Terminal failure transition. Idempotent: calling it twice just re-writes the record.
    pub async fn fail(&self, claim: &Claim, reason: &str, traceback: Option<String>) -> QueueResult<()> {
        self.status.fail(&claim.job.id, reason, traceback).await?;
        let retries = self.stream.increment_retry(claim.job.id.as_str()).await?;
        if retries >= self.stream.max_retries() {
            self.stream.dlq(&claim.message_id, &claim.job, reason).await?;
        } else {
            self.stream.ack(&claim.message_id).await?;
        }
        Ok(())
    }

    /// Terminal success transition.
    pub async fn complete(&self, claim: &Claim, result: Vec<ClipRecord>) -> QueueResult<()> {
        self.status.complete(&claim.job.id, result).await?;
        self.stream.ack(&claim.message_id).await
    }

    /// Store the latest progress snapshot without a state transition.
    pub async fn update_progress(&self, job_id: &JobId, snapshot: ProgressSnapshot) -> QueueResult<()> {
        self.status.update_progress(job_id, &snapshot).await
    }

    /// Safe at any time; returns `None` for an id the broker has never seen or
    /// has purged, which callers surface as the `not_found` sentinel.
    pub async fn get(&self, job_id: &JobId) -> QueueResult<Option<JobStatusCache>> {
        self.status.get(job_id).await
    }

    pub async fn len(&self) -> QueueResult<u64> {
        self.stream.len().await
    }

    pub async fn dlq_len(&self) -> QueueResult<u64> {
        self.stream.dlq_len().await
    }

    /// Jobs the broker currently considers non-terminal; used by the stale-job sweeper.
    pub async fn active_jobs(&self) -> QueueResult<Vec<JobStatusCache>> {
        self.status.active_jobs().await
    }

    pub async fn sweep_stale(&self) -> QueueResult<Vec<JobId>> {
        self.status.sweep_stale().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_well_formed_redis_url_without_connecting() {
        let queue = JobQueue::new(QueueConfig::default());
        assert!(queue.is_ok());
    }

    #[test]
    fn test_new_rejects_malformed_redis_url() {
        let config = QueueConfig { redis_url: "not-a-redis-url".to_string(), ..QueueConfig::default() };
        assert!(JobQueue::new(config).is_err());
    }
}
