//! Job status cache and worker liveness, backed by plain Redis keys.
//!
//! This is the broker-resident record that `update_progress`/`fail`/`complete`/
//! `get` operate on; it is distinct from the stream (which only carries the
//! not-yet-claimed queue of work). Real-time push delivery is out of scope —
//! callers observe progress by polling `get`.

use chrono::Utc;
use redis::AsyncCommands;
use tracing::{debug, warn};

use vclip_models::{ClipRecord, JobId, JobStatusCache, ProgressSnapshot};

use crate::error::QueueResult;

const JOB_STATUS_PREFIX: &str = "job:status:";
const WORKER_REGISTRY_PREFIX: &str = "worker:";
const ACTIVE_JOBS_KEY: &str = "jobs:active";

/// Job status cache TTL (seconds).
pub const JOB_STATUS_TTL_SECS: u64 = 86_400;
/// Worker registry TTL (seconds) — a worker re-registers well within this via `heartbeat`.
pub const WORKER_REGISTRY_TTL_SECS: u64 = 90;
/// No heartbeat for this long after claiming and a job is stale.
pub const STALE_THRESHOLD_SECS: i64 = 60;
/// Grace period before a claim with no heartbeat yet counts as stale.
pub const STALE_GRACE_PERIOD_SECS: i64 = 120;

#[derive(Clone)]
pub struct StatusStore {
    client: redis::Client,
}

impl StatusStore {
    pub fn new(redis_url: &str) -> QueueResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    fn status_key(job_id: &str) -> String {
        format!("{JOB_STATUS_PREFIX}{job_id}")
    }

    fn worker_key(worker_id: &str) -> String {
        format!("{WORKER_REGISTRY_PREFIX}{worker_id}")
    }

    /// Create the queued status record for a freshly-enqueued job.
    pub async fn init(&self, job_id: &JobId) -> QueueResult<()> {
        let status = JobStatusCache::new(job_id.to_string());
        self.persist(job_id, &status).await?;
        self.add_to_active_jobs(job_id).await
    }

    pub async fn get(&self, job_id: &JobId) -> QueueResult<Option<JobStatusCache>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::status_key(job_id.as_str())).await?;
        Ok(value.and_then(|s| serde_json::from_str(&s).ok()))
    }

    async fn persist(&self, job_id: &JobId, status: &JobStatusCache) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(status)?;
        conn.set_ex::<_, _, ()>(Self::status_key(job_id.as_str()), payload, JOB_STATUS_TTL_SECS).await?;
        Ok(())
    }

    /// Record that `worker_id` has claimed the job.
    pub async fn mark_claimed(&self, job_id: &JobId, worker_id: &str) -> QueueResult<()> {
        let mut status = self.get(job_id).await?.unwrap_or_else(|| JobStatusCache::new(job_id.to_string()));
        status.mark_running(worker_id);
        self.persist(job_id, &status).await
    }

    pub async fn update_progress(&self, job_id: &JobId, snapshot: &ProgressSnapshot) -> QueueResult<()> {
        let mut status = self.get(job_id).await?.unwrap_or_else(|| JobStatusCache::new(job_id.to_string()));
        status.apply_snapshot(snapshot);
        self.persist(job_id, &status).await
    }

    pub async fn complete(&self, job_id: &JobId, result: Vec<ClipRecord>) -> QueueResult<()> {
        let mut status = self.get(job_id).await?.unwrap_or_else(|| JobStatusCache::new(job_id.to_string()));
        status.complete(result);
        self.persist(job_id, &status).await?;
        self.remove_from_active_jobs(job_id).await
    }

    pub async fn fail(&self, job_id: &JobId, reason: &str, traceback: Option<String>) -> QueueResult<()> {
        let mut status = self.get(job_id).await?.unwrap_or_else(|| JobStatusCache::new(job_id.to_string()));
        status.fail(reason, traceback);
        self.persist(job_id, &status).await?;
        self.remove_from_active_jobs(job_id).await
    }

    async fn add_to_active_jobs(&self, job_id: &JobId) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let score = Utc::now().timestamp_millis() as f64;
        conn.zadd::<_, _, _, ()>(ACTIVE_JOBS_KEY, job_id.as_str(), score).await?;
        Ok(())
    }

    async fn remove_from_active_jobs(&self, job_id: &JobId) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.zrem::<_, _, ()>(ACTIVE_JOBS_KEY, job_id.as_str()).await?;
        Ok(())
    }

    /// All jobs the broker currently considers non-terminal.
    pub async fn active_jobs(&self) -> QueueResult<Vec<JobStatusCache>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let job_ids: Vec<String> = conn.zrange(ACTIVE_JOBS_KEY, 0, -1).await?;

        let mut statuses = Vec::with_capacity(job_ids.len());
        for job_id in job_ids {
            if let Some(status) = self.get(&JobId::from_string(job_id)).await? {
                statuses.push(status);
            }
        }
        Ok(statuses)
    }

    // ------------------------------------------------------------------
    // Worker registry
    // ------------------------------------------------------------------

    /// Refresh this worker's liveness token. Called periodically while a job runs.
    pub async fn heartbeat(&self, worker_id: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let now = Utc::now().timestamp();
        conn.hset_multiple::<_, _, _, ()>(Self::worker_key(worker_id), &[("last_heartbeat", now.to_string())]).await?;
        conn.expire::<_, ()>(Self::worker_key(worker_id), WORKER_REGISTRY_TTL_SECS as i64).await?;
        debug!("Refreshed worker heartbeat: {worker_id}");
        Ok(())
    }

    /// Delete a prior registration for this worker name. A worker calls this on
    /// startup so a crash-and-restart under the same name doesn't block on a
    /// stale hash left over from the previous process.
    pub async fn clear_worker_registration(&self, worker_id: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(Self::worker_key(worker_id)).await?;
        Ok(())
    }

    pub async fn worker_is_registered(&self, worker_id: &str) -> QueueResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.exists(Self::worker_key(worker_id)).await?)
    }

    /// Sweep active jobs for ones whose claim has gone stale (worker stopped
    /// heartbeating). Marks them `Stale` in the cache; the caller is expected to
    /// separately release the underlying stream claim via `JobStream::claim_pending`.
    pub async fn sweep_stale(&self) -> QueueResult<Vec<JobId>> {
        let mut stale = Vec::new();
        for status in self.active_jobs().await? {
            if status.is_stale(STALE_THRESHOLD_SECS, STALE_GRACE_PERIOD_SECS) {
                let job_id = JobId::from_string(status.job_id.clone());
                let mut updated = status;
                updated.mark_stale();
                self.persist(&job_id, &updated).await?;
                warn!(job_id = %job_id, "Marked job stale: no heartbeat within threshold");
                stale.push(job_id);
            }
        }
        Ok(stale)
    }
}
