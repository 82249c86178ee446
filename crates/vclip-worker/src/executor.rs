//! Job executor: the worker's claim → run → report loop.
//!
//! One job at a time per process (§5); horizontal scaling is N processes
//! against the same broker, not concurrency inside one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use vclip_models::{ClipRecord, JobId, ProgressSnapshot};
use vclip_queue::{Claim, JobQueue};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::metrics;
use crate::pipeline::{Pipeline, ProgressReporter};
use crate::sidecar;

/// Fans a progress snapshot out to the broker's status cache and the
/// filesystem sidecar together, so either channel alone is enough to poll.
struct BrokerAndSidecarReporter {
    queue: Arc<JobQueue>,
    output_dir: String,
}

#[async_trait]
impl ProgressReporter for BrokerAndSidecarReporter {
    async fn report(&self, job_id: &JobId, snapshot: ProgressSnapshot) {
        if let Err(err) = sidecar::write_processing(&self.output_dir, job_id.as_str(), &snapshot).await {
            warn!(job_id = %job_id, "failed to write status sidecar: {}", err);
        }
        if let Err(err) = self.queue.update_progress(job_id, snapshot).await {
            warn!(job_id = %job_id, "failed to update broker progress: {}", err);
        }
    }
}

pub struct JobExecutor {
    config: WorkerConfig,
    queue: Arc<JobQueue>,
    pipeline: Pipeline,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl JobExecutor {
    pub fn new(config: WorkerConfig, queue: JobQueue, pipeline: Pipeline) -> Self {
        let (shutdown, _) = tokio::sync::watch::channel(false);
        Self { config, queue: Arc::new(queue), pipeline, shutdown }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Run the claim/run/report loop until shutdown is signalled.
    pub async fn run(&self) -> WorkerResult<()> {
        info!(worker = %self.config.worker_name, "starting job executor");

        self.queue.init().await?;
        self.queue.clear_worker_registration(&self.config.worker_name).await.ok();

        let mut shutdown_rx = self.shutdown.subscribe();
        let heartbeat_task = self.spawn_heartbeat();

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let claim = tokio::select! {
                _ = shutdown_rx.changed() => break,
                result = self.queue.dequeue_blocking(&self.config.worker_name, self.config.claim_timeout) => result,
            };

            match claim {
                Ok(Some(claim)) => self.process_claim(claim).await,
                Ok(None) => continue,
                Err(err) => {
                    error!("failed to claim next job: {}", err);
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                }
            }
        }

        heartbeat_task.abort();
        info!("job executor stopped");
        Ok(())
    }

    fn spawn_heartbeat(&self) -> tokio::task::JoinHandle<()> {
        let queue = Arc::clone(&self.queue);
        let worker_name = self.config.worker_name.clone();
        let interval = self.config.heartbeat_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(err) = queue.heartbeat(&worker_name).await {
                    warn!("heartbeat failed: {}", err);
                }
            }
        })
    }

    async fn process_claim(&self, claim: Claim) {
        let job_id = claim.job.id.clone();
        info!(job_id = %job_id, "processing claimed job");
        metrics::record_job_claimed();

        let reporter =
            BrokerAndSidecarReporter { queue: Arc::clone(&self.queue), output_dir: claim.job.output_dir.clone() };

        let started = std::time::Instant::now();
        match self.pipeline.run(&claim.job, &reporter).await {
            Ok(clips) => {
                info!(job_id = %job_id, clip_count = clips.len(), "job completed");
                metrics::record_stage_duration("pipeline", started.elapsed().as_secs_f64());
                metrics::record_clips_rendered(clips.len() as u64);
                self.finish_success(&claim, clips).await;
            }
            Err(err) => {
                error!(job_id = %job_id, "job failed: {}", err);
                metrics::record_stage_duration("pipeline", started.elapsed().as_secs_f64());
                self.finish_failure(&claim, &err).await;
            }
        }
    }

    async fn finish_success(&self, claim: &Claim, clips: Vec<ClipRecord>) {
        metrics::record_job_completed();
        if let Err(err) = sidecar::write_completed(&claim.job.output_dir, claim.job.id.as_str(), clips.clone()).await {
            warn!(job_id = %claim.job.id, "failed to write completion sidecar: {}", err);
        }
        if let Err(err) = self.queue.complete(claim, clips).await {
            error!(job_id = %claim.job.id, "failed to record completion on broker: {}", err);
        }
    }

    async fn finish_failure(&self, claim: &Claim, err: &crate::error::WorkerError) {
        metrics::record_job_failed();
        let message = err.to_string();
        if let Err(sidecar_err) = sidecar::write_error(&claim.job.output_dir, claim.job.id.as_str(), &message).await {
            warn!(job_id = %claim.job.id, "failed to write failure sidecar: {}", sidecar_err);
        }
        let traceback = format!("{err:?}");
        if let Err(queue_err) = self.queue.fail(claim, &message, Some(traceback)).await {
            error!(job_id = %claim.job.id, "failed to record failure on broker: {}", queue_err);
        }
    }
}
