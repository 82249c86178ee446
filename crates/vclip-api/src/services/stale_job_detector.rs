//! Background service that periodically sweeps the broker for jobs whose
//! worker stopped heartbeating, marking them failed so pollers don't wait
//! forever on a dead worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, warn};

use vclip_queue::JobQueue;

const DETECTION_INTERVAL: Duration = Duration::from_secs(30);

pub struct StaleJobDetector {
    queue: Arc<JobQueue>,
    enabled: bool,
}

impl StaleJobDetector {
    pub fn new(queue: Arc<JobQueue>) -> Self {
        let enabled = std::env::var("ENABLE_STALE_DETECTION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);
        Self { queue, enabled }
    }

    /// Runs indefinitely; spawn as a background task.
    pub async fn run(&self) {
        if !self.enabled {
            info!("Stale job detection is disabled");
            return;
        }

        info!("Starting stale job detector (interval: {:?})", DETECTION_INTERVAL);
        let mut ticker = interval(DETECTION_INTERVAL);

        loop {
            ticker.tick().await;
            match self.queue.sweep_stale().await {
                Ok(swept) if !swept.is_empty() => {
                    for job_id in &swept {
                        warn!(job_id = %job_id, "marked job stale (no heartbeat from its worker)");
                    }
                    info!("Stale sweep marked {} job(s) stale", swept.len());
                }
                Ok(_) => {}
                Err(e) => error!("Stale job sweep failed: {}", e),
            }
        }
    }
}
