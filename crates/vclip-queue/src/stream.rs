//! Redis Streams mechanics: the FIFO broker a worker claims jobs from.
//!
//! One stream carries every job as a single serialized `Job` payload (no more
//! per-job-type tagging). A consumer group gives each worker process its own
//! claim; `XCLAIM`/`XPENDING` let a crashed worker's claims be picked back up.

use std::time::Duration;

use redis::AsyncCommands;
use tracing::{debug, info, warn};
use vclip_models::Job;

use crate::error::{QueueError, QueueResult};

/// Stream/consumer-group configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub redis_url: String,
    pub stream_name: String,
    pub consumer_group: String,
    pub dlq_stream_name: String,
    pub max_retries: u32,
    /// How long a claimed-but-idle message may sit before another worker may reclaim it.
    pub visibility_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            stream_name: "vclip:jobs".to_string(),
            consumer_group: "vclip:workers".to_string(),
            dlq_stream_name: "vclip:dlq".to_string(),
            max_retries: 3,
            visibility_timeout: Duration::from_secs(600),
        }
    }
}

impl StreamConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            stream_name: std::env::var("QUEUE_STREAM").unwrap_or_else(|_| "vclip:jobs".to_string()),
            consumer_group: std::env::var("QUEUE_CONSUMER_GROUP").unwrap_or_else(|_| "vclip:workers".to_string()),
            dlq_stream_name: std::env::var("QUEUE_DLQ_STREAM").unwrap_or_else(|_| "vclip:dlq".to_string()),
            max_retries: std::env::var("QUEUE_MAX_RETRIES").ok().and_then(|s| s.parse().ok()).unwrap_or(3),
            visibility_timeout: Duration::from_secs(
                std::env::var("QUEUE_VISIBILITY_TIMEOUT").ok().and_then(|s| s.parse().ok()).unwrap_or(600),
            ),
        }
    }
}

pub struct JobStream {
    client: redis::Client,
    config: StreamConfig,
}

impl JobStream {
    pub fn new(config: StreamConfig) -> QueueResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Create the consumer group (ignoring "already exists").
    pub async fn init(&self) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let result: Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => info!("Created consumer group: {}", self.config.consumer_group),
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!("Consumer group already exists: {}", self.config.consumer_group);
            }
            Err(e) => return Err(QueueError::Redis(e)),
        }

        Ok(())
    }

    /// Append a job to the stream. Returns the stream message id.
    pub async fn push(&self, job: &Job) -> QueueResult<String> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(job)?;

        let message_id: String = redis::cmd("XADD")
            .arg(&self.config.stream_name)
            .arg("*")
            .arg("job")
            .arg(&payload)
            .arg("job_id")
            .arg(job.id.as_str())
            .query_async(&mut conn)
            .await?;

        info!(job_id = %job.id, message_id = %message_id, "Pushed job to stream");
        Ok(message_id)
    }

    /// Block for up to `block_ms` waiting for at most one new message.
    pub async fn read_blocking(&self, consumer_name: &str, block_ms: u64) -> QueueResult<Option<(String, Job)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let result: redis::streams::StreamReadReply = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(consumer_name)
            .arg("COUNT")
            .arg(1)
            .arg("BLOCK")
            .arg(block_ms)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(">")
            .query_async(&mut conn)
            .await?;

        for stream_key in result.keys {
            for entry in stream_key.ids {
                let message_id = entry.id.clone();
                if let Some(redis::Value::BulkString(payload)) = entry.map.get("job") {
                    let payload_str = String::from_utf8_lossy(payload);
                    match serde_json::from_str::<Job>(&payload_str) {
                        Ok(job) => return Ok(Some((message_id, job))),
                        Err(e) => {
                            warn!("Failed to parse job payload, acking malformed message: {}", e);
                            self.ack(&message_id).await.ok();
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Claim pending messages idle for at least `min_idle_ms`, for a crashed worker's recovery.
    pub async fn claim_pending(&self, consumer_name: &str, min_idle_ms: u64, count: usize) -> QueueResult<Vec<(String, Job)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let pending_details: Vec<Vec<redis::Value>> = redis::cmd("XPENDING")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("-")
            .arg("+")
            .arg(count)
            .query_async(&mut conn)
            .await?;

        let mut message_ids_to_claim = Vec::new();
        for detail in pending_details {
            if detail.len() >= 4 {
                if let (Some(redis::Value::BulkString(id_bytes)), Some(redis::Value::Int(idle_ms))) = (detail.get(0), detail.get(2)) {
                    if *idle_ms as u64 >= min_idle_ms {
                        if let Ok(id) = String::from_utf8(id_bytes.clone()) {
                            message_ids_to_claim.push(id);
                        }
                    }
                }
            }
        }

        if message_ids_to_claim.is_empty() {
            return Ok(Vec::new());
        }

        let mut cmd = redis::cmd("XCLAIM");
        cmd.arg(&self.config.stream_name).arg(&self.config.consumer_group).arg(consumer_name).arg(min_idle_ms);
        for msg_id in &message_ids_to_claim {
            cmd.arg(msg_id);
        }

        let claimed_messages: Vec<Vec<redis::Value>> = cmd.query_async(&mut conn).await?;
        let mut jobs = Vec::new();

        for message in claimed_messages {
            if message.len() >= 2 {
                if let (Some(redis::Value::BulkString(id_bytes)), Some(redis::Value::Array(fields))) = (message.get(0), message.get(1)) {
                    if let Ok(message_id) = String::from_utf8(id_bytes.clone()) {
                        if let Some(payload) = find_field(fields, "job") {
                            match serde_json::from_str::<Job>(&payload) {
                                Ok(job) => {
                                    info!(job_id = %job.id, "Reclaimed pending job from a stale worker");
                                    jobs.push((message_id, job));
                                }
                                Err(e) => {
                                    warn!("Failed to parse claimed job payload: {}", e);
                                    self.ack(&message_id).await.ok();
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(jobs)
    }

    /// Refresh ownership/idle-time for a message still being worked, without transferring it.
    pub async fn refresh_visibility(&self, consumer_name: &str, message_id: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _res: redis::Value = redis::cmd("XCLAIM")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(consumer_name)
            .arg(0)
            .arg(message_id)
            .arg("JUSTID")
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    pub async fn ack(&self, message_id: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        redis::cmd("XACK")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(message_id)
            .query_async::<()>(&mut conn)
            .await?;

        redis::cmd("XDEL").arg(&self.config.stream_name).arg(message_id).query_async::<()>(&mut conn).await?;

        debug!("Acknowledged message: {}", message_id);
        Ok(())
    }

    /// Move a job to the dead letter queue and ack the original message.
    pub async fn dlq(&self, message_id: &str, job: &Job, error: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(job)?;

        redis::cmd("XADD")
            .arg(&self.config.dlq_stream_name)
            .arg("*")
            .arg("job")
            .arg(&payload)
            .arg("error")
            .arg(error)
            .arg("original_id")
            .arg(message_id)
            .query_async::<()>(&mut conn)
            .await?;

        self.ack(message_id).await?;
        warn!(job_id = %job.id, "Moved job to DLQ: {}", error);
        Ok(())
    }

    pub async fn len(&self) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.xlen(&self.config.stream_name).await?)
    }

    pub async fn dlq_len(&self) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.xlen(&self.config.dlq_stream_name).await?)
    }

    pub async fn get_retry_count(&self, job_id: &str) -> QueueResult<u32> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("vclip:retry:{job_id}");
        let count: Option<u32> = conn.get(&key).await?;
        Ok(count.unwrap_or(0))
    }

    pub async fn increment_retry(&self, job_id: &str) -> QueueResult<u32> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("vclip:retry:{job_id}");
        let count: u32 = conn.incr(&key, 1).await?;
        conn.expire::<_, ()>(&key, 86400).await?;
        Ok(count)
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }
}

fn find_field(fields: &[redis::Value], name: &str) -> Option<String> {
    let mut i = 0;
    while i + 1 < fields.len() {
        if let (Some(redis::Value::BulkString(field_bytes)), Some(redis::Value::BulkString(value_bytes))) = (fields.get(i), fields.get(i + 1)) {
            if let (Ok(field), Ok(value)) = (String::from_utf8(field_bytes.clone()), String::from_utf8(value_bytes.clone())) {
                if field == name {
                    return Some(value);
                }
            }
        }
        i += 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(s: &str) -> redis::Value {
        redis::Value::BulkString(s.as_bytes().to_vec())
    }

    #[test]
    fn test_find_field_locates_value() {
        let fields = vec![bulk("job_id"), bulk("abc"), bulk("job"), bulk("{\"id\":\"abc\"}")];
        assert_eq!(find_field(&fields, "job"), Some("{\"id\":\"abc\"}".to_string()));
        assert_eq!(find_field(&fields, "missing"), None);
    }

    #[test]
    fn test_stream_config_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.stream_name, "vclip:jobs");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.visibility_timeout, Duration::from_secs(600));
    }
}
