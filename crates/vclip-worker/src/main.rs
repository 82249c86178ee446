//! Video processing worker binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_asr::WhisperCliTranscriber;
use vclip_ml_client::{HttpSentimentClient, HttpTranslationClient};
use vclip_models::TemplateCatalog;
use vclip_queue::JobQueue;
use vclip_worker::{metrics, JobExecutor, Pipeline, WorkerConfig};

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("vclip=info".parse().unwrap()))
        .init();

    info!("Starting vclip-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let queue = match JobQueue::from_env() {
        Ok(q) => q,
        Err(e) => {
            error!("Failed to create job queue: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = queue.init().await {
        error!("Failed to initialize job queue: {}", e);
        std::process::exit(1);
    }
    match queue.len().await {
        Ok(depth) => info!(queue_depth = depth, "starting work loop"),
        Err(e) => info!("starting work loop (queue depth unavailable: {})", e),
    }

    let metrics_enabled = std::env::var("METRICS_ENABLED").map(|v| v == "true" || v == "1").unwrap_or(true);
    if metrics_enabled {
        let _handle = metrics::init_metrics();
        info!("Prometheus metrics recorder installed");
    }

    let transcriber_binary = std::env::var("WHISPER_BINARY").unwrap_or_else(|_| "whisper".to_string());
    let pipeline = Pipeline {
        config: config.clone(),
        catalog: Arc::new(TemplateCatalog::load_default()),
        transcriber: Arc::new(WhisperCliTranscriber::new(transcriber_binary)),
        sentiment: HttpSentimentClient::from_env().map(|c| Arc::new(c) as Arc<_>),
        translation: HttpTranslationClient::from_env().map(|c| Arc::new(c) as Arc<_>),
    };

    let executor = Arc::new(JobExecutor::new(config, queue, pipeline));

    let signal_executor = Arc::clone(&executor);
    let shutdown_handle = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        signal_executor.shutdown();
    });

    if let Err(e) = executor.run().await {
        error!("Executor error: {}", e);
        std::process::exit(1);
    }

    shutdown_handle.abort();

    info!("Worker shutdown complete");
}
