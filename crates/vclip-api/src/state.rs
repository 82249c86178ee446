//! Application state.

use std::sync::Arc;

use vclip_models::TemplateCatalog;
use vclip_queue::JobQueue;
use vclip_storage::OutputStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub queue: Arc<JobQueue>,
    pub output_store: Arc<OutputStore>,
    pub catalog: Arc<TemplateCatalog>,
    /// Root directory new jobs' `output_dir` is derived under; same directory
    /// `output_store` reads finished clips from.
    pub output_root: String,
}

impl AppState {
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let queue = JobQueue::from_env()?;
        queue.init().await?;

        let output_root = std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string());
        let output_store = OutputStore::new(output_root.clone());
        let catalog = TemplateCatalog::load_default();

        Ok(Self {
            config,
            queue: Arc::new(queue),
            output_store: Arc::new(output_store),
            catalog: Arc::new(catalog),
            output_root,
        })
    }
}
