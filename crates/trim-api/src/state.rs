//! Application state.

use std::sync::Arc;
use tokio::sync::Mutex;

use trim_models::SummaryVariant;
use trim_pipeline::{PipelineConfig, SummaryPipeline};

use crate::config::ApiConfig;

/// One lock per variant. Runs of a variant share its output path.
#[derive(Debug, Default)]
struct RunLocks {
    interval: Mutex<()>,
    scene: Mutex<()>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<SummaryPipeline>,
    run_locks: Arc<RunLocks>,
}

impl AppState {
    /// State backed by the FFmpeg CLI.
    pub fn new(config: ApiConfig, pipeline_config: PipelineConfig) -> Self {
        Self::with_pipeline(config, SummaryPipeline::from_config(pipeline_config))
    }

    /// State around an existing pipeline.
    pub fn with_pipeline(config: ApiConfig, pipeline: SummaryPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            run_locks: Arc::new(RunLocks::default()),
        }
    }

    /// Lock serialising runs of `variant`.
    pub fn run_lock(&self, variant: SummaryVariant) -> &Mutex<()> {
        match variant {
            SummaryVariant::Interval => &self.run_locks.interval,
            SummaryVariant::Scene => &self.run_locks.scene,
        }
    }
}
