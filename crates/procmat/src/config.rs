//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Configuration for the materialization pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of worker threads in the shared texture loader pool
    pub worker_threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { worker_threads: 4 }
    }
}
