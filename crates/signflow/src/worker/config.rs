use std::sync::Arc;

use crate::config::app_config::{PARALLEL_WORKERS, SIGNING_MODE, WORKER_TYPE};
use crate::config::AppConfig;
use crate::error::Result;

pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 32;
pub const DEFAULT_WORKERS: usize = 4;

/// Reads the pool's runtime flags from the shared config store.
#[derive(Clone)]
pub struct WorkerConfiguration {
    app_config: Arc<dyn AppConfig>,
}

impl WorkerConfiguration {
    pub fn new(app_config: Arc<dyn AppConfig>) -> Self {
        Self { app_config }
    }

    /// Async signing with locally spawned workers.
    pub fn is_async_local_enabled(&self) -> Result<bool> {
        let mode = self.app_config.get_string(SIGNING_MODE)?;
        let worker_type = self.app_config.get_string(WORKER_TYPE)?;
        Ok(mode.as_deref() == Some("async") && worker_type.as_deref() == Some("local"))
    }

    /// Configured pool size, clamped to `[MIN_WORKERS, MAX_WORKERS]`.
    pub fn desired_worker_count(&self) -> Result<usize> {
        let configured = self
            .app_config
            .get_int(PARALLEL_WORKERS)?
            .unwrap_or(DEFAULT_WORKERS as i64);
        Ok(configured.clamp(MIN_WORKERS as i64, MAX_WORKERS as i64) as usize)
    }
}
