use std::sync::Arc;

use crate::error::Result;
use crate::store::JobQueue;

/// Counts queued jobs of the signing job classes.
#[derive(Clone)]
pub struct WorkerJobCounter {
    queue: Arc<dyn JobQueue>,
    classes: Vec<String>,
}

impl WorkerJobCounter {
    pub fn new(queue: Arc<dyn JobQueue>, classes: Vec<String>) -> Self {
        Self { queue, classes }
    }

    pub fn try_count_pending_jobs(&self) -> Result<u64> {
        let total = self
            .queue
            .count_by_class()?
            .into_iter()
            .filter(|c| self.classes.iter().any(|class| *class == c.class))
            .map(|c| c.count)
            .sum();
        Ok(total)
    }

    /// Pending signing jobs, or 0 when the queue cannot be read.
    pub fn count_pending_jobs(&self) -> u64 {
        match self.try_count_pending_jobs() {
            Ok(count) => count,
            Err(e) => {
                log::error!("Failed to count pending signing jobs: {}", e);
                0
            }
        }
    }
}
