use std::sync::Arc;

use super::{ProcessRunner, WorkerCommand};
use crate::error::Result;

/// Spawns detached signing workers.
#[derive(Clone)]
pub struct WorkerStarter {
    runner: Arc<dyn ProcessRunner>,
    command: WorkerCommand,
}

impl WorkerStarter {
    pub fn new(runner: Arc<dyn ProcessRunner>, command: WorkerCommand) -> Self {
        Self { runner, command }
    }

    /// Starts `count` workers. Stops at the first spawn failure.
    pub fn start_workers(&self, count: usize) -> Result<usize> {
        let argv = self.command.argv();
        for started in 0..count {
            if let Err(e) = self.runner.spawn_detached(&argv) {
                log::error!("Started {} of {} signing workers", started, count);
                return Err(e.into());
            }
        }
        Ok(count)
    }
}
