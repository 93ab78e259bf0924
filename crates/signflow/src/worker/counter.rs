use std::sync::Arc;

use super::{ProcessRunner, WorkerCommand};

/// Counts live worker processes from a process-table snapshot.
#[derive(Clone)]
pub struct WorkerCounter {
    runner: Arc<dyn ProcessRunner>,
    command: WorkerCommand,
}

impl WorkerCounter {
    pub fn new(runner: Arc<dyn ProcessRunner>, command: WorkerCommand) -> Self {
        Self { runner, command }
    }

    /// Running signing workers, or 0 when the process table is unreadable.
    pub fn count_running(&self) -> usize {
        match self.runner.list_processes() {
            Ok(processes) => processes
                .iter()
                .filter(|p| self.command.matches(&p.cmdline))
                .count(),
            Err(e) => {
                log::debug!("Failed to read process table: {}", e);
                0
            }
        }
    }
}
