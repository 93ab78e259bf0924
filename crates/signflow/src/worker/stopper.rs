use std::sync::Arc;

use super::{ProcessRunner, WorkerCommand};

/// Terminates every running signing worker on this host.
#[derive(Clone)]
pub struct WorkerStopper {
    runner: Arc<dyn ProcessRunner>,
    command: WorkerCommand,
}

impl WorkerStopper {
    pub fn new(runner: Arc<dyn ProcessRunner>, command: WorkerCommand) -> Self {
        Self { runner, command }
    }

    /// Signals each matching worker and returns how many were terminated.
    /// Never fails; an unreadable process table terminates nothing.
    pub fn stop_all(&self) -> usize {
        let processes = match self.runner.list_processes() {
            Ok(processes) => processes,
            Err(e) => {
                log::error!("Cannot stop signing workers: {}", e);
                return 0;
            }
        };

        let mut stopped = 0;
        for process in processes.iter().filter(|p| self.command.matches(&p.cmdline)) {
            if self.terminate(process.pid) {
                stopped += 1;
            }
        }

        if stopped > 0 {
            log::info!("Stopped {} signing workers", stopped);
        }
        stopped
    }

    fn terminate(&self, pid: i32) -> bool {
        let Err(e) = self.runner.signal(pid) else {
            return true;
        };
        log::debug!("Native signal to {} failed ({}), falling back to kill", pid, e);
        match self.runner.kill_via_command(pid) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Failed to stop worker {}: {}", pid, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkerSettings;
    use crate::worker::process::testing::FakeProcessRunner;

    fn command() -> WorkerCommand {
        WorkerCommand::new(&WorkerSettings {
            interpreter: Some("php".to_string()),
            entry_point: "/srv/app/occ".to_string(),
            ..WorkerSettings::default()
        })
    }

    #[test]
    fn test_stop_all_only_hits_signing_workers() {
        let runner = Arc::new(FakeProcessRunner::with_processes(&[
            (100, "php /srv/app/occ background-job:worker SignFileJob SignSingleFileJob --stop-after=1h"),
            (101, "php /srv/app/occ background-job:worker PreviewJob"),
            (102, "php /srv/app/occ background-job:worker SignSingleFileJob"),
            (103, "nginx: worker process"),
        ]));
        let stopper = WorkerStopper::new(runner.clone(), command());

        assert_eq!(stopper.stop_all(), 2);
        assert_eq!(*runner.signalled.lock().unwrap(), vec![100, 102]);
        assert!(runner.killed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_falls_back_to_kill_command() {
        let runner = Arc::new(FakeProcessRunner::with_processes(&[(
            200,
            "php /srv/app/occ background-job:worker SignFileJob",
        )]));
        runner.signal_failures.lock().unwrap().insert(200);
        let stopper = WorkerStopper::new(runner.clone(), command());

        assert_eq!(stopper.stop_all(), 1);
        assert_eq!(*runner.killed.lock().unwrap(), vec![200]);
    }

    #[test]
    fn test_unreadable_table_stops_nothing() {
        let runner = Arc::new(FakeProcessRunner {
            fail_listing: true,
            ..FakeProcessRunner::default()
        });
        assert_eq!(WorkerStopper::new(runner, command()).stop_all(), 0);
    }
}
