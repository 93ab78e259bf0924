//! A process runner over an in-memory process table.

use std::sync::Mutex;

use signflow::worker::{ProcessInfo, ProcessRunner};
use signflow::ProcessError;

/// Spawned commands show up in the table; signalled ones disappear.
pub struct RecordingRunner {
    table: Mutex<Vec<ProcessInfo>>,
    next_pid: Mutex<i32>,
    spawned: Mutex<Vec<Vec<String>>>,
    pub fail_listing: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Vec::new()),
            next_pid: Mutex::new(1000),
            spawned: Mutex::new(Vec::new()),
            fail_listing: false,
        }
    }

    /// Adds a process that was not started by the pool.
    pub fn add_process(&self, pid: i32, cmdline: &str) {
        self.table.lock().unwrap().push(ProcessInfo {
            pid,
            cmdline: cmdline.to_string(),
        });
    }

    pub fn spawned(&self) -> Vec<Vec<String>> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }

    pub fn live_pids(&self) -> Vec<i32> {
        self.table.lock().unwrap().iter().map(|p| p.pid).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn spawn_detached(&self, argv: &[String]) -> Result<(), ProcessError> {
        let pid = {
            let mut next = self.next_pid.lock().unwrap();
            *next += 1;
            *next
        };
        self.spawned.lock().unwrap().push(argv.to_vec());
        self.add_process(pid, &argv.join(" "));
        Ok(())
    }

    fn list_processes(&self) -> Result<Vec<ProcessInfo>, ProcessError> {
        if self.fail_listing {
            return Err(ProcessError::ListFailed("ps: not permitted".to_string()));
        }
        Ok(self.table.lock().unwrap().clone())
    }

    fn signal(&self, pid: i32) -> Result<(), ProcessError> {
        let mut table = self.table.lock().unwrap();
        let before = table.len();
        table.retain(|p| p.pid != pid);
        if table.len() == before {
            return Err(ProcessError::SignalFailed {
                pid,
                reason: "no such process".to_string(),
            });
        }
        Ok(())
    }

    fn kill_via_command(&self, pid: i32) -> Result<(), ProcessError> {
        Err(ProcessError::SignalFailed {
            pid,
            reason: "kill: no such process".to_string(),
        })
    }
}
