//! OS process table access.

use std::process::{Command, Stdio};

use crate::error::ProcessError;

/// One row of the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: i32,
    pub cmdline: String,
}

/// Spawns, lists and signals OS processes.
///
/// Workers are not owned by whoever starts them: they outlive the spawning
/// call and are only ever found again through [`ProcessRunner::list_processes`].
pub trait ProcessRunner: Send + Sync {
    /// Starts `argv` in the background, detached from the caller.
    fn spawn_detached(&self, argv: &[String]) -> Result<(), ProcessError>;

    fn list_processes(&self) -> Result<Vec<ProcessInfo>, ProcessError>;

    /// Sends a termination signal through the native API.
    fn signal(&self, pid: i32) -> Result<(), ProcessError>;

    /// Terminates through the external `kill` command.
    fn kill_via_command(&self, pid: i32) -> Result<(), ProcessError>;
}

/// Escapes a token for use inside single quotes in `sh`.
fn shell_quote(token: &str) -> String {
    format!("'{}'", token.replace('\'', "'\\''"))
}

/// [`ProcessRunner`] for the local host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    fn list_from_proc() -> Option<Vec<ProcessInfo>> {
        let entries = std::fs::read_dir("/proc").ok()?;
        let mut processes = Vec::new();
        for entry in entries.flatten() {
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<i32>().ok())
            else {
                continue;
            };
            // Processes may exit between listing and reading
            let Ok(raw) = std::fs::read(entry.path().join("cmdline")) else {
                continue;
            };
            let cmdline = raw
                .split(|b| *b == 0)
                .filter(|part| !part.is_empty())
                .map(|part| String::from_utf8_lossy(part).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            if !cmdline.is_empty() {
                processes.push(ProcessInfo { pid, cmdline });
            }
        }
        Some(processes)
    }

    fn list_from_ps() -> Result<Vec<ProcessInfo>, ProcessError> {
        let output = Command::new("ps")
            .args(["-eo", "pid=,args="])
            .stderr(Stdio::null())
            .output()
            .map_err(|e| ProcessError::ListFailed(e.to_string()))?;
        if !output.status.success() {
            return Err(ProcessError::ListFailed(format!(
                "ps exited with {}",
                output.status
            )));
        }
        Ok(parse_ps_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_ps_output(stdout: &str) -> Vec<ProcessInfo> {
    stdout
        .lines()
        .filter_map(|line| {
            let (pid, cmdline) = line.trim().split_once(char::is_whitespace)?;
            Some(ProcessInfo {
                pid: pid.parse().ok()?,
                cmdline: cmdline.trim().to_string(),
            })
        })
        .collect()
}

impl ProcessRunner for SystemProcessRunner {
    fn spawn_detached(&self, argv: &[String]) -> Result<(), ProcessError> {
        let command = argv
            .iter()
            .map(|a| shell_quote(a))
            .collect::<Vec<_>>()
            .join(" ");
        let script = format!("nohup {} >/dev/null 2>&1 &", command);

        let status = Command::new("sh")
            .arg("-c")
            .arg(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ProcessError::SpawnFailed {
                command: command.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(ProcessError::SpawnFailed {
                command,
                source: std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("sh exited with {}", status),
                ),
            });
        }
        Ok(())
    }

    fn list_processes(&self) -> Result<Vec<ProcessInfo>, ProcessError> {
        match Self::list_from_proc() {
            Some(processes) => Ok(processes),
            None => Self::list_from_ps(),
        }
    }

    #[cfg(unix)]
    fn signal(&self, pid: i32) -> Result<(), ProcessError> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|e| ProcessError::SignalFailed {
            pid,
            reason: e.to_string(),
        })
    }

    #[cfg(not(unix))]
    fn signal(&self, _pid: i32) -> Result<(), ProcessError> {
        Err(ProcessError::Unsupported)
    }

    fn kill_via_command(&self, pid: i32) -> Result<(), ProcessError> {
        let status = Command::new("kill")
            .arg(pid.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ProcessError::SignalFailed {
                pid,
                reason: e.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::SignalFailed {
                pid,
                reason: format!("kill exited with {}", status),
            })
        }
    }
}
