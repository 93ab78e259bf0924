use serde::{Deserialize, Serialize};

/// File-based configuration for a signflow host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignFlowConfig {
    pub version: String,
    /// SQLite database location. Falls back to `~/.signflow/data/signflow.db`.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub worker: WorkerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_status_ttl")]
    pub status_ttl_secs: u64,
    #[serde(default = "default_error_ttl")]
    pub error_ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

fn default_status_ttl() -> u64 {
    60
}

fn default_error_ttl() -> u64 {
    300
}

fn default_max_entries() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            status_ttl_secs: default_status_ttl(),
            error_ttl_secs: default_error_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    1
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_poll_timeout(),
            interval_secs: default_poll_interval(),
        }
    }
}

/// How detached worker processes are launched and recognised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Optional interpreter placed before the entry point (e.g. `php`).
    #[serde(default)]
    pub interpreter: Option<String>,
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
    #[serde(default = "default_subcommand")]
    pub subcommand: String,
    #[serde(default = "default_job_classes")]
    pub job_classes: Vec<String>,
    #[serde(default = "default_stop_after")]
    pub stop_after_secs: u64,
}

fn default_entry_point() -> String {
    "signflow-worker".to_string()
}

fn default_subcommand() -> String {
    "background-job:worker".to_string()
}

fn default_job_classes() -> Vec<String> {
    vec!["SignFileJob".to_string(), "SignSingleFileJob".to_string()]
}

fn default_stop_after() -> u64 {
    3600
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            interpreter: None,
            entry_point: default_entry_point(),
            subcommand: default_subcommand(),
            job_classes: default_job_classes(),
            stop_after_secs: default_stop_after(),
        }
    }
}

impl Default for SignFlowConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            cache: CacheConfig::default(),
            poll: PollConfig::default(),
            worker: WorkerSettings::default(),
        }
    }
}

impl SignFlowConfig {
    /// Resolved database path, if one can be determined.
    pub fn database_path(&self) -> Option<std::path::PathBuf> {
        match &self.database_path {
            Some(p) => Some(std::path::PathBuf::from(p)),
            None => crate::db::default_database_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: SignFlowConfig = serde_json::from_str(r#"{"version": "1.0"}"#).unwrap();
        assert_eq!(config.cache.status_ttl_secs, 60);
        assert_eq!(config.cache.error_ttl_secs, 300);
        assert_eq!(config.poll.timeout_secs, 30);
        assert_eq!(config.poll.interval_secs, 1);
        assert_eq!(config.worker.stop_after_secs, 3600);
        assert_eq!(
            config.worker.job_classes,
            vec!["SignFileJob", "SignSingleFileJob"]
        );
    }

    #[test]
    fn test_explicit_database_path() {
        let config: SignFlowConfig =
            serde_json::from_str(r#"{"version": "1.0", "database_path": "/tmp/x.db"}"#).unwrap();
        assert_eq!(
            config.database_path(),
            Some(std::path::PathBuf::from("/tmp/x.db"))
        );
    }
}
