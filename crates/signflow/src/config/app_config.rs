//! App-scoped runtime flags shared by every process of a deployment.

use crate::error::{ConfigError, Result};

/// `"async"` enables background signing.
pub const SIGNING_MODE: &str = "signing_mode";
/// `"local"` means workers are spawned on this host.
pub const WORKER_TYPE: &str = "worker_type";
pub const PARALLEL_WORKERS: &str = "parallel_workers";
/// Unix seconds of the last scale-up attempt.
pub const WORKER_LAST_START_ATTEMPT: &str = "worker_last_start_attempt";

/// A shared, atomically-updatable key/value store.
pub trait AppConfig: Send + Sync {
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get_string(key)? {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
                ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                }
                .into()
            }),
        }
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        self.set_string(key, &value.to_string())
    }
}
