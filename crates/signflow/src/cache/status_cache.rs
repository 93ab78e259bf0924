use std::sync::Arc;
use std::time::Duration;

use super::DistributedCache;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::model::{File, FileStatus};
use crate::reporting::ErrorPayload;

const STATUS_PREFIX: &str = "status_";
const FILE_STATUS_PREFIX: &str = "libresign_status_";
const SIGN_REQUEST_ERROR_PREFIX: &str = "sign_request_error_";
const FILE_ERROR_PREFIX: &str = "file_error_";

pub fn status_key(uuid: &str) -> String {
    format!("{STATUS_PREFIX}{uuid}")
}

pub fn file_status_key(uuid: &str) -> String {
    format!("{FILE_STATUS_PREFIX}{uuid}")
}

pub fn sign_request_error_key(uuid: &str) -> String {
    format!("{SIGN_REQUEST_ERROR_PREFIX}{uuid}")
}

pub fn file_error_key(uuid: &str, file_id: i64) -> String {
    format!("{FILE_ERROR_PREFIX}{uuid}_{file_id}")
}

/// Status codes and error payloads keyed by document uuid.
#[derive(Clone)]
pub struct StatusCache {
    cache: Arc<dyn DistributedCache>,
    status_ttl: Duration,
    error_ttl: Duration,
}

impl StatusCache {
    pub fn new(cache: Arc<dyn DistributedCache>, status_ttl: Duration, error_ttl: Duration) -> Self {
        Self {
            cache,
            status_ttl,
            error_ttl,
        }
    }

    pub fn from_config(cache: Arc<dyn DistributedCache>, config: &CacheConfig) -> Self {
        Self::new(
            cache,
            Duration::from_secs(config.status_ttl_secs),
            Duration::from_secs(config.error_ttl_secs),
        )
    }

    pub fn error_ttl(&self) -> Duration {
        self.error_ttl
    }

    /// Raw poll-status read. The value is whatever the last writer stored.
    pub fn get_status(&self, uuid: &str) -> Option<serde_json::Value> {
        self.cache.get(&status_key(uuid))
    }

    pub fn set_status(&self, uuid: &str, status: i32) -> Result<()> {
        self.cache
            .set(&status_key(uuid), status.into(), self.status_ttl)?;
        Ok(())
    }

    pub fn get_file_status(&self, uuid: &str) -> Option<FileStatus> {
        let code = self.cache.get(&file_status_key(uuid))?.as_i64()?;
        FileStatus::try_from(i32::try_from(code).ok()?).ok()
    }

    pub fn set_file_status(&self, file: &File) -> Result<()> {
        self.cache.set(
            &file_status_key(&file.uuid),
            file.status.code().into(),
            self.status_ttl,
        )?;
        Ok(())
    }

    pub fn set_sign_request_error(
        &self,
        uuid: &str,
        payload: &ErrorPayload,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.put_payload(&sign_request_error_key(uuid), payload, ttl)
    }

    pub fn set_file_error(
        &self,
        uuid: &str,
        file_id: i64,
        payload: &ErrorPayload,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.put_payload(&file_error_key(uuid, file_id), payload, ttl)
    }

    pub fn get_sign_request_error(&self, uuid: &str) -> Option<ErrorPayload> {
        self.read_payload(&sign_request_error_key(uuid))
    }

    pub fn get_file_error(&self, uuid: &str, file_id: i64) -> Option<ErrorPayload> {
        self.read_payload(&file_error_key(uuid, file_id))
    }

    fn put_payload(&self, key: &str, payload: &ErrorPayload, ttl: Option<Duration>) -> Result<()> {
        let value = serde_json::to_value(payload).map_err(|e| CacheError::Serialize {
            key: key.to_string(),
            source: e,
        })?;
        self.cache
            .set(key, value, ttl.unwrap_or(self.error_ttl))?;
        Ok(())
    }

    fn read_payload(&self, key: &str) -> Option<ErrorPayload> {
        let value = self.cache.get(key)?;
        match serde_json::from_value(value) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::debug!("Ignoring unreadable error payload under '{}': {}", key, e);
                None
            }
        }
    }
}
