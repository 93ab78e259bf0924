//! Shared key/value cache with per-entry expiry.
//!
//! Entries are advisory: a missing key means "ask the durable store", never
//! "nothing happened".

mod memory;
mod status_cache;

use std::time::Duration;

use crate::error::CacheError;

pub use memory::MemoryCache;
pub use status_cache::{
    file_error_key, file_status_key, sign_request_error_key, status_key, StatusCache,
};

/// A cache shared between request handlers and worker processes.
pub trait DistributedCache: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<(), CacheError>;

    fn remove(&self, key: &str);
}
