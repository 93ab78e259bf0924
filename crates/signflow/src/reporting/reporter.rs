use std::error::Error;
use std::time::Duration;

use log::Level;

use super::ErrorPayloadBuilder;
use crate::cache::StatusCache;

/// Context attached to a reported log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportContext<'a> {
    pub error: Option<&'a (dyn Error + 'static)>,
    pub sign_request_uuid: Option<&'a str>,
    pub sign_request_id: Option<i64>,
    pub file_id: Option<i64>,
    /// Overrides the cache's error TTL for persisted payloads.
    pub ttl: Option<Duration>,
}

impl<'a> ReportContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(mut self, error: &'a (dyn Error + 'static)) -> Self {
        self.error = Some(error);
        self
    }

    pub fn sign_request_uuid(mut self, uuid: &'a str) -> Self {
        self.sign_request_uuid = Some(uuid);
        self
    }

    pub fn sign_request_id(mut self, id: i64) -> Self {
        self.sign_request_id = Some(id);
        self
    }

    pub fn file_id(mut self, file_id: i64) -> Self {
        self.file_id = Some(file_id);
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Leveled logger that also persists signing failures for pollers.
///
/// Every call is emitted as a tracing event carrying the message as given and
/// the error, when present, in an `error` field. Error-level calls that carry both an
/// error and a sign-request uuid are additionally written to the cache, once
/// under the sign request and once under the file when a file id is known.
#[derive(Clone)]
pub struct SignRequestErrorReporter {
    cache: StatusCache,
}

impl SignRequestErrorReporter {
    pub fn new(cache: StatusCache) -> Self {
        Self { cache }
    }

    pub fn log(&self, level: Level, message: &str, ctx: &ReportContext<'_>) {
        let error = ctx.error.map(tracing::field::display);
        match level {
            Level::Error => tracing::error!(error, "{}", message),
            Level::Warn => tracing::warn!(error, "{}", message),
            Level::Info => tracing::info!(error, "{}", message),
            Level::Debug => tracing::debug!(error, "{}", message),
            Level::Trace => tracing::trace!(error, "{}", message),
        }

        if level != Level::Error {
            return;
        }
        let (Some(error), Some(uuid)) = (ctx.error, ctx.sign_request_uuid) else {
            return;
        };
        self.persist(error, uuid, ctx);
    }

    pub fn error(&self, message: &str, ctx: &ReportContext<'_>) {
        self.log(Level::Error, message, ctx);
    }

    pub fn warn(&self, message: &str, ctx: &ReportContext<'_>) {
        self.log(Level::Warn, message, ctx);
    }

    pub fn info(&self, message: &str, ctx: &ReportContext<'_>) {
        self.log(Level::Info, message, ctx);
    }

    pub fn debug(&self, message: &str, ctx: &ReportContext<'_>) {
        self.log(Level::Debug, message, ctx);
    }

    fn persist(&self, error: &(dyn Error + 'static), uuid: &str, ctx: &ReportContext<'_>) {
        let payload =
            ErrorPayloadBuilder::from_error(error, ctx.file_id, ctx.sign_request_id, Some(uuid))
                .build();
        let ttl = ctx.ttl.unwrap_or(self.cache.error_ttl());

        if let Err(e) = self.cache.set_sign_request_error(uuid, &payload, Some(ttl)) {
            log::warn!("Failed to cache error payload for sign request {}: {}", uuid, e);
        }
        if let Some(file_id) = ctx.file_id {
            if let Err(e) = self.cache.set_file_error(uuid, file_id, &payload, Some(ttl)) {
                log::warn!(
                    "Failed to cache error payload for file {} of sign request {}: {}",
                    file_id,
                    uuid,
                    e
                );
            }
        }
    }
}
