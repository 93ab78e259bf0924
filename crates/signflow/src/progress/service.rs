use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{sleep, Instant};
use tracing::Instrument;

use super::poll_policy;
use crate::cache::StatusCache;
use crate::config::PollConfig;
use crate::error::Result;
use crate::model::{File, FileStatus, SignRequest, SignRequestStatus};
use crate::reporting::ErrorPayload;
use crate::store::{FileStore, SignRequestStore};

/// Lower bound for the long-poll interval; a zero interval would never yield.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Progress of one signer across a file or envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequestProgress {
    pub total: u32,
    pub signed: u32,
    pub in_progress: u32,
    pub pending: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileProgress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<SignerProgress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProgress {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub status: i32,
    pub status_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerProgress {
    pub uuid: String,
    pub display_name: String,
    pub signing_order: u32,
    pub status: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed: Option<DateTime<Utc>>,
}

/// True once every file the signer is involved in is signed.
pub fn is_progress_complete(progress: &SignRequestProgress) -> bool {
    progress.total > 0
        && progress.signed >= progress.total
        && progress.pending == 0
        && progress.in_progress == 0
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_secs(1),
        }
    }
}

impl From<&PollConfig> for PollSettings {
    fn from(config: &PollConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            interval: Duration::from_secs(config.interval_secs),
        }
    }
}

#[derive(Default)]
struct Counts {
    signed: u32,
    in_progress: u32,
    pending: u32,
}

impl Counts {
    fn add(&mut self, status: FileStatus) {
        match status {
            FileStatus::Signed => self.signed += 1,
            FileStatus::SigningInProgress => self.in_progress += 1,
            _ => self.pending += 1,
        }
    }
}

/// Read-only progress views over the durable store and the status cache.
#[derive(Clone)]
pub struct ProgressService {
    files: Arc<dyn FileStore>,
    sign_requests: Arc<dyn SignRequestStore>,
    cache: StatusCache,
    poll: PollSettings,
}

impl ProgressService {
    pub fn new(
        files: Arc<dyn FileStore>,
        sign_requests: Arc<dyn SignRequestStore>,
        cache: StatusCache,
        poll: PollSettings,
    ) -> Self {
        Self {
            files,
            sign_requests,
            cache,
            poll,
        }
    }

    pub fn get_sign_request_progress(
        &self,
        file: &File,
        sign_request: &SignRequest,
    ) -> Result<SignRequestProgress> {
        let mut progress = if file.is_envelope() {
            self.get_envelope_progress_for_sign_request(file, sign_request)?
        } else {
            self.get_single_file_progress_for_sign_request(file, sign_request)?
        };
        progress.error = self.cache.get_sign_request_error(&sign_request.uuid);
        Ok(progress)
    }

    /// Signer-relative status of a file. The signer's own completion wins
    /// over the file's global status, except while signing is running.
    pub fn get_sign_request_status_code(&self, file: &File, sign_request: &SignRequest) -> FileStatus {
        if file.status == FileStatus::SigningInProgress {
            return FileStatus::SigningInProgress;
        }
        if sign_request.is_signed() {
            return FileStatus::Signed;
        }
        match sign_request.status {
            SignRequestStatus::Draft => FileStatus::Draft,
            SignRequestStatus::AbleToSign => FileStatus::AbleToSign,
            _ => file.status,
        }
    }

    /// Progress for a top-level file or for one member of an envelope.
    pub fn get_single_file_progress_for_sign_request(
        &self,
        file: &File,
        sign_request: &SignRequest,
    ) -> Result<SignRequestProgress> {
        let mut counts = Counts::default();
        counts.add(self.get_sign_request_status_code(file, sign_request));

        let signers = self
            .sign_requests
            .list_by_file(file.id)?
            .into_iter()
            .map(|sr| SignerProgress {
                uuid: sr.uuid,
                display_name: sr.display_name,
                signing_order: sr.signing_order,
                status: sr.status.code(),
                signed: sr.signed,
            })
            .collect();

        Ok(SignRequestProgress {
            total: 1,
            signed: counts.signed,
            in_progress: counts.in_progress,
            pending: counts.pending,
            files: None,
            signers: Some(signers),
            error: None,
        })
    }

    /// Progress across the members of an envelope. Each member is classified
    /// with the signer's own row on that member when it has one.
    pub fn get_envelope_progress_for_sign_request(
        &self,
        envelope: &File,
        sign_request: &SignRequest,
    ) -> Result<SignRequestProgress> {
        let children = self.files.list_children(envelope.id)?;
        let mut counts = Counts::default();
        let mut files = Vec::with_capacity(children.len());

        for child in &children {
            let own = self.sign_requests.find_for_file(child.id, sign_request)?;
            let status = self.get_sign_request_status_code(child, own.as_ref().unwrap_or(sign_request));
            counts.add(status);
            files.push(FileProgress {
                id: child.id,
                uuid: child.uuid.clone(),
                name: child.name.clone(),
                status: status.code(),
                status_text: self.files.status_label(status.code()),
            });
        }

        Ok(SignRequestProgress {
            total: u32::try_from(children.len()).unwrap_or(u32::MAX),
            signed: counts.signed,
            in_progress: counts.in_progress,
            pending: counts.pending,
            files: Some(files),
            signers: None,
            error: None,
        })
    }

    /// Long-polls the cached status of `uuid` with the configured timings.
    pub async fn poll_for_status_change(&self, uuid: &str, initial_status: i32) -> i32 {
        self.poll_for_status_change_with(uuid, initial_status, self.poll.timeout, self.poll.interval)
            .await
    }

    /// Waits until the cached status differs from its value at call time, or
    /// `timeout` elapses, whichever comes first. Returns `initial_status` on
    /// timeout. Dropping the future stops the poll. `interval` is raised to
    /// [`MIN_POLL_INTERVAL`] when shorter.
    pub async fn poll_for_status_change_with(
        &self,
        uuid: &str,
        initial_status: i32,
        timeout: Duration,
        interval: Duration,
    ) -> i32 {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let span = tracing::info_span!("poll_status", uuid = %uuid, initial_status);
        async move {
            let baseline = poll_policy::baseline(self.cache.get_status(uuid).as_ref());
            let started = Instant::now();

            while started.elapsed() < timeout {
                let remaining = timeout.saturating_sub(started.elapsed());
                sleep(interval.min(remaining)).await;

                let current = self.cache.get_status(uuid);
                if let Some(status) = poll_policy::status_change(baseline, current.as_ref()) {
                    log::debug!("Status of {} changed to {}", uuid, status);
                    return status;
                }
            }

            log::debug!("Status poll for {} timed out after {:?}", uuid, timeout);
            initial_status
        }
        .instrument(span)
        .await
    }

    pub fn set_status(&self, uuid: &str, status: i32) -> Result<()> {
        self.cache.set_status(uuid, status)
    }

    pub fn store_sign_request_error(
        &self,
        uuid: &str,
        payload: &ErrorPayload,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.cache.set_sign_request_error(uuid, payload, ttl)
    }

    pub fn store_file_error(
        &self,
        uuid: &str,
        file_id: i64,
        payload: &ErrorPayload,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.cache.set_file_error(uuid, file_id, payload, ttl)
    }

    pub fn get_sign_request_error(&self, uuid: &str) -> Option<ErrorPayload> {
        self.cache.get_sign_request_error(uuid)
    }

    pub fn get_file_error(&self, uuid: &str, file_id: i64) -> Option<ErrorPayload> {
        self.cache.get_file_error(uuid, file_id)
    }
}
