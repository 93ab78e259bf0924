use std::sync::Arc;

use super::StatusUpdatePolicy;
use crate::cache::StatusCache;
use crate::error::Result;
use crate::model::{File, FileStatus, SignRequest, SignRequestStatus};

/// Answers whether signers of a file may be notified right now.
pub trait FileStatusPolicy: Send + Sync {
    fn can_notify(&self, file_status: Option<FileStatus>) -> bool;
}

/// Notifications are allowed for files that are open for signature, and when
/// the file status is not known.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileStatusPolicy;

impl FileStatusPolicy for DefaultFileStatusPolicy {
    fn can_notify(&self, file_status: Option<FileStatus>) -> bool {
        matches!(
            file_status,
            None | Some(FileStatus::AbleToSign) | Some(FileStatus::PartialSigned)
        )
    }
}

#[derive(Clone)]
pub struct StatusService {
    policy: StatusUpdatePolicy,
    file_status_policy: Arc<dyn FileStatusPolicy>,
    cache: StatusCache,
}

impl StatusService {
    pub fn new(
        policy: StatusUpdatePolicy,
        file_status_policy: Arc<dyn FileStatusPolicy>,
        cache: StatusCache,
    ) -> Self {
        Self {
            policy,
            file_status_policy,
            cache,
        }
    }

    pub fn determine_initial_status(
        &self,
        signing_order: u32,
        file_id: i64,
        file_status: Option<FileStatus>,
        signer_status: Option<SignRequestStatus>,
        current_status: Option<SignRequestStatus>,
    ) -> Result<SignRequestStatus> {
        self.policy.determine_initial_status(
            signing_order,
            file_id,
            file_status,
            signer_status,
            current_status,
        )
    }

    pub fn update_status_if_allowed(
        &self,
        sign_request: &mut SignRequest,
        current: SignRequestStatus,
        desired: SignRequestStatus,
        is_new: bool,
    ) -> Result<bool> {
        self.policy
            .update_status_if_allowed(sign_request, current, desired, is_new)
    }

    pub fn should_notify_sign_request(
        &self,
        status: SignRequestStatus,
        file_status: Option<FileStatus>,
    ) -> bool {
        self.file_status_policy.can_notify(file_status) && status == SignRequestStatus::AbleToSign
    }

    pub fn cache_file_status(&self, file: &File) -> Result<()> {
        self.cache.set_file_status(file)
    }
}
