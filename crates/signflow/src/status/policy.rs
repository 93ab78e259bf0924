use std::sync::Arc;

use super::SequentialSigning;
use crate::error::Result;
use crate::model::{FileStatus, SignRequest, SignRequestStatus};

/// Decides initial and transitional sign request statuses.
#[derive(Clone)]
pub struct StatusUpdatePolicy {
    sequential: Arc<dyn SequentialSigning>,
}

impl StatusUpdatePolicy {
    pub fn new(sequential: Arc<dyn SequentialSigning>) -> Self {
        Self { sequential }
    }

    pub fn determine_initial_status(
        &self,
        signing_order: u32,
        file_id: i64,
        file_status: Option<FileStatus>,
        signer_status: Option<SignRequestStatus>,
        current_status: Option<SignRequestStatus>,
    ) -> Result<SignRequestStatus> {
        match file_status {
            Some(FileStatus::Draft) => return Ok(SignRequestStatus::Draft),
            Some(FileStatus::AbleToSign) => return self.ordering_default(signing_order, file_id),
            _ => {}
        }

        if let Some(requested) = signer_status {
            let candidate = match current_status {
                Some(current) if !self.sequential.is_status_upgrade(current, requested) => current,
                _ => requested,
            };
            return self
                .sequential
                .validate_status_by_order(candidate, signing_order, file_id);
        }

        self.ordering_default(signing_order, file_id)
    }

    /// Applies `desired` to `sign_request` when the state machine allows it.
    ///
    /// Returns whether the row's status was written. A refused transition is
    /// not an error.
    pub fn update_status_if_allowed(
        &self,
        sign_request: &mut SignRequest,
        current: SignRequestStatus,
        desired: SignRequestStatus,
        is_new: bool,
    ) -> Result<bool> {
        if sign_request.is_signed() {
            return Ok(false);
        }

        if is_new || self.sequential.is_status_upgrade(current, desired) {
            sign_request.status = desired;
            return Ok(true);
        }

        if self.is_ordering_regression(sign_request, current, desired)? {
            log::debug!(
                "Sign request {} returns to draft until lower orders sign",
                sign_request.uuid
            );
            sign_request.status = desired;
            return Ok(true);
        }

        Ok(false)
    }

    fn is_ordering_regression(
        &self,
        sign_request: &SignRequest,
        current: SignRequestStatus,
        desired: SignRequestStatus,
    ) -> Result<bool> {
        if desired != SignRequestStatus::Draft || current != SignRequestStatus::AbleToSign {
            return Ok(false);
        }
        if !self.sequential.is_ordered_numeric_flow(sign_request.file_id)? {
            return Ok(false);
        }
        self.sequential
            .has_pending_lower_order_signers(sign_request.file_id, sign_request.signing_order)
    }

    fn ordering_default(&self, signing_order: u32, file_id: i64) -> Result<SignRequestStatus> {
        if !self.sequential.is_ordered_numeric_flow(file_id)? {
            return Ok(SignRequestStatus::AbleToSign);
        }
        if signing_order == 1 {
            Ok(SignRequestStatus::AbleToSign)
        } else {
            Ok(SignRequestStatus::Draft)
        }
    }
}
