use std::sync::Arc;

use crate::error::{Result, SignFlowError};
use crate::model::{SignRequestStatus, SignatureFlow};
use crate::store::{FileStore, SignRequestStore};

/// Ordering questions the status machine asks. Implementations only read.
pub trait SequentialSigning: Send + Sync {
    fn is_status_upgrade(&self, from: SignRequestStatus, to: SignRequestStatus) -> bool;

    /// Whether the file (or the envelope it belongs to) uses the ordered flow.
    fn is_ordered_numeric_flow(&self, file_id: i64) -> Result<bool>;

    /// Whether unsigned signers with a strictly lower order exist.
    fn has_pending_lower_order_signers(&self, file_id: i64, signing_order: u32) -> Result<bool>;

    /// Clamps `desired` down when ordering forbids it.
    fn validate_status_by_order(
        &self,
        desired: SignRequestStatus,
        signing_order: u32,
        file_id: i64,
    ) -> Result<SignRequestStatus>;
}

/// [`SequentialSigning`] answered from the durable store.
pub struct SequentialSigningService {
    files: Arc<dyn FileStore>,
    sign_requests: Arc<dyn SignRequestStore>,
}

impl SequentialSigningService {
    pub fn new(files: Arc<dyn FileStore>, sign_requests: Arc<dyn SignRequestStore>) -> Self {
        Self {
            files,
            sign_requests,
        }
    }

    fn flow_of(&self, file_id: i64) -> Result<SignatureFlow> {
        let file = self
            .files
            .get_file(file_id)?
            .ok_or(SignFlowError::FileNotFound(file_id))?;

        match file.parent_file_id {
            Some(parent_id) => {
                let envelope = self
                    .files
                    .get_file(parent_id)?
                    .ok_or(SignFlowError::FileNotFound(parent_id))?;
                Ok(envelope.signature_flow)
            }
            None => Ok(file.signature_flow),
        }
    }
}

impl SequentialSigning for SequentialSigningService {
    fn is_status_upgrade(&self, from: SignRequestStatus, to: SignRequestStatus) -> bool {
        to > from
    }

    fn is_ordered_numeric_flow(&self, file_id: i64) -> Result<bool> {
        Ok(self.flow_of(file_id)? == SignatureFlow::OrderedNumeric)
    }

    fn has_pending_lower_order_signers(&self, file_id: i64, signing_order: u32) -> Result<bool> {
        let pending = self
            .sign_requests
            .count_unsigned_below_order(file_id, signing_order)?;
        Ok(pending > 0)
    }

    fn validate_status_by_order(
        &self,
        desired: SignRequestStatus,
        signing_order: u32,
        file_id: i64,
    ) -> Result<SignRequestStatus> {
        if desired != SignRequestStatus::AbleToSign || !self.is_ordered_numeric_flow(file_id)? {
            return Ok(desired);
        }
        if self.has_pending_lower_order_signers(file_id, signing_order)? {
            log::debug!(
                "Clamping signer of order {} on file {} to draft: lower orders pending",
                signing_order,
                file_id
            );
            return Ok(SignRequestStatus::Draft);
        }
        Ok(desired)
    }
}
