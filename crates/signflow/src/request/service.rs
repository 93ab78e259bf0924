use std::sync::Arc;

use crate::broadcast::{ActivityNotifier, SignFlowEvent};
use crate::clock::Clock;
use crate::error::{Result, SignFlowError};
use crate::model::{
    resolve_identify_methods, FileStatus, IdentifyMethod, IdentifyMethodInput, SignRequest,
    SignRequestStatus,
};
use crate::status::StatusService;
use crate::store::{IdentifyMethodStore, SignRequestStore};

/// A caller's request to add or update one signer of a file.
#[derive(Debug, Clone)]
pub struct SignerRequest {
    pub identify_methods: Vec<IdentifyMethodInput>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub notify: bool,
    pub file_id: i64,
    pub signing_order: u32,
    pub file_status: Option<FileStatus>,
    pub signer_status: Option<SignRequestStatus>,
}

impl SignerRequest {
    pub fn new(file_id: i64, identify_methods: Vec<IdentifyMethodInput>) -> Self {
        Self {
            identify_methods,
            display_name: None,
            description: None,
            notify: true,
            file_id,
            signing_order: 1,
            file_status: None,
            signer_status: None,
        }
    }
}

pub struct SignRequestService {
    sign_requests: Arc<dyn SignRequestStore>,
    identify_methods: Arc<dyn IdentifyMethodStore>,
    status: StatusService,
    notifier: Arc<dyn ActivityNotifier>,
    clock: Arc<dyn Clock>,
}

impl SignRequestService {
    pub fn new(
        sign_requests: Arc<dyn SignRequestStore>,
        identify_methods: Arc<dyn IdentifyMethodStore>,
        status: StatusService,
        notifier: Arc<dyn ActivityNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sign_requests,
            identify_methods,
            status,
            notifier,
            clock,
        }
    }

    /// Creates the signer's row on first request for a (file, identify
    /// method) pair and updates it afterwards.
    pub fn create_or_update_sign_request(&self, request: SignerRequest) -> Result<SignRequest> {
        let mut methods = resolve_identify_methods(&request.identify_methods);
        let first = methods
            .first()
            .ok_or(SignFlowError::InvalidIdentificationMethod)?;

        let existing = self
            .sign_requests
            .find_by_identify_method(first, request.file_id)?;
        let is_new = existing.is_none();
        let mut sign_request =
            existing.unwrap_or_else(|| SignRequest::new(request.file_id, self.clock.now()));
        let previous_status = sign_request.status;

        sign_request.signing_order = request.signing_order.max(1);
        sign_request.display_name =
            resolve_display_name(request.display_name.as_deref(), &sign_request, first);
        if let Some(description) = &request.description {
            sign_request.description = Some(description.clone());
        }

        if is_new || is_reevaluable(&sign_request) {
            self.apply_status(&mut sign_request, &request, is_new)?;
        }

        if is_new {
            self.sign_requests.insert_sign_request(&mut sign_request)?;
            log::info!(
                "Created sign request {} for file {} (order {}, {})",
                sign_request.uuid,
                sign_request.file_id,
                sign_request.signing_order,
                sign_request.status
            );
        } else {
            self.sign_requests.update_sign_request(&sign_request)?;
            log::debug!("Updated sign request {}", sign_request.uuid);
        }

        let notify = request.notify
            && self
                .status
                .should_notify_sign_request(sign_request.status, request.file_status);
        self.save_identify_methods(&mut methods, &sign_request, notify)?;

        let now = self.clock.now();
        if notify {
            self.notifier
                .notify(SignFlowEvent::sign_requested(&sign_request, &methods, now));
        }
        if !is_new && sign_request.status != previous_status {
            self.notifier.notify(SignFlowEvent::status_changed(
                &sign_request,
                previous_status,
                sign_request.status,
                now,
            ));
        }

        Ok(sign_request)
    }

    fn apply_status(
        &self,
        sign_request: &mut SignRequest,
        request: &SignerRequest,
        is_new: bool,
    ) -> Result<()> {
        let current = sign_request.status;
        let desired = self.status.determine_initial_status(
            sign_request.signing_order,
            sign_request.file_id,
            request.file_status,
            request.signer_status,
            (!is_new).then_some(current),
        )?;
        self.status
            .update_status_if_allowed(sign_request, current, desired, is_new)?;
        Ok(())
    }

    fn save_identify_methods(
        &self,
        methods: &mut [IdentifyMethod],
        sign_request: &SignRequest,
        notify: bool,
    ) -> Result<()> {
        for method in methods.iter_mut() {
            method.sign_request_id = sign_request.id;
            method.set_notify(notify);
            self.identify_methods.save_identify_method(method)?;
        }
        Ok(())
    }
}

/// Only unsigned rows still in DRAFT or ABLE_TO_SIGN get their status
/// recomputed.
fn is_reevaluable(sign_request: &SignRequest) -> bool {
    !sign_request.is_signed()
        && matches!(
            sign_request.status,
            SignRequestStatus::Draft | SignRequestStatus::AbleToSign
        )
}

fn resolve_display_name(
    requested: Option<&str>,
    sign_request: &SignRequest,
    first_method: &IdentifyMethod,
) -> String {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if !sign_request.display_name.trim().is_empty() {
        return sign_request.display_name.clone();
    }
    first_method.display_name().to_string()
}
