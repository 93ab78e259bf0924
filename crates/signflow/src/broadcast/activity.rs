//! Activity events raised by signer changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::{IdentifyMethod, IdentifyMethodKind, SignRequest, SignRequestStatus};

/// Where a notification for a signer should go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub method: IdentifyMethodKind,
    pub value: String,
}

impl From<&IdentifyMethod> for Recipient {
    fn from(method: &IdentifyMethod) -> Self {
        Self {
            method: method.kind,
            value: method.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignFlowEvent {
    /// A signer became able to sign and should be told so.
    SignRequested {
        sign_request_uuid: String,
        file_id: i64,
        display_name: String,
        recipients: Vec<Recipient>,
        timestamp: DateTime<Utc>,
    },
    /// An existing signer's status moved.
    StatusChanged {
        sign_request_uuid: String,
        file_id: i64,
        from: SignRequestStatus,
        to: SignRequestStatus,
        timestamp: DateTime<Utc>,
    },
}

impl SignFlowEvent {
    pub fn sign_requested(
        sign_request: &SignRequest,
        methods: &[IdentifyMethod],
        timestamp: DateTime<Utc>,
    ) -> Self {
        SignFlowEvent::SignRequested {
            sign_request_uuid: sign_request.uuid.clone(),
            file_id: sign_request.file_id,
            display_name: sign_request.display_name.clone(),
            recipients: methods.iter().map(Recipient::from).collect(),
            timestamp,
        }
    }

    pub fn status_changed(
        sign_request: &SignRequest,
        from: SignRequestStatus,
        to: SignRequestStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        SignFlowEvent::StatusChanged {
            sign_request_uuid: sign_request.uuid.clone(),
            file_id: sign_request.file_id,
            from,
            to,
            timestamp,
        }
    }

    pub fn sign_request_uuid(&self) -> &str {
        match self {
            SignFlowEvent::SignRequested {
                sign_request_uuid, ..
            }
            | SignFlowEvent::StatusChanged {
                sign_request_uuid, ..
            } => sign_request_uuid,
        }
    }
}

/// Receiver of activity events. Delivery is best-effort.
pub trait ActivityNotifier: Send + Sync {
    fn notify(&self, event: SignFlowEvent);
}

/// Fans activity events out to any number of subscribers.
#[derive(Clone)]
pub struct SignFlowEventBroadcaster {
    sender: Arc<broadcast::Sender<SignFlowEvent>>,
}

impl SignFlowEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: SignFlowEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SignFlowEvent> {
        self.sender.subscribe()
    }
}

impl Default for SignFlowEventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ActivityNotifier for SignFlowEventBroadcaster {
    fn notify(&self, event: SignFlowEvent) {
        log::debug!(
            "Activity event for sign request {}",
            event.sign_request_uuid()
        );
        self.send(event);
    }
}
