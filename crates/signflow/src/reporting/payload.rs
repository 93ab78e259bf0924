use std::collections::BTreeMap;
use std::error::Error;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SignFlowError;

/// Failure record written to the cache by a worker and read back by pollers.
///
/// Unset optional fields are absent from the serialized form, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub code: i32,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_request_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_errors: Option<BTreeMap<i64, FileError>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub message: String,
    pub code: i32,
}

/// Numeric code for an arbitrary error. Crate errors carry their own code;
/// anything else maps to 0.
pub fn error_code(error: &(dyn Error + 'static)) -> i32 {
    error
        .downcast_ref::<SignFlowError>()
        .map(SignFlowError::code)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default)]
pub struct ErrorPayloadBuilder {
    message: Option<String>,
    code: i32,
    file_id: Option<i64>,
    sign_request_id: Option<i64>,
    sign_request_uuid: Option<String>,
    file_errors: BTreeMap<i64, FileError>,
}

impl ErrorPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds message and code from `error` plus whatever context is known.
    pub fn from_error(
        error: &(dyn Error + 'static),
        file_id: Option<i64>,
        sign_request_id: Option<i64>,
        sign_request_uuid: Option<&str>,
    ) -> Self {
        Self {
            message: Some(error.to_string()),
            code: error_code(error),
            file_id,
            sign_request_id,
            sign_request_uuid: sign_request_uuid.map(str::to_string),
            file_errors: BTreeMap::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn file_id(mut self, file_id: i64) -> Self {
        self.file_id = Some(file_id);
        self
    }

    pub fn sign_request_id(mut self, id: i64) -> Self {
        self.sign_request_id = Some(id);
        self
    }

    pub fn sign_request_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.sign_request_uuid = Some(uuid.into());
        self
    }

    /// Records a per-file failure. A later call for the same file replaces
    /// the earlier one.
    pub fn add_file_error(mut self, file_id: i64, error: &(dyn Error + 'static)) -> Self {
        self.file_errors.insert(
            file_id,
            FileError {
                message: error.to_string(),
                code: error_code(error),
            },
        );
        self
    }

    pub fn build(self) -> ErrorPayload {
        ErrorPayload {
            message: self
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
            code: self.code,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            file_id: self.file_id,
            sign_request_id: self.sign_request_id,
            sign_request_uuid: self.sign_request_uuid,
            file_errors: (!self.file_errors.is_empty()).then_some(self.file_errors),
        }
    }
}
