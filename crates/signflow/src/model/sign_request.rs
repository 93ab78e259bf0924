use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SignFlowError;

/// Per-signer approval status.
///
/// Ordering of the variants is the upgrade order: a transition is an upgrade
/// when it moves to a strictly higher rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignRequestStatus {
    Draft,
    AbleToSign,
    Signed,
}

impl SignRequestStatus {
    pub const fn code(self) -> i32 {
        match self {
            SignRequestStatus::Draft => 0,
            SignRequestStatus::AbleToSign => 1,
            SignRequestStatus::Signed => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignRequestStatus::Draft => "draft",
            SignRequestStatus::AbleToSign => "able_to_sign",
            SignRequestStatus::Signed => "signed",
        }
    }
}

impl TryFrom<i32> for SignRequestStatus {
    type Error = SignFlowError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SignRequestStatus::Draft),
            1 => Ok(SignRequestStatus::AbleToSign),
            2 => Ok(SignRequestStatus::Signed),
            other => Err(SignFlowError::InvalidStatus {
                kind: "sign request",
                code: other,
            }),
        }
    }
}

impl std::fmt::Display for SignRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signer's participation record for one file.
#[derive(Debug, Clone)]
pub struct SignRequest {
    /// `None` until the row has been inserted.
    pub id: Option<i64>,
    pub uuid: String,
    pub file_id: i64,
    pub signing_order: u32,
    pub display_name: String,
    pub description: Option<String>,
    pub status: SignRequestStatus,
    /// Set by the signing worker; presence means this signer is done.
    pub signed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SignRequest {
    /// Creates an unsaved sign request with a fresh uuid.
    pub fn new(file_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            file_id,
            signing_order: 1,
            display_name: String::new(),
            description: None,
            status: SignRequestStatus::Draft,
            signed: None,
            created_at,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_follows_flow() {
        assert!(SignRequestStatus::Draft < SignRequestStatus::AbleToSign);
        assert!(SignRequestStatus::AbleToSign < SignRequestStatus::Signed);
    }

    #[test]
    fn test_status_codes() {
        for code in 0..=2 {
            assert_eq!(SignRequestStatus::try_from(code).unwrap().code(), code);
        }
        assert!(SignRequestStatus::try_from(3).is_err());
        assert!(SignRequestStatus::try_from(-1).is_err());
    }

    #[test]
    fn test_new_sign_request_defaults() {
        let now = Utc::now();
        let sr = SignRequest::new(7, now);
        assert!(sr.id.is_none());
        assert_eq!(sr.file_id, 7);
        assert_eq!(sr.signing_order, 1);
        assert_eq!(sr.status, SignRequestStatus::Draft);
        assert!(!sr.is_signed());
        assert_eq!(sr.uuid.len(), 36);
    }
}
