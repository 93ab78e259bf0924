use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SignFlowError;

/// Lifecycle status of a file or envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    NotManaged,
    Draft,
    AbleToSign,
    PartialSigned,
    Signed,
    Deleted,
    SigningInProgress,
}

impl FileStatus {
    pub const fn code(self) -> i32 {
        match self {
            FileStatus::NotManaged => -1,
            FileStatus::Draft => 0,
            FileStatus::AbleToSign => 1,
            FileStatus::PartialSigned => 2,
            FileStatus::Signed => 3,
            FileStatus::Deleted => 4,
            FileStatus::SigningInProgress => 5,
        }
    }

    /// Default human label, used when the file store has no custom text.
    pub const fn label(self) -> &'static str {
        match self {
            FileStatus::NotManaged => "not managed",
            FileStatus::Draft => "draft",
            FileStatus::AbleToSign => "available for signature",
            FileStatus::PartialSigned => "partially signed",
            FileStatus::Signed => "signed",
            FileStatus::Deleted => "deleted",
            FileStatus::SigningInProgress => "signing in progress",
        }
    }
}

impl TryFrom<i32> for FileStatus {
    type Error = SignFlowError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(FileStatus::NotManaged),
            0 => Ok(FileStatus::Draft),
            1 => Ok(FileStatus::AbleToSign),
            2 => Ok(FileStatus::PartialSigned),
            3 => Ok(FileStatus::Signed),
            4 => Ok(FileStatus::Deleted),
            5 => Ok(FileStatus::SigningInProgress),
            other => Err(SignFlowError::InvalidStatus {
                kind: "file",
                code: other,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    File,
    Envelope,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::File => "file",
            NodeType::Envelope => "envelope",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(NodeType::File),
            "envelope" => Some(NodeType::Envelope),
            _ => None,
        }
    }
}

/// How signers of a file are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureFlow {
    /// Every signer may sign as soon as the file is released.
    #[default]
    Parallel,
    /// Signers complete in ascending `signing_order`.
    OrderedNumeric,
}

impl SignatureFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureFlow::Parallel => "parallel",
            SignatureFlow::OrderedNumeric => "ordered_numeric",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parallel" => Some(SignatureFlow::Parallel),
            "ordered_numeric" => Some(SignatureFlow::OrderedNumeric),
            _ => None,
        }
    }
}

/// A document, or the root of an envelope grouping several documents.
#[derive(Debug, Clone)]
pub struct File {
    pub id: i64,
    pub uuid: String,
    pub node_id: i64,
    pub name: String,
    /// Set when this file is a member of the envelope with that id.
    pub parent_file_id: Option<i64>,
    pub node_type: NodeType,
    pub status: FileStatus,
    pub signature_flow: SignatureFlow,
    pub created_at: DateTime<Utc>,
}

impl File {
    pub fn is_envelope(&self) -> bool {
        self.node_type == NodeType::Envelope
    }

    pub fn is_envelope_child(&self) -> bool {
        self.parent_file_id.is_some()
    }
}
