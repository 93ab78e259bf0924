//! Domain records: files, sign requests, identify methods.

pub mod file;
pub mod identify;
pub mod sign_request;

pub use file::{File, FileStatus, NodeType, SignatureFlow};
pub use identify::{
    resolve_identify_methods, IdentifyMethod, IdentifyMethodInput, IdentifyMethodKind,
};
pub use sign_request::{SignRequest, SignRequestStatus};
