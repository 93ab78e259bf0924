//! Per-signer status state machine.
//!
//! Statuses only move forward. The single regression allowed is
//! ABLE_TO_SIGN back to DRAFT in an ordered flow while lower-order signers
//! are still pending. A row with a `signed` timestamp never changes again.

mod policy;
mod sequential;
mod service;

pub use policy::StatusUpdatePolicy;
pub use sequential::{SequentialSigning, SequentialSigningService};
pub use service::{DefaultFileStatusPolicy, FileStatusPolicy, StatusService};
