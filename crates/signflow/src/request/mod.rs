//! Signer upsert and notification decisions.

mod service;

pub use service::{SignRequestService, SignerRequest};
