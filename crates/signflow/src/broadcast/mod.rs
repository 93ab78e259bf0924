//! Activity event streaming.

pub mod activity;

pub use activity::{ActivityNotifier, Recipient, SignFlowEvent, SignFlowEventBroadcaster};
