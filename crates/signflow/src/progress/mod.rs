//! Progress views and the status long-poll.

pub mod poll_policy;
mod service;

pub use service::{
    is_progress_complete, FileProgress, PollSettings, ProgressService, SignRequestProgress,
    SignerProgress,
};
