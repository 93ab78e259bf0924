//! Structured failure records that survive the worker process boundary.

mod payload;
mod reporter;

pub use payload::{error_code, ErrorPayload, ErrorPayloadBuilder, FileError};
pub use reporter::{ReportContext, SignRequestErrorReporter};
