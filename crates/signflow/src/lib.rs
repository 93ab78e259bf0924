//! Coordination core for multi-party document signing.
//!
//! Tracks each signer's status through an ordered or parallel flow, keeps a
//! pool of detached signing worker processes alive, and lets clients follow
//! progress and failures through a shared TTL cache.

pub mod broadcast;
pub mod cache;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod progress;
pub mod reporting;
pub mod request;
pub mod status;
pub mod store;
pub mod telemetry;
pub mod worker;

pub use broadcast::{ActivityNotifier, SignFlowEvent, SignFlowEventBroadcaster};
pub use cache::{DistributedCache, MemoryCache, StatusCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_config, AppConfig, SignFlowConfig};
pub use db::{Database, DatabaseError};
pub use error::{CacheError, ConfigError, ProcessError, Result, SignFlowError};
pub use model::{
    File, FileStatus, IdentifyMethod, IdentifyMethodInput, IdentifyMethodKind, NodeType,
    SignRequest, SignRequestStatus, SignatureFlow,
};
pub use progress::{PollSettings, ProgressService, SignRequestProgress};
pub use reporting::{ErrorPayload, ErrorPayloadBuilder, ReportContext, SignRequestErrorReporter};
pub use request::{SignRequestService, SignerRequest};
pub use status::{SequentialSigningService, StatusService, StatusUpdatePolicy};
pub use store::{FileStore, IdentifyMethodStore, JobClassCount, JobQueue, SignRequestStore};
pub use telemetry::init_logging;
pub use worker::{PoolStatus, ProcessRunner, SystemProcessRunner, WorkerHealthService};
