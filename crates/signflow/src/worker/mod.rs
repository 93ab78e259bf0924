//! Local signing worker pool.
//!
//! Workers are plain OS processes consuming the shared job queue. The pool
//! keeps no handles: counting, starting and stopping all go through a fresh
//! process-table snapshot from a [`ProcessRunner`].

pub mod command;
pub mod config;
pub mod counter;
pub mod health;
pub mod job_counter;
pub mod process;
pub mod starter;
pub mod stopper;
pub mod throttle;

pub use command::WorkerCommand;
pub use config::{WorkerConfiguration, DEFAULT_WORKERS, MAX_WORKERS, MIN_WORKERS};
pub use counter::WorkerCounter;
pub use health::{PoolStatus, WorkerHealthService};
pub use job_counter::WorkerJobCounter;
pub use process::{ProcessInfo, ProcessRunner, SystemProcessRunner};
pub use starter::WorkerStarter;
pub use stopper::WorkerStopper;
pub use throttle::{StartThrottlePolicy, START_THROTTLE_SECS};
