//! The pool controller.
//!
//! Nothing here owns a worker process. Each call looks at the job queue, the
//! throttle timestamp and the process table as they are right now and acts
//! on that snapshot, so it is safe to call from every request or tick.

use std::sync::Arc;

use serde::Serialize;

use super::{
    ProcessRunner, StartThrottlePolicy, WorkerCommand, WorkerConfiguration, WorkerCounter,
    WorkerJobCounter, WorkerStarter, WorkerStopper,
};
use crate::clock::Clock;
use crate::config::{AppConfig, WorkerSettings};
use crate::error::Result;
use crate::store::JobQueue;

/// A point-in-time view of the worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatus {
    pub async_local: bool,
    pub running_workers: usize,
    pub pending_jobs: u64,
    pub desired_workers: usize,
    pub throttled: bool,
}

#[derive(Clone)]
pub struct WorkerHealthService {
    config: WorkerConfiguration,
    jobs: WorkerJobCounter,
    throttle: StartThrottlePolicy,
    counter: WorkerCounter,
    starter: WorkerStarter,
    stopper: WorkerStopper,
}

impl WorkerHealthService {
    pub fn new(
        app_config: Arc<dyn AppConfig>,
        queue: Arc<dyn JobQueue>,
        runner: Arc<dyn ProcessRunner>,
        clock: Arc<dyn Clock>,
        settings: &WorkerSettings,
    ) -> Self {
        let command = WorkerCommand::new(settings);
        Self {
            config: WorkerConfiguration::new(app_config.clone()),
            jobs: WorkerJobCounter::new(queue, command.job_classes().to_vec()),
            throttle: StartThrottlePolicy::new(app_config, clock),
            counter: WorkerCounter::new(runner.clone(), command.clone()),
            starter: WorkerStarter::new(runner.clone(), command.clone()),
            stopper: WorkerStopper::new(runner, command),
        }
    }

    /// Makes sure pending signing jobs have workers to run them.
    ///
    /// Returns `false` when async-local signing is off or anything fails,
    /// `true` when the pool is healthy or a start is already in flight.
    pub fn ensure_worker_running(&self) -> bool {
        let _span = tracing::info_span!("ensure_worker_running").entered();
        match self.try_ensure_worker_running() {
            Ok(healthy) => healthy,
            Err(e) => {
                log::error!("Failed to ensure signing workers are running: {}", e);
                false
            }
        }
    }

    fn try_ensure_worker_running(&self) -> Result<bool> {
        if !self.config.is_async_local_enabled()? {
            return Ok(false);
        }

        let pending = self.jobs.count_pending_jobs();
        if pending == 0 {
            return Ok(true);
        }

        if self.throttle.is_throttled()? {
            log::debug!("Worker start throttled, {} jobs pending", pending);
            return Ok(true);
        }

        // Recorded before spawning so concurrent callers see the throttle
        self.throttle.record_attempt()?;

        let desired = self.config.desired_worker_count()?;
        let to_start = usize::try_from(pending).map_or(desired, |p| p.min(desired));
        let started = self.starter.start_workers(to_start)?;
        log::info!(
            "Started {} signing workers for {} pending jobs",
            started,
            pending
        );
        Ok(true)
    }

    /// Terminates every signing worker on this host.
    pub fn stop_workers(&self) -> usize {
        self.stopper.stop_all()
    }

    pub fn pool_status(&self) -> Result<PoolStatus> {
        Ok(PoolStatus {
            async_local: self.config.is_async_local_enabled()?,
            running_workers: self.counter.count_running(),
            pending_jobs: self.jobs.count_pending_jobs(),
            desired_workers: self.config.desired_worker_count()?,
            throttled: self.throttle.is_throttled()?,
        })
    }
}
