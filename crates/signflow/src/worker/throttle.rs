use std::sync::Arc;

use crate::clock::Clock;
use crate::config::app_config::WORKER_LAST_START_ATTEMPT;
use crate::config::AppConfig;
use crate::error::Result;

pub const START_THROTTLE_SECS: i64 = 10;

/// Rate-limits scale-up attempts across every process sharing the config
/// store.
#[derive(Clone)]
pub struct StartThrottlePolicy {
    app_config: Arc<dyn AppConfig>,
    clock: Arc<dyn Clock>,
    interval_secs: i64,
}

impl StartThrottlePolicy {
    pub fn new(app_config: Arc<dyn AppConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            app_config,
            clock,
            interval_secs: START_THROTTLE_SECS,
        }
    }

    /// True while the last recorded attempt is less than the interval old.
    /// A timestamp in the future does not throttle.
    pub fn is_throttled(&self) -> Result<bool> {
        let Some(last) = self.app_config.get_int(WORKER_LAST_START_ATTEMPT)? else {
            return Ok(false);
        };
        let elapsed = self.clock.now().timestamp() - last;
        Ok((0..self.interval_secs).contains(&elapsed))
    }

    pub fn record_attempt(&self) -> Result<()> {
        self.app_config
            .set_int(WORKER_LAST_START_ATTEMPT, self.clock.now().timestamp())
    }
}
