//! Orchestrator configuration

use std::time::Duration;

use crate::errors::{OrchestratorError, OrchestratorResult};

/// Interval between event-history polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// What the pipeline does after a deployment unit fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop admitting new units; units already in flight run to resolution.
    /// This mirrors stream semantics where an error tears the pipeline down.
    #[default]
    Halt,
    /// Keep admitting units and report every outcome
    Continue,
}

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of deployment units in flight at once
    pub concurrency: usize,
    /// Fixed delay between event-history polls (no backoff, no jitter)
    pub poll_interval: Duration,
    /// Pipeline behavior after a unit fails
    pub failure_policy: FailurePolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            poll_interval: DEFAULT_POLL_INTERVAL,
            failure_policy: FailurePolicy::Halt,
        }
    }
}

impl OrchestratorConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> OrchestratorResult<()> {
        if self.concurrency == 0 {
            return Err(OrchestratorError::Configuration(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
