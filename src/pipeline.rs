//! Bounded-concurrency processing of deployment units
//!
//! The pipeline consumes deployment units lazily and keeps at most N in
//! flight, where "in flight" spans the whole submit → poll → resolve cycle,
//! not just the network submit. All in-flight operations run inside the
//! caller's task as one set of cooperatively scheduled futures; no state is
//! shared between them.
//!
//! After a unit fails, the configured [`FailurePolicy`] decides whether
//! further units are admitted. Units already in flight always run to
//! resolution either way.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::warn;

use crate::config::FailurePolicy;
use crate::errors::OrchestratorResult;
use crate::operation::{StackOperation, StackOperator};
use crate::provider::StackProvider;
use crate::template::DeploymentUnit;

/// Result of processing one deployment unit
#[derive(Debug)]
pub struct UnitOutcome {
    /// Deployment unit identifier (path or logical name)
    pub unit_id: String,
    /// Stack the unit targeted
    pub stack_name: String,
    /// Resolution for this unit
    pub result: OrchestratorResult<()>,
}

impl UnitOutcome {
    /// Whether the unit resolved successfully
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs one operation across a batch of deployment units with a
/// concurrency bound
pub struct Pipeline<P: StackProvider + ?Sized> {
    operator: Arc<StackOperator<P>>,
}

impl<P: StackProvider + ?Sized> Pipeline<P> {
    /// Create a pipeline over the given operator
    pub fn new(operator: Arc<StackOperator<P>>) -> Self {
        Self { operator }
    }

    /// Process the units in order of admission, with at most
    /// `concurrency` units in flight at once.
    ///
    /// Units are pulled from the iterator only when a slot frees up.
    /// Outcomes are returned in resolution order, one per admitted unit.
    ///
    /// # Errors
    ///
    /// [`Configuration`](crate::errors::OrchestratorError::Configuration)
    /// if the configuration is invalid. Per-unit failures are reported
    /// inside [`UnitOutcome`], not as a pipeline error.
    pub async fn run<I>(
        &self,
        operation: StackOperation,
        units: I,
    ) -> OrchestratorResult<Vec<UnitOutcome>>
    where
        I: IntoIterator<Item = DeploymentUnit>,
    {
        let config = self.operator.config();
        config.validate()?;
        let limit = config.concurrency;
        let policy = config.failure_policy;

        let mut pending = units.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut outcomes = Vec::new();
        let mut halted = false;

        loop {
            while !halted && in_flight.len() < limit {
                match pending.next() {
                    Some(unit) => in_flight.push(self.process_unit(operation, unit)),
                    None => break,
                }
            }

            match in_flight.next().await {
                Some(outcome) => {
                    if !outcome.is_success() && policy == FailurePolicy::Halt {
                        halted = true;
                        warn!(
                            unit = %outcome.unit_id,
                            "unit failed, halting admission of further units"
                        );
                    }
                    outcomes.push(outcome);
                }
                None => break,
            }
        }

        Ok(outcomes)
    }

    async fn process_unit(
        &self,
        operation: StackOperation,
        unit: DeploymentUnit,
    ) -> UnitOutcome {
        let result = self.operator.execute(operation, &unit).await;
        UnitOutcome {
            unit_id: unit.id,
            stack_name: unit.params.stack_name,
            result,
        }
    }
}
