//! Stack operation initiation
//!
//! [`StackOperator`] submits one lifecycle request per deployment unit and
//! then hands the tracking context to the completion poller. A rejected
//! submit fails the unit immediately; polling only starts once the provider
//! has accepted the request.
//!
//! ```text
//! DeploymentUnit → submit → accepted → poll to resolution → success/failure
//!                     └→ rejected → SubmitError (no polling)
//! ```

use std::sync::Arc;

use tracing::info;

use crate::config::OrchestratorConfig;
use crate::display::{EventObserver, TracingObserver};
use crate::errors::{OrchestratorError, OrchestratorResult, ProviderError};
use crate::poller::{CompletionPoller, OperationContext};
use crate::provider::StackProvider;
use crate::status::OperationKind;
use crate::template::DeploymentUnit;

/// Operation a pipeline pass applies to every deployment unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOperation {
    /// Validate templates with the provider; no stack is touched
    Validate,
    /// Create stacks and track them to completion
    Create,
    /// Update stacks and track them to completion
    Update,
    /// Delete stacks and track them to completion
    Delete,
}

/// Submits stack operations and tracks them to resolution
pub struct StackOperator<P: StackProvider + ?Sized> {
    provider: Arc<P>,
    observer: Arc<dyn EventObserver>,
    config: OrchestratorConfig,
}

impl<P: StackProvider + ?Sized> StackOperator<P> {
    /// Create an operator over the given provider, reporting progress
    /// through [`TracingObserver`]
    pub fn new(provider: Arc<P>, config: OrchestratorConfig) -> Self {
        Self {
            provider,
            observer: Arc::new(TracingObserver),
            config,
        }
    }

    /// Replace the progress observer
    pub fn with_observer(mut self, observer: Arc<dyn EventObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The configuration this operator was built with
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run one operation against one deployment unit
    pub async fn execute(
        &self,
        operation: StackOperation,
        unit: &DeploymentUnit,
    ) -> OrchestratorResult<()> {
        match operation {
            StackOperation::Validate => self.validate(unit).await,
            StackOperation::Create => self.deploy(unit).await,
            StackOperation::Update => self.update(unit).await,
            StackOperation::Delete => self.delete(unit).await,
        }
    }

    /// Create the unit's stack and poll until it resolves
    pub async fn deploy(&self, unit: &DeploymentUnit) -> OrchestratorResult<()> {
        let body = self.require_template(unit)?;
        let stack_name = &unit.params.stack_name;

        self.provider
            .create_stack(&unit.params, body)
            .await
            .map_err(|e| self.submit_error(stack_name, OperationKind::Create, e))?;

        info!("Starting deployment of stack: {stack_name}");
        self.track(stack_name, OperationKind::Create).await?;
        info!("Successful creation of stack: {stack_name}");
        Ok(())
    }

    /// Update the unit's stack and poll until it resolves
    pub async fn update(&self, unit: &DeploymentUnit) -> OrchestratorResult<()> {
        let body = self.require_template(unit)?;
        let stack_name = &unit.params.stack_name;

        self.provider
            .update_stack(&unit.params, body)
            .await
            .map_err(|e| self.submit_error(stack_name, OperationKind::Update, e))?;

        info!("Starting update of stack: {stack_name}");
        self.track(stack_name, OperationKind::Update).await?;
        info!("Successful update of stack: {stack_name}");
        Ok(())
    }

    /// Delete the unit's stack and poll until it resolves.
    ///
    /// Deletion needs no template body; a unit built with
    /// [`DeploymentUnit::without_template`] is sufficient.
    pub async fn delete(&self, unit: &DeploymentUnit) -> OrchestratorResult<()> {
        let stack_name = &unit.params.stack_name;

        self.provider
            .delete_stack(stack_name)
            .await
            .map_err(|e| self.submit_error(stack_name, OperationKind::Delete, e))?;

        info!("Starting deletion of stack: {stack_name}");
        self.track(stack_name, OperationKind::Delete).await?;
        info!("Successful deletion of stack: {stack_name}");
        Ok(())
    }

    /// Submit the unit's template for provider-side validation
    pub async fn validate(&self, unit: &DeploymentUnit) -> OrchestratorResult<()> {
        let body = self.require_template(unit)?;

        self.provider
            .validate_template(body)
            .await
            .map_err(|e| OrchestratorError::Validation {
                unit: unit.id.clone(),
                reason: e.to_string(),
            })?;

        info!("Validated template: {}", unit.id);
        Ok(())
    }

    fn require_template<'u>(&self, unit: &'u DeploymentUnit) -> OrchestratorResult<&'u str> {
        unit.template_body
            .as_deref()
            .ok_or_else(|| OrchestratorError::MissingTemplate {
                unit: unit.id.clone(),
            })
    }

    fn submit_error(
        &self,
        stack_name: &str,
        kind: OperationKind,
        err: ProviderError,
    ) -> OrchestratorError {
        OrchestratorError::Submit {
            stack_name: stack_name.to_string(),
            kind,
            reason: err.to_string(),
        }
    }

    async fn track(&self, stack_name: &str, kind: OperationKind) -> OrchestratorResult<()> {
        let poller = CompletionPoller::new(
            self.provider.clone(),
            self.observer.clone(),
            self.config.poll_interval,
        );
        let mut ctx = OperationContext::new(stack_name, kind);
        poller.poll_until_resolved(&mut ctx).await?;
        Ok(())
    }
}
