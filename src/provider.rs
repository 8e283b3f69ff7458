//! Provider abstraction for stack provisioning services
//!
//! The orchestrator never talks to a provisioning service directly; it goes
//! through [`StackProvider`]. Implementations wrap a concrete SDK or HTTP
//! client and carry their own retry and throttling behavior. A provider
//! value may be shared read-only across concurrent operations; every method
//! is stateless per call.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::events::StackEvent;

/// Parameters for a stack lifecycle request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackOperationParams {
    /// Name of the stack the operation targets
    pub stack_name: String,
    /// Capabilities to acknowledge on submit (e.g. IAM-affecting templates)
    pub capabilities: Vec<String>,
    /// Template parameter key/value pairs
    pub parameters: Vec<(String, String)>,
}

impl StackOperationParams {
    /// Parameters targeting the named stack, with no capabilities or
    /// template parameters
    pub fn new(stack_name: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            ..Self::default()
        }
    }

    /// Acknowledge a capability on submit
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Add a template parameter
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }
}

/// Operations the orchestrator needs from a provisioning service
///
/// Submit methods return once the provider has *accepted* the request;
/// completion is tracked separately through
/// [`describe_stack_events`](Self::describe_stack_events).
#[async_trait]
pub trait StackProvider: Send + Sync {
    /// Submit creation of a new stack from the given template body
    async fn create_stack(
        &self,
        params: &StackOperationParams,
        template_body: &str,
    ) -> Result<(), ProviderError>;

    /// Submit an update of an existing stack to the given template body
    async fn update_stack(
        &self,
        params: &StackOperationParams,
        template_body: &str,
    ) -> Result<(), ProviderError>;

    /// Submit deletion of an existing stack
    async fn delete_stack(&self, stack_name: &str) -> Result<(), ProviderError>;

    /// Fetch the event history for a stack, newest first.
    ///
    /// Implementations return the first page of events only; pagination is
    /// not consulted. For stacks with very long histories this can hide the
    /// terminal event — a known limitation.
    async fn describe_stack_events(
        &self,
        stack_name: &str,
    ) -> Result<Vec<StackEvent>, ProviderError>;

    /// Ask the provider to validate a template body without submitting it
    async fn validate_template(&self, template_body: &str) -> Result<(), ProviderError>;
}
