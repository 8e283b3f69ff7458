//! Error types for stack orchestration operations

use std::path::PathBuf;

use thiserror::Error;

use crate::status::OperationKind;

/// Errors that can occur while orchestrating stack operations
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The provider rejected a create/update/delete request; no polling was
    /// started for this stack
    #[error("provider rejected {kind} of stack {stack_name}: {reason}")]
    Submit {
        /// Stack the request was submitted for
        stack_name: String,
        /// Operation kind that was rejected
        kind: OperationKind,
        /// Provider-reported reason
        reason: String,
    },

    /// Fetching the event history failed; polling for this stack has stopped
    #[error("failed to fetch events for stack {stack_name}: {reason}")]
    PollFetch {
        /// Stack whose events could not be fetched
        stack_name: String,
        /// Provider-reported reason
        reason: String,
    },

    /// The stack reached a terminal status other than the operation's
    /// success status
    #[error("could not {kind} stack: {stack_name}")]
    OperationFailed {
        /// Stack that failed
        stack_name: String,
        /// Operation kind that failed
        kind: OperationKind,
    },

    /// Reading a template file from the filesystem failed
    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The provider rejected a template during validation
    #[error("template validation failed for {unit}: {reason}")]
    Validation {
        /// Deployment unit identifier
        unit: String,
        /// Provider-reported reason
        reason: String,
    },

    /// A deployment unit was missing data required by the operation
    #[error("deployment unit {unit} has no template body")]
    MissingTemplate {
        /// Deployment unit identifier
        unit: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for orchestration operations
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Error returned by [`StackProvider`](crate::provider::StackProvider)
/// implementations.
///
/// Transport details stay inside the implementation; the orchestrator only
/// needs a message it can attach to [`OrchestratorError::Submit`] or
/// [`OrchestratorError::PollFetch`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider- or transport-reported description of the failure
    pub message: String,
}

impl ProviderError {
    /// Create a provider error from any displayable reason
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::new(err.to_string())
    }
}
