//! Stack operation orchestration for infrastructure provisioning services
//!
//! This crate drives create, update, and delete operations against a remote
//! stack-provisioning provider, processing batches of template resources
//! with bounded concurrency and tracking each operation to completion by
//! polling the provider's event history.
//!
//! ```text
//! Pipeline → StackOperator → submit → CompletionPoller → classify → resolve
//!    └─────────── releases slot on resolution ──────────────┘
//! ```
//!
//! The provider transport is abstracted behind [`StackProvider`]; progress
//! events flow to an [`EventObserver`] with a structured severity for
//! display layers.

pub mod classifier;
pub mod config;
pub mod display;
pub mod errors;
pub mod events;
pub mod operation;
pub mod pipeline;
pub mod poller;
pub mod provider;
pub mod status;
pub mod template;

// Re-export commonly used types
pub use classifier::{classify_poll, PollDelta, StackOutcome};
pub use config::{FailurePolicy, OrchestratorConfig, DEFAULT_POLL_INTERVAL};
pub use display::{EventObserver, NullObserver, TracingObserver};
pub use errors::{OrchestratorError, OrchestratorResult, ProviderError};
pub use events::{EventSeverity, StackEvent};
pub use operation::{StackOperation, StackOperator};
pub use pipeline::{Pipeline, UnitOutcome};
pub use poller::{CompletionPoller, OperationContext};
pub use provider::{StackOperationParams, StackProvider};
pub use status::OperationKind;
pub use template::{read_template, DeploymentUnit};
