//! Deployment units and template loading
//!
//! A deployment unit pairs one template resource with the parameters for the
//! stack operation it feeds. Units are immutable once constructed and owned
//! by the pipeline slot that processes them. Template files are read
//! synchronously at construction time; the read blocks only the unit being
//! built, never other pipeline slots.

use std::fs;
use std::path::Path;

use crate::errors::{OrchestratorError, OrchestratorResult};
use crate::provider::StackOperationParams;

/// One template resource queued for a stack operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentUnit {
    /// Identifier for reporting: the template path or a logical name
    pub id: String,
    /// Raw template text; `None` for operations that need none (delete)
    pub template_body: Option<String>,
    /// Operation parameters for the target stack
    pub params: StackOperationParams,
}

impl DeploymentUnit {
    /// Build a unit by reading the template at `path`
    pub fn from_template_file(
        path: impl AsRef<Path>,
        params: StackOperationParams,
    ) -> OrchestratorResult<Self> {
        let path = path.as_ref();
        let body = read_template(path)?;
        Ok(Self {
            id: path.display().to_string(),
            template_body: Some(body),
            params,
        })
    }

    /// Build a unit from an in-memory template body
    pub fn from_template_body(
        id: impl Into<String>,
        body: impl Into<String>,
        params: StackOperationParams,
    ) -> Self {
        Self {
            id: id.into(),
            template_body: Some(body.into()),
            params,
        }
    }

    /// Build a body-less unit, for deletions
    pub fn without_template(params: StackOperationParams) -> Self {
        Self {
            id: params.stack_name.clone(),
            template_body: None,
            params,
        }
    }
}

/// Read a template file's full contents
pub fn read_template(path: &Path) -> OrchestratorResult<String> {
    fs::read_to_string(path).map_err(|source| OrchestratorError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })
}
