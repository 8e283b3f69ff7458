//! Operation kinds and their terminal status sets
//!
//! Each lifecycle operation watches for a fixed set of stack statuses that
//! end the operation, with exactly one of them counting as success. The sets
//! overlap: a failed create can roll forward into delete statuses, so the
//! create set includes them.

use std::fmt;

/// Statuses that end a stack creation
const CREATE_TERMINAL: &[&str] = &[
    "CREATE_COMPLETE",
    "CREATE_FAILED",
    "ROLLBACK_COMPLETE",
    "ROLLBACK_FAILED",
    "DELETE_FAILED",
    "DELETE_COMPLETE",
];

/// Statuses that end a stack update
const UPDATE_TERMINAL: &[&str] = &[
    "UPDATE_COMPLETE",
    "UPDATE_ROLLBACK_COMPLETE",
    "UPDATE_ROLLBACK_FAILED",
    "DELETE_FAILED",
    "DELETE_COMPLETE",
];

/// Statuses that end a stack deletion
const DELETE_TERMINAL: &[&str] = &["DELETE_FAILED", "DELETE_COMPLETE"];

/// The kind of lifecycle operation being driven against a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Create a new stack from a template
    Create,
    /// Update an existing stack with a new template
    Update,
    /// Delete an existing stack
    Delete,
}

impl OperationKind {
    /// Statuses from which no further stack-level transition occurs for this
    /// operation
    pub fn terminal_statuses(&self) -> &'static [&'static str] {
        match self {
            OperationKind::Create => CREATE_TERMINAL,
            OperationKind::Update => UPDATE_TERMINAL,
            OperationKind::Delete => DELETE_TERMINAL,
        }
    }

    /// The single terminal status that counts as success for this operation
    pub fn success_status(&self) -> &'static str {
        match self {
            OperationKind::Create => "CREATE_COMPLETE",
            OperationKind::Update => "UPDATE_COMPLETE",
            OperationKind::Delete => "DELETE_COMPLETE",
        }
    }

    /// Whether the given status ends this operation
    pub fn is_terminal(&self, status: &str) -> bool {
        self.terminal_statuses().contains(&status)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        write!(f, "{verb}")
    }
}
