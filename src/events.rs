//! Stack events as reported by the provider
//!
//! The provider reports an event for every resource transition inside a
//! stack, newest first. Events are immutable facts; the orchestrator never
//! synthesizes them, only classifies and forwards them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One resource transition reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEvent {
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
    /// Logical name of the resource within the template
    pub logical_resource_id: String,
    /// Provider resource type (the stack itself has its own type)
    pub resource_type: String,
    /// Status the resource transitioned to
    pub resource_status: String,
    /// Provider-supplied explanation, usually present on failures
    pub status_reason: Option<String>,
}

impl StackEvent {
    /// Severity bucket for this event's status
    pub fn severity(&self) -> EventSeverity {
        EventSeverity::of(&self.resource_status)
    }

    /// Time-of-day portion of the timestamp, for display rows
    pub fn time_of_day(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Severity classification of a resource status, for display layers
///
/// The core emits this enum; mapping to colors or log levels is the display
/// layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Rollback or failure statuses
    Failure,
    /// Forward progress, not yet complete
    InProgress,
    /// Successful completion
    Success,
    /// Anything else (including delete completions)
    Neutral,
}

impl EventSeverity {
    /// Classify a raw status string.
    ///
    /// Rules, checked in order:
    /// - contains `ROLLBACK` or `FAILED` → [`Failure`](Self::Failure)
    /// - contains `IN_PROGRESS` → [`InProgress`](Self::InProgress)
    /// - contains `COMPLETE` without `DELETE` → [`Success`](Self::Success)
    /// - otherwise → [`Neutral`](Self::Neutral)
    pub fn of(status: &str) -> Self {
        if status.contains("ROLLBACK") || status.contains("FAILED") {
            EventSeverity::Failure
        } else if status.contains("IN_PROGRESS") {
            EventSeverity::InProgress
        } else if status.contains("COMPLETE") && !status.contains("DELETE") {
            EventSeverity::Success
        } else {
            EventSeverity::Neutral
        }
    }
}
