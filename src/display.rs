//! Progress side channel for polled events
//!
//! Every poll tick that discovers new events forwards them (oldest first) to
//! an [`EventObserver`] before any resolution is acted on. Observers are the
//! seam for display layers; the core hands over structured events with a
//! severity classification and leaves colorization or tabulation to the
//! consumer.

use tracing::{error, info};

use crate::events::{EventSeverity, StackEvent};

/// Receives new events discovered while polling a stack
pub trait EventObserver: Send + Sync {
    /// Called once per poll tick that found new events, oldest first
    fn on_stack_events(&self, stack_name: &str, events: &[StackEvent]);
}

/// Observer that logs each event as a row through `tracing`
///
/// Rows carry time-of-day, logical resource id, resource type, status, and
/// reason. Failure-severity events log at error level, everything else at
/// info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn on_stack_events(&self, stack_name: &str, events: &[StackEvent]) {
        for event in events {
            let reason = event.status_reason.as_deref().unwrap_or("");
            match event.severity() {
                EventSeverity::Failure => error!(
                    stack = stack_name,
                    "[{}] {} {} {} {}",
                    event.time_of_day(),
                    event.logical_resource_id,
                    event.resource_type,
                    event.resource_status,
                    reason,
                ),
                _ => info!(
                    stack = stack_name,
                    "[{}] {} {} {} {}",
                    event.time_of_day(),
                    event.logical_resource_id,
                    event.resource_type,
                    event.resource_status,
                    reason,
                ),
            }
        }
    }
}

/// Observer that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EventObserver for NullObserver {
    fn on_stack_events(&self, _stack_name: &str, _events: &[StackEvent]) {}
}
