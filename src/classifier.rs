//! Pure classification of polled event history
//!
//! Each poll tick fetches the full event history for a stack (newest first)
//! and hands it here together with how many events earlier ticks already
//! observed. Classification is a pure function: the delta of unseen events is
//! computed by count, the stack's own resource type is taken from the
//! chronologically first event in the history (the opening event of any
//! operation is always for the stack itself), and the oldest new event of
//! that type with a terminal status decides the outcome.
//!
//! Scoping the terminal match to the stack's own resource type matters: a
//! nested resource can reach `CREATE_COMPLETE` long before the stack does,
//! and must not end the operation early.

use crate::events::StackEvent;
use crate::status::OperationKind;

/// Outcome of a terminal match for the stack's own resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOutcome {
    /// The stack reached the operation's success status
    Success(StackEvent),
    /// The stack reached a terminal status other than success
    Failure(StackEvent),
}

impl StackOutcome {
    /// The event that resolved the operation
    pub fn event(&self) -> &StackEvent {
        match self {
            StackOutcome::Success(event) | StackOutcome::Failure(event) => event,
        }
    }
}

/// Result of classifying one poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDelta {
    /// Events not observed by earlier ticks, oldest first
    pub new_events: Vec<StackEvent>,
    /// Total number of events in the fetched history; becomes the next
    /// tick's seen count
    pub total_events: usize,
    /// Terminal resolution, if any new stack-level event reached one
    pub outcome: Option<StackOutcome>,
}

/// Classify the events fetched by one poll tick.
///
/// `history` is the full event list as returned by the provider, newest
/// first. `events_seen` is the cumulative count of events observed by
/// previous ticks; the first `history.len() - events_seen` entries are new.
///
/// The stack's own resource type is identified operationally as the resource
/// type of the chronologically first event in the history. If several new
/// stack-level events carry terminal statuses in one window, the oldest
/// decides.
pub fn classify_poll(
    history: &[StackEvent],
    events_seen: usize,
    kind: OperationKind,
) -> PollDelta {
    let Some(first_event) = history.last() else {
        return PollDelta {
            new_events: Vec::new(),
            total_events: 0,
            outcome: None,
        };
    };

    let root_type = first_event.resource_type.clone();
    let unseen = history.len().saturating_sub(events_seen);

    // Newest-first slice of unseen events, reversed into chronological order.
    let mut new_events: Vec<StackEvent> = history[..unseen].to_vec();
    new_events.reverse();

    let outcome = new_events
        .iter()
        .find(|event| {
            event.resource_type == root_type && kind.is_terminal(&event.resource_status)
        })
        .map(|event| {
            if event.resource_status == kind.success_status() {
                StackOutcome::Success(event.clone())
            } else {
                StackOutcome::Failure(event.clone())
            }
        });

    PollDelta {
        new_events,
        total_events: history.len(),
        outcome,
    }
}
