//! Completion polling for in-flight stack operations
//!
//! After a submit is accepted, the provider pushes nothing back; completion
//! is discovered by re-fetching the stack's event history on a fixed
//! interval and classifying what is new. Each in-flight operation owns one
//! [`OperationContext`]; ticks within a context are strictly sequential, so
//! the seen-event count only moves forward and every event is classified at
//! most once.
//!
//! ```text
//! submit accepted → [sleep → fetch → classify → emit new events] → resolved
//!                    └───────────── repeat ─────────────┘
//! ```
//!
//! A fetch failure ends polling for that context and surfaces the error;
//! there is no retry and no backoff here. There is also no overall timeout:
//! a stack that never reaches a terminal status is polled until the process
//! stops.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::classifier::{classify_poll, StackOutcome};
use crate::display::EventObserver;
use crate::errors::{OrchestratorError, OrchestratorResult};
use crate::events::StackEvent;
use crate::provider::StackProvider;
use crate::status::OperationKind;

/// Per-stack tracking state for one in-flight operation
///
/// Created when a submit is accepted, owned by the polling future for that
/// stack, and dropped on resolution. Never shared across operations.
#[derive(Debug)]
pub struct OperationContext {
    /// Stack being tracked
    pub stack_name: String,
    /// Operation kind, which fixes the terminal-status set
    pub kind: OperationKind,
    events_seen: usize,
}

impl OperationContext {
    /// Start tracking an operation with no events observed yet
    pub fn new(stack_name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            stack_name: stack_name.into(),
            kind,
            events_seen: 0,
        }
    }

    /// Cumulative count of events observed across all ticks so far
    pub fn events_seen(&self) -> usize {
        self.events_seen
    }
}

/// Drives one operation to resolution by polling its event history
pub struct CompletionPoller<P: StackProvider + ?Sized> {
    provider: Arc<P>,
    observer: Arc<dyn EventObserver>,
    poll_interval: Duration,
}

impl<P: StackProvider + ?Sized> CompletionPoller<P> {
    /// Create a poller over the given provider and observer
    pub fn new(
        provider: Arc<P>,
        observer: Arc<dyn EventObserver>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            provider,
            observer,
            poll_interval,
        }
    }

    /// Poll until the stack reaches a terminal status.
    ///
    /// The first fetch happens one full interval after the call, matching
    /// the cadence of the submit-then-watch flow. New events discovered on
    /// each tick go to the observer, oldest first, before resolution is
    /// acted on.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::PollFetch`] if fetching the history fails;
    ///   polling stops.
    /// - [`OrchestratorError::OperationFailed`] if the stack reaches a
    ///   terminal status other than the operation's success status.
    pub async fn poll_until_resolved(
        &self,
        ctx: &mut OperationContext,
    ) -> OrchestratorResult<StackEvent> {
        loop {
            tokio::time::sleep(self.poll_interval).await;

            let history = self
                .provider
                .describe_stack_events(&ctx.stack_name)
                .await
                .map_err(|e| OrchestratorError::PollFetch {
                    stack_name: ctx.stack_name.clone(),
                    reason: e.to_string(),
                })?;

            let delta = classify_poll(&history, ctx.events_seen, ctx.kind);
            // Monotonic: a short read (e.g. a smaller first page) must not
            // roll the count back and cause re-classification later.
            ctx.events_seen = ctx.events_seen.max(delta.total_events);

            debug!(
                stack = %ctx.stack_name,
                new_events = delta.new_events.len(),
                total_events = delta.total_events,
                "poll tick"
            );

            if !delta.new_events.is_empty() {
                self.observer
                    .on_stack_events(&ctx.stack_name, &delta.new_events);
            }

            match delta.outcome {
                Some(StackOutcome::Success(event)) => return Ok(event),
                Some(StackOutcome::Failure(_)) => {
                    return Err(OrchestratorError::OperationFailed {
                        stack_name: ctx.stack_name.clone(),
                        kind: ctx.kind,
                    })
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::provider::StackOperationParams;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const STACK_TYPE: &str = "AWS::CloudFormation::Stack";

    fn event(seq: i64, resource_type: &str, status: &str) -> StackEvent {
        StackEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, seq as u32).unwrap(),
            logical_resource_id: format!("resource-{seq}"),
            resource_type: resource_type.to_string(),
            resource_status: status.to_string(),
            status_reason: None,
        }
    }

    /// Provider that replays one scripted response per poll tick.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<Vec<StackEvent>, ProviderError>>>,
        fetches: Mutex<usize>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<Vec<StackEvent>, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                fetches: Mutex::new(0),
            }
        }

        fn fetches(&self) -> usize {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl StackProvider for ScriptedProvider {
        async fn create_stack(
            &self,
            _params: &StackOperationParams,
            _template_body: &str,
        ) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn update_stack(
            &self,
            _params: &StackOperationParams,
            _template_body: &str,
        ) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn delete_stack(&self, _stack_name: &str) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn describe_stack_events(
            &self,
            _stack_name: &str,
        ) -> Result<Vec<StackEvent>, ProviderError> {
            *self.fetches.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::new("script exhausted")))
        }

        async fn validate_template(&self, _template_body: &str) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    /// Observer that records each tick's delta.
    #[derive(Default)]
    struct RecordingObserver {
        batches: Mutex<Vec<Vec<StackEvent>>>,
    }

    impl EventObserver for RecordingObserver {
        fn on_stack_events(&self, _stack_name: &str, events: &[StackEvent]) {
            self.batches.lock().unwrap().push(events.to_vec());
        }
    }

    fn history(chronological: Vec<StackEvent>) -> Vec<StackEvent> {
        let mut h = chronological;
        h.reverse();
        h
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_on_stack_success_and_emits_only_new_events() {
        let tick1 = history(vec![
            event(0, STACK_TYPE, "CREATE_IN_PROGRESS"),
            event(1, "AWS::S3::Bucket", "CREATE_IN_PROGRESS"),
            event(2, "AWS::S3::Bucket", "CREATE_COMPLETE"),
        ]);
        let tick2 = history(vec![
            event(0, STACK_TYPE, "CREATE_IN_PROGRESS"),
            event(1, "AWS::S3::Bucket", "CREATE_IN_PROGRESS"),
            event(2, "AWS::S3::Bucket", "CREATE_COMPLETE"),
            event(3, "AWS::EC2::Instance", "CREATE_COMPLETE"),
            event(4, STACK_TYPE, "CREATE_COMPLETE"),
        ]);
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(tick1), Ok(tick2)]));
        let observer = Arc::new(RecordingObserver::default());
        let poller = CompletionPoller::new(
            provider.clone(),
            observer.clone(),
            Duration::from_secs(5),
        );

        let mut ctx = OperationContext::new("web-stack", OperationKind::Create);
        let resolved = poller.poll_until_resolved(&mut ctx).await.unwrap();

        assert_eq!(resolved.resource_status, "CREATE_COMPLETE");
        assert_eq!(resolved.resource_type, STACK_TYPE);
        assert_eq!(ctx.events_seen(), 5);
        assert_eq!(provider.fetches(), 2);

        let batches = observer.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 3);
        // Second tick shows only the two events not seen on the first.
        assert_eq!(batches[1].len(), 2);
        assert_eq!(batches[1][0].logical_resource_id, "resource-3");
        assert_eq!(batches[1][1].logical_resource_id, "resource-4");
    }

    #[tokio::test(start_paused = true)]
    async fn stack_failure_resolves_as_operation_failed() {
        let tick = history(vec![
            event(0, STACK_TYPE, "UPDATE_IN_PROGRESS"),
            event(1, STACK_TYPE, "UPDATE_ROLLBACK_COMPLETE"),
        ]);
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(tick)]));
        let poller = CompletionPoller::new(
            provider,
            Arc::new(crate::display::NullObserver),
            Duration::from_secs(5),
        );

        let mut ctx = OperationContext::new("api-stack", OperationKind::Update);
        let err = poller.poll_until_resolved(&mut ctx).await.unwrap_err();

        match err {
            OrchestratorError::OperationFailed { stack_name, kind } => {
                assert_eq!(stack_name, "api-stack");
                assert_eq!(kind, OperationKind::Update);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_error_stops_polling() {
        let tick1 = history(vec![event(0, STACK_TYPE, "CREATE_IN_PROGRESS")]);
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tick1),
            Err(ProviderError::new("connection reset")),
        ]));
        let poller = CompletionPoller::new(
            provider.clone(),
            Arc::new(RecordingObserver::default()),
            Duration::from_secs(5),
        );

        let mut ctx = OperationContext::new("web-stack", OperationKind::Create);
        let err = poller.poll_until_resolved(&mut ctx).await.unwrap_err();

        match err {
            OrchestratorError::PollFetch { stack_name, reason } => {
                assert_eq!(stack_name, "web-stack");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // The loop returned on the failed tick; nothing fetched afterwards.
        assert_eq!(provider.fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn seen_count_does_not_regress_on_short_reads() {
        let full = history(vec![
            event(0, STACK_TYPE, "CREATE_IN_PROGRESS"),
            event(1, "AWS::S3::Bucket", "CREATE_IN_PROGRESS"),
        ]);
        // A shorter page than the previous tick, then resolution.
        let short = history(vec![event(0, STACK_TYPE, "CREATE_IN_PROGRESS")]);
        let done = history(vec![
            event(0, STACK_TYPE, "CREATE_IN_PROGRESS"),
            event(1, "AWS::S3::Bucket", "CREATE_IN_PROGRESS"),
            event(2, STACK_TYPE, "CREATE_COMPLETE"),
        ]);
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(full),
            Ok(short),
            Ok(done),
        ]));
        let observer = Arc::new(RecordingObserver::default());
        let poller = CompletionPoller::new(
            provider,
            observer.clone(),
            Duration::from_secs(5),
        );

        let mut ctx = OperationContext::new("web-stack", OperationKind::Create);
        poller.poll_until_resolved(&mut ctx).await.unwrap();

        let batches = observer.batches.lock().unwrap();
        // Tick 1 emits two events, tick 2 emits none, tick 3 only the new one.
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 1);
        assert_eq!(batches[1][0].resource_status, "CREATE_COMPLETE");
    }
}
