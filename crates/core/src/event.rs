//! Pipeline event bus.
//!
//! Pipelines publish progress events here. Subscribers (the CLI progress
//! display, tests) receive them without the pipeline knowing who listens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Progress events emitted during one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// An invocation began.
    RunStarted {
        run_id: String,
        stages: usize,
        timestamp: DateTime<Utc>,
    },

    /// A stage is about to run.
    StageStarted {
        run_id: String,
        stage: String,
        index: usize,
        timestamp: DateTime<Utc>,
    },

    /// A stage finished and its outputs were merged.
    StageCompleted {
        run_id: String,
        stage: String,
        slots: Vec<String>,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A stage failed; the invocation is aborted.
    StageFailed {
        run_id: String,
        stage: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// Every stage ran.
    RunCompleted {
        run_id: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

impl PipelineEvent {
    /// The invocation this event belongs to.
    pub fn run_id(&self) -> &str {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::StageStarted { run_id, .. }
            | Self::StageCompleted { run_id, .. }
            | Self::StageFailed { run_id, .. }
            | Self::RunCompleted { run_id, .. } => run_id,
        }
    }
}

/// A broadcast-based event bus for pipeline events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<PipelineEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: PipelineEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<PipelineEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(PipelineEvent::StageStarted {
            run_id: "run-1".into(),
            stage: "classifier".into(),
            index: 0,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            PipelineEvent::StageStarted { stage, index, .. } => {
                assert_eq!(stage, "classifier");
                assert_eq!(*index, 0);
            }
            _ => panic!("Expected StageStarted event"),
        }
        assert_eq!(event.run_id(), "run-1");
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(PipelineEvent::RunCompleted {
            run_id: "run-1".into(),
            duration_ms: 3,
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = PipelineEvent::StageFailed {
            run_id: "r".into(),
            stage: "keywords".into(),
            error_message: "boom".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"stage_failed\""));
    }
}
