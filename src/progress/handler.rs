//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a deck moves through the pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started for a deck or a saved plan
    Started { input: String },

    StageStarted { stage: String },

    StageComplete { stage: String, duration: Duration },

    /// Research task picked up
    TaskStarted {
        task_id: String,
        query: String,
        index: usize,
        total: usize,
    },

    /// Research task finished
    TaskComplete {
        task_id: String,
        status: String,
        sources: usize,
        confidence: f64,
        duration: Duration,
    },

    /// One claim judged by the validator
    ClaimValidated {
        validation_id: String,
        status: String,
        severity: String,
        index: usize,
        total: usize,
    },

    ArtifactWritten { path: PathBuf },

    /// User declined to continue before a stage
    Cancelled { stage: String },

    Completed { total_cost: f64, total_time: Duration },

    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::Started {
            input: "deck.pdf".to_string(),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            input: "deck.pdf".to_string(),
        });
        handler.on_progress(&ProgressEvent::StageStarted {
            stage: "Research".to_string(),
        });
        handler.on_progress(&ProgressEvent::Completed {
            total_cost: 0.42,
            total_time: Duration::from_secs(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::TaskStarted {
            task_id: "T001".to_string(),
            query: "Find competitors".to_string(),
            index: 1,
            total: 4,
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("TaskStarted"));
        assert!(debug_str.contains("T001"));
    }
}
