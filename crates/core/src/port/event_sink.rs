// Event Sink Port
// Observers of broker activity (console report, JSON lines, test recorders)

use crate::domain::{AddedEvent, BrokerEvent, RemovedEvent, SummaryEvent};

/// Receives structured broker events
///
/// Added/Removed events are emitted while the broker lock is held, so
/// implementations see them in queue order. They must not block and must not
/// call back into the broker.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &BrokerEvent);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    /// Records every event in emission order
    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<BrokerEvent>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        fn guard(&self) -> MutexGuard<'_, Vec<BrokerEvent>> {
            self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        pub fn events(&self) -> Vec<BrokerEvent> {
            self.guard().clone()
        }

        pub fn added(&self) -> Vec<AddedEvent> {
            self.guard()
                .iter()
                .filter_map(|e| match e {
                    BrokerEvent::Added(added) => Some(added.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn removed(&self) -> Vec<RemovedEvent> {
            self.guard()
                .iter()
                .filter_map(|e| match e {
                    BrokerEvent::Removed(removed) => Some(removed.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn summaries(&self) -> Vec<SummaryEvent> {
            self.guard()
                .iter()
                .filter_map(|e| match e {
                    BrokerEvent::Summary(summary) => Some(summary.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: &BrokerEvent) {
            self.guard().push(event.clone());
        }
    }
}
