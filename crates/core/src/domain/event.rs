// Broker events (core -> EventSink)

use super::request::{ConsumerKind, RequestKind};
use super::tally::{ConsumedTally, KindCounts};
use serde::Serialize;

/// An item was appended to the broker queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedEvent {
    pub kind: RequestKind,
    pub seq: u64,
    /// Produced tally after this admission
    pub produced: KindCounts,
    /// Queue contents per kind after the append
    pub in_queue: KindCounts,
    pub elapsed_secs: f64,
}

/// An item was taken from the front of the broker queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedEvent {
    pub consumer: ConsumerKind,
    pub kind: RequestKind,
    pub seq: u64,
    /// This consumer's tally after the removal
    pub consumed: KindCounts,
    /// Queue contents per kind after the removal
    pub in_queue: KindCounts,
    pub elapsed_secs: f64,
}

/// Final tallies, emitted once after every agent has stopped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEvent {
    pub produced: KindCounts,
    pub consumed: ConsumedTally,
    pub elapsed_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BrokerEvent {
    Added(AddedEvent),
    Removed(RemovedEvent),
    Summary(SummaryEvent),
}

impl BrokerEvent {
    /// Single-line JSON encoding
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
