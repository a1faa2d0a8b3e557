// Domain Layer - Request kinds, tallies, events and configuration

pub mod config;
pub mod error;
pub mod event;
pub mod request;
pub mod tally;

// Re-exports
pub use config::{DeliveryConfig, RawConfig};
pub use error::ConfigError;
pub use event::{AddedEvent, BrokerEvent, RemovedEvent, SummaryEvent};
pub use request::{ConsumerKind, QueuedRequest, RequestKind};
pub use tally::{ConsumedTally, KindCounts};
