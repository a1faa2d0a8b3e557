// Port Layer - Interfaces for external collaborators

pub mod event_sink;

// Re-exports
pub use event_sink::EventSink;
