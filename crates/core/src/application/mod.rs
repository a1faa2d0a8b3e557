// Application Layer - Broker, agents and run orchestration

pub mod agent;
pub mod broker;
pub mod constants;
pub mod orchestrator;

// Re-exports
pub use agent::{AgentStats, ConsumerAgent, ConsumerStats, ProducerAgent, ProducerStats};
pub use broker::{Admission, Broker, BrokerLimits, BrokerSnapshot};
pub use orchestrator::{Orchestrator, RunReport};
