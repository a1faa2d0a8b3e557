// Agents - producer and consumer loops sharing one Broker

mod consumer;
mod producer;

pub use consumer::{ConsumerAgent, ConsumerStats};
pub use producer::{ProducerAgent, ProducerStats};

/// What an agent reports back when its loop ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStats {
    Producer(ProducerStats),
    Consumer(ConsumerStats),
}
