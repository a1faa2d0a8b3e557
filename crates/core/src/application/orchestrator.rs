// Orchestrator - wires the broker to the fixed 2x2 agent topology

use super::agent::{AgentStats, ConsumerAgent, ConsumerStats, ProducerAgent, ProducerStats};
use super::broker::{Broker, BrokerLimits};
use crate::domain::{BrokerEvent, ConsumerKind, DeliveryConfig, RequestKind, SummaryEvent};
use crate::error::{DeliveryError, Result};
use crate::port::EventSink;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Everything known once all four agents have stopped
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: SummaryEvent,
    pub final_queue_len: usize,
    /// Filled slots acquired on an empty queue
    pub anomalies: u64,
    pub producers: Vec<ProducerStats>,
    pub consumers: Vec<ConsumerStats>,
}

impl RunReport {
    /// Items admitted but never delivered
    pub fn undelivered(&self) -> i64 {
        i64::from(self.summary.produced.total()) - i64::from(self.summary.consumed.total())
    }
}

/// Runs one delivery simulation
pub struct Orchestrator {
    config: DeliveryConfig,
    limits: BrokerLimits,
    sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(config: DeliveryConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            limits: BrokerLimits::default(),
            sink,
        }
    }

    pub fn with_limits(mut self, limits: BrokerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Start both producers and both consumers, wait for all of them, then
    /// emit the summary
    pub async fn run(self) -> Result<RunReport> {
        let broker = Arc::new(Broker::with_limits(&self.config, self.limits, self.sink));
        info!(
            total_requests = self.config.total_requests,
            capacity = self.limits.capacity,
            strict_accounting = self.config.strict_accounting,
            "Delivery run starting"
        );

        let mut agents = JoinSet::new();
        let producers = [
            (RequestKind::Pizza, self.config.pizza_delay),
            (RequestKind::Sandwich, self.config.sandwich_delay),
        ];
        for (kind, delay) in producers {
            let agent = ProducerAgent::new(kind, delay, Arc::clone(&broker));
            agents.spawn(async move { agent.run().await.map(AgentStats::Producer) });
        }
        let consumers = [
            (ConsumerKind::ServiceA, self.config.consumer_a_delay),
            (ConsumerKind::ServiceB, self.config.consumer_b_delay),
        ];
        for (kind, delay) in consumers {
            let agent = ConsumerAgent::new(kind, delay, Arc::clone(&broker));
            agents.spawn(async move { agent.run().await.map(AgentStats::Consumer) });
        }

        // Join everything before reporting a failure so no agent outlives the run
        let mut report_producers = Vec::with_capacity(2);
        let mut report_consumers = Vec::with_capacity(2);
        let mut failure: Option<DeliveryError> = None;
        while let Some(joined) = agents.join_next().await {
            match joined {
                Ok(Ok(AgentStats::Producer(stats))) => report_producers.push(stats),
                Ok(Ok(AgentStats::Consumer(stats))) => report_consumers.push(stats),
                Ok(Err(e)) => {
                    error!(error = %e, "Agent failed");
                    failure.get_or_insert(e);
                }
                Err(join_err) => {
                    error!(error = ?join_err, "Agent task did not complete");
                    failure.get_or_insert(DeliveryError::AgentPanicked(join_err.to_string()));
                }
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        let summary = broker.summary().await;
        let final_queue_len = broker.snapshot().await.queue_len;
        let anomalies = broker.anomalies().await;
        broker.emit(&BrokerEvent::Summary(summary.clone()));

        info!(
            produced = summary.produced.total(),
            consumed = summary.consumed.total(),
            anomalies,
            elapsed_secs = summary.elapsed_secs,
            "Delivery run finished"
        );

        Ok(RunReport {
            summary,
            final_queue_len,
            anomalies,
            producers: report_producers,
            consumers: report_consumers,
        })
    }
}
