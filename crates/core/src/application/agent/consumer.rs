// Consumer agent - drains the broker until production stops and the queue is empty

use crate::application::broker::Broker;
use crate::application::constants::CONSUMER_WAIT_TIMEOUT;
use crate::domain::ConsumerKind;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, trace};

/// Counters for one consumer run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    pub kind: ConsumerKind,
    pub removed: u32,
    pub timeouts: u32,
    /// Filled slot acquired but the queue was empty
    pub empty_wakeups: u32,
}

pub struct ConsumerAgent {
    kind: ConsumerKind,
    delay: Duration,
    wait: Duration,
    broker: Arc<Broker>,
}

impl ConsumerAgent {
    pub fn new(kind: ConsumerKind, delay: Duration, broker: Arc<Broker>) -> Self {
        Self {
            kind,
            delay,
            wait: CONSUMER_WAIT_TIMEOUT,
            broker,
        }
    }

    /// Override the bounded filled-slot wait
    pub fn with_wait_timeout(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Run while budget remains or items are still queued
    pub async fn run(self) -> Result<ConsumerStats> {
        info!(consumer = %self.kind, delay_ms = self.delay.as_millis() as u64, "Consumer started");
        let mut stats = ConsumerStats {
            kind: self.kind,
            removed: 0,
            timeouts: 0,
            empty_wakeups: 0,
        };

        while !self.broker.budget_exhausted() || self.broker.has_pending().await {
            sleep(self.delay).await;

            if !self.broker.acquire_filled_slot(self.wait).await? {
                trace!(consumer = %self.kind, "No filled slot within wait, re-checking");
                stats.timeouts += 1;
                continue;
            }

            match self.broker.try_remove(self.kind).await {
                Some(_) => stats.removed += 1,
                None => stats.empty_wakeups += 1,
            }
            self.broker.release_empty_slot();
        }

        info!(
            consumer = %self.kind,
            removed = stats.removed,
            timeouts = stats.timeouts,
            "Consumer stopped"
        );
        Ok(stats)
    }
}
