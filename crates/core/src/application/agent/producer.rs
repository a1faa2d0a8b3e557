// Producer agent - admits requests of one kind until the budget runs out

use crate::application::broker::{Admission, Broker};
use crate::domain::RequestKind;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Counters for one producer run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerStats {
    pub kind: RequestKind,
    pub appended: u32,
    pub refused_by_cap: u32,
    pub budget_exhausted: u32,
}

impl ProducerStats {
    fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            appended: 0,
            refused_by_cap: 0,
            budget_exhausted: 0,
        }
    }

    fn record(&mut self, admission: Admission) {
        match admission {
            Admission::Appended(_) => self.appended += 1,
            Admission::RefusedByCap => self.refused_by_cap += 1,
            Admission::BudgetExhausted => self.budget_exhausted += 1,
        }
    }
}

pub struct ProducerAgent {
    kind: RequestKind,
    delay: Duration,
    broker: Arc<Broker>,
}

impl ProducerAgent {
    pub fn new(kind: RequestKind, delay: Duration, broker: Arc<Broker>) -> Self {
        Self {
            kind,
            delay,
            broker,
        }
    }

    /// Run until the budget is observed spent at the top of an iteration
    pub async fn run(self) -> Result<ProducerStats> {
        info!(kind = %self.kind, delay_ms = self.delay.as_millis() as u64, "Producer started");
        let mut stats = ProducerStats::new(self.kind);

        while !self.broker.budget_exhausted() {
            // service time, always resumes and re-checks
            sleep(self.delay).await;

            self.broker.acquire_empty_slot().await?;
            let admission = self.broker.try_admit(self.kind).await;
            self.broker.settle_admission(admission);

            stats.record(admission);
            if admission == Admission::RefusedByCap {
                debug!(kind = %self.kind, "Queue holds too many of this kind, retrying");
            }
        }

        info!(
            kind = %self.kind,
            appended = stats.appended,
            refused_by_cap = stats.refused_by_cap,
            "Producer stopped"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeliveryConfig;
    use crate::port::event_sink::mocks::RecordingSink;

    #[tokio::test]
    async fn test_producer_stops_on_budget() {
        let sink = Arc::new(RecordingSink::new());
        let config = DeliveryConfig::default().with_total_requests(5);
        let broker = Arc::new(Broker::new(&config, sink.clone()));

        let stats = ProducerAgent::new(RequestKind::Pizza, Duration::ZERO, broker.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(stats.appended, 5);
        assert_eq!(stats.refused_by_cap, 0);
        assert!(broker.budget_exhausted());
        assert_eq!(sink.added().len(), 5);
        assert_eq!(broker.snapshot().await.queue_len, 5);
    }

    #[tokio::test]
    async fn test_producer_with_zero_budget_never_admits() {
        let sink = Arc::new(RecordingSink::new());
        let config = DeliveryConfig::default().with_total_requests(0);
        let broker = Arc::new(Broker::new(&config, sink.clone()));

        let stats = ProducerAgent::new(RequestKind::Sandwich, Duration::ZERO, broker.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(stats.appended + stats.refused_by_cap + stats.budget_exhausted, 0);
        assert!(sink.events().is_empty());
    }
}
