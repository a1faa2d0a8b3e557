// Bounded Broker - shared queue, capacity semaphores and production budget

use super::constants::{BROKER_CAPACITY, SANDWICH_QUEUE_CAP};
use crate::domain::{
    AddedEvent, BrokerEvent, ConsumedTally, ConsumerKind, DeliveryConfig, KindCounts,
    QueuedRequest, RemovedEvent, RequestKind, SummaryEvent,
};
use crate::error::{DeliveryError, Result};
use crate::port::EventSink;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use tracing::{debug, trace};

/// Queue size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerLimits {
    pub capacity: usize,
    pub sandwich_cap: u32,
}

impl Default for BrokerLimits {
    fn default() -> Self {
        Self {
            capacity: BROKER_CAPACITY,
            sandwich_cap: SANDWICH_QUEUE_CAP,
        }
    }
}

/// Outcome of one admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Item appended with this sequence number
    Appended(u64),
    /// Fairness cap reached; budget untouched
    RefusedByCap,
    /// Budget was already spent when this attempt decremented it
    BudgetExhausted,
}

impl Admission {
    pub fn is_appended(&self) -> bool {
        matches!(self, Admission::Appended(_))
    }
}

/// Point-in-time view taken under the broker lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerSnapshot {
    pub queue_len: usize,
    pub in_queue: KindCounts,
    /// Empty-slot permits currently available
    pub capacity_available: usize,
    /// Filled-slot permits currently available
    pub items_available: usize,
    pub remaining_budget: i64,
}

/// Queue contents and tallies; only touched with the lock held
struct BrokerState {
    queue: VecDeque<QueuedRequest>,
    produced: KindCounts,
    consumed: ConsumedTally,
    next_seq: u64,
    anomalies: u64,
}

/// Shared bounded queue fed by producers and drained by consumers
///
/// Capacity is gated by two counting semaphores that live outside the lock:
/// producers take an empty slot before admitting and consumers hand it back
/// after removing; consumers take a filled slot before removing and
/// producers hand one back after each admission attempt. Permits are
/// forgotten on acquire and re-added by the opposite role, which gives plain
/// counting-semaphore semantics.
///
/// By default a filled slot is released after *every* admission attempt,
/// appended or not, so a consumer can wake on an empty queue (counted as an
/// accounting anomaly). With `strict_accounting` the filled slot is only
/// released for an appended item and the empty slot is returned otherwise.
pub struct Broker {
    state: Mutex<BrokerState>,
    empty_slots: Semaphore,
    filled_slots: Semaphore,
    remaining: AtomicI64,
    limits: BrokerLimits,
    strict_accounting: bool,
    started: Instant,
    sink: Arc<dyn EventSink>,
}

impl Broker {
    pub fn new(config: &DeliveryConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::with_limits(config, BrokerLimits::default(), sink)
    }

    pub fn with_limits(
        config: &DeliveryConfig,
        limits: BrokerLimits,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            state: Mutex::new(BrokerState {
                queue: VecDeque::with_capacity(limits.capacity),
                produced: KindCounts::default(),
                consumed: ConsumedTally::default(),
                next_seq: 1,
                anomalies: 0,
            }),
            empty_slots: Semaphore::new(limits.capacity),
            filled_slots: Semaphore::new(0),
            remaining: AtomicI64::new(i64::from(config.total_requests)),
            limits,
            strict_accounting: config.strict_accounting,
            started: Instant::now(),
            sink,
        }
    }

    /// Budget left; may go below zero when producers race past the end
    pub fn remaining_budget(&self) -> i64 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn budget_exhausted(&self) -> bool {
        self.remaining_budget() <= 0
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Block until an empty slot is available and take it
    pub async fn acquire_empty_slot(&self) -> Result<()> {
        trace!("waiting for empty slot");
        let permit = self
            .empty_slots
            .acquire()
            .await
            .map_err(|e| DeliveryError::Internal(format!("empty-slot semaphore: {}", e)))?;
        permit.forget();
        Ok(())
    }

    /// Take a filled slot, waiting at most `wait`
    ///
    /// Returns `false` when the wait timed out.
    pub async fn acquire_filled_slot(&self, wait: Duration) -> Result<bool> {
        trace!(wait_ms = wait.as_millis() as u64, "waiting for filled slot");
        match tokio::time::timeout(wait, self.filled_slots.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                Ok(true)
            }
            Ok(Err(e)) => Err(DeliveryError::Internal(format!(
                "filled-slot semaphore: {}",
                e
            ))),
            Err(_elapsed) => Ok(false),
        }
    }

    pub fn release_empty_slot(&self) {
        self.empty_slots.add_permits(1);
    }

    pub fn release_filled_slot(&self) {
        self.filled_slots.add_permits(1);
    }

    /// Try to append one item of `kind`
    ///
    /// Caller must hold an empty slot. Sandwich items are refused while
    /// `sandwich_cap` of them are queued; otherwise the budget is decremented
    /// and the item is appended only if budget was left before the decrement.
    pub async fn try_admit(&self, kind: RequestKind) -> Admission {
        let mut state = self.state.lock().await;

        let mut in_queue = KindCounts::of(&state.queue);
        if kind == RequestKind::Sandwich && in_queue.sandwich >= self.limits.sandwich_cap {
            debug!(kind = %kind, queued = in_queue.sandwich, "Admission refused by fairness cap");
            return Admission::RefusedByCap;
        }

        let before = self.remaining.fetch_sub(1, Ordering::AcqRel);
        if before <= 0 {
            debug!(kind = %kind, remaining = before - 1, "Admission refused, budget spent");
            return Admission::BudgetExhausted;
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push_back(QueuedRequest { seq, kind });
        state.produced[kind] += 1;
        in_queue[kind] += 1;

        debug!(kind = %kind, seq, remaining = before - 1, "Request admitted");
        self.sink.emit(&BrokerEvent::Added(AddedEvent {
            kind,
            seq,
            produced: state.produced,
            in_queue,
            elapsed_secs: self.elapsed_secs(),
        }));

        Admission::Appended(seq)
    }

    /// Hand back the slot token that follows an admission attempt
    pub fn settle_admission(&self, admission: Admission) {
        if !self.strict_accounting || admission.is_appended() {
            self.release_filled_slot();
        } else {
            self.release_empty_slot();
        }
    }

    /// Pop the front item on behalf of `consumer`
    ///
    /// Caller must hold a filled slot. Returns `None`, without emitting
    /// anything, when the queue turns out to be empty.
    pub async fn try_remove(&self, consumer: ConsumerKind) -> Option<QueuedRequest> {
        let mut state = self.state.lock().await;

        let Some(item) = state.queue.pop_front() else {
            state.anomalies += 1;
            debug!(consumer = %consumer, "Filled slot acquired but queue is empty");
            return None;
        };

        state.consumed[consumer][item.kind] += 1;
        let in_queue = KindCounts::of(&state.queue);

        debug!(consumer = %consumer, kind = %item.kind, seq = item.seq, "Request delivered");
        self.sink.emit(&BrokerEvent::Removed(RemovedEvent {
            consumer,
            kind: item.kind,
            seq: item.seq,
            consumed: state.consumed[consumer],
            in_queue,
            elapsed_secs: self.elapsed_secs(),
        }));

        Some(item)
    }

    pub async fn has_pending(&self) -> bool {
        !self.state.lock().await.queue.is_empty()
    }

    pub async fn snapshot(&self) -> BrokerSnapshot {
        let state = self.state.lock().await;
        BrokerSnapshot {
            queue_len: state.queue.len(),
            in_queue: KindCounts::of(&state.queue),
            capacity_available: self.empty_slots.available_permits(),
            items_available: self.filled_slots.available_permits(),
            remaining_budget: self.remaining_budget(),
        }
    }

    /// Filled slots acquired while the queue was empty
    pub async fn anomalies(&self) -> u64 {
        self.state.lock().await.anomalies
    }

    pub async fn summary(&self) -> SummaryEvent {
        let state = self.state.lock().await;
        SummaryEvent {
            produced: state.produced,
            consumed: state.consumed,
            elapsed_secs: self.elapsed_secs(),
        }
    }

    pub fn emit(&self, event: &BrokerEvent) {
        self.sink.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::event_sink::mocks::RecordingSink;

    fn broker_with(total: u32, strict: bool) -> (Arc<RecordingSink>, Broker) {
        let sink = Arc::new(RecordingSink::new());
        let config = DeliveryConfig::default()
            .with_total_requests(total)
            .with_strict_accounting(strict);
        let broker = Broker::new(&config, sink.clone());
        (sink, broker)
    }

    #[tokio::test]
    async fn test_admit_appends_and_emits() {
        let (sink, broker) = broker_with(5, false);

        broker.acquire_empty_slot().await.unwrap();
        let admission = broker.try_admit(RequestKind::Pizza).await;
        broker.settle_admission(admission);

        assert_eq!(admission, Admission::Appended(1));
        assert_eq!(broker.remaining_budget(), 4);

        let added = sink.added();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].kind, RequestKind::Pizza);
        assert_eq!(added[0].produced.pizza, 1);
        assert_eq!(added[0].in_queue.pizza, 1);

        let snap = broker.snapshot().await;
        assert_eq!(snap.queue_len, 1);
        assert_eq!(snap.capacity_available, BROKER_CAPACITY - 1);
        assert_eq!(snap.items_available, 1);
    }

    #[tokio::test]
    async fn test_budget_of_one_admits_exactly_one() {
        let (sink, broker) = broker_with(1, false);

        assert!(broker.try_admit(RequestKind::Sandwich).await.is_appended());
        assert_eq!(
            broker.try_admit(RequestKind::Pizza).await,
            Admission::BudgetExhausted
        );

        assert_eq!(sink.added().len(), 1);
        assert!(broker.budget_exhausted());
        assert_eq!(broker.remaining_budget(), -1);
    }

    #[tokio::test]
    async fn test_zero_budget_admits_nothing() {
        let (sink, broker) = broker_with(0, false);

        assert_eq!(
            broker.try_admit(RequestKind::Pizza).await,
            Admission::BudgetExhausted
        );
        assert!(sink.added().is_empty());
        assert_eq!(broker.snapshot().await.queue_len, 0);
    }

    #[tokio::test]
    async fn test_sandwich_cap_refuses_without_spending_budget() {
        let (_sink, broker) = broker_with(100, false);

        for _ in 0..SANDWICH_QUEUE_CAP {
            assert!(broker.try_admit(RequestKind::Sandwich).await.is_appended());
        }
        let budget = broker.remaining_budget();

        assert_eq!(
            broker.try_admit(RequestKind::Sandwich).await,
            Admission::RefusedByCap
        );
        assert_eq!(broker.remaining_budget(), budget);

        // pizza is never capped
        assert!(broker.try_admit(RequestKind::Pizza).await.is_appended());

        // draining one sandwich reopens admission
        assert!(broker.try_remove(ConsumerKind::ServiceA).await.is_some());
        assert!(broker.try_admit(RequestKind::Sandwich).await.is_appended());
        assert_eq!(broker.snapshot().await.in_queue.sandwich, SANDWICH_QUEUE_CAP);
    }

    #[tokio::test]
    async fn test_remove_is_fifo() {
        let (sink, broker) = broker_with(10, false);

        broker.try_admit(RequestKind::Sandwich).await;
        broker.try_admit(RequestKind::Pizza).await;
        broker.try_admit(RequestKind::Sandwich).await;

        let first = broker.try_remove(ConsumerKind::ServiceB).await.unwrap();
        let second = broker.try_remove(ConsumerKind::ServiceA).await.unwrap();
        let third = broker.try_remove(ConsumerKind::ServiceB).await.unwrap();

        assert_eq!((first.seq, first.kind), (1, RequestKind::Sandwich));
        assert_eq!((second.seq, second.kind), (2, RequestKind::Pizza));
        assert_eq!((third.seq, third.kind), (3, RequestKind::Sandwich));

        let removed = sink.removed();
        assert_eq!(removed.len(), 3);
        assert_eq!(removed[2].consumed.sandwich, 2);
        assert_eq!(removed[2].in_queue.total(), 0);
        assert_eq!(removed[1].consumer, ConsumerKind::ServiceA);
    }

    #[tokio::test]
    async fn test_remove_from_empty_queue_is_silent() {
        let (sink, broker) = broker_with(10, false);

        assert!(broker.try_remove(ConsumerKind::ServiceA).await.is_none());
        assert!(sink.events().is_empty());
        assert_eq!(broker.anomalies().await, 1);
        assert_eq!(broker.summary().await.consumed.total(), 0);
    }

    #[tokio::test]
    async fn test_parity_settle_releases_filled_on_refusal() {
        let (_sink, broker) = broker_with(0, false);

        broker.acquire_empty_slot().await.unwrap();
        let admission = broker.try_admit(RequestKind::Pizza).await;
        broker.settle_admission(admission);

        let snap = broker.snapshot().await;
        assert_eq!(snap.queue_len, 0);
        assert_eq!(snap.items_available, 1);
        assert_eq!(snap.capacity_available, BROKER_CAPACITY - 1);
    }

    #[tokio::test]
    async fn test_strict_settle_returns_empty_on_refusal() {
        let (_sink, broker) = broker_with(0, true);

        broker.acquire_empty_slot().await.unwrap();
        let admission = broker.try_admit(RequestKind::Pizza).await;
        broker.settle_admission(admission);

        let snap = broker.snapshot().await;
        assert_eq!(snap.items_available, 0);
        assert_eq!(snap.capacity_available, BROKER_CAPACITY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filled_slot_wait_times_out() {
        let (_sink, broker) = broker_with(1, false);

        let acquired = broker
            .acquire_filled_slot(Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!acquired);

        broker.release_filled_slot();
        assert!(broker
            .acquire_filled_slot(Duration::from_secs(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_full_queue_blocks_producer() {
        let sink = Arc::new(RecordingSink::new());
        let limits = BrokerLimits {
            capacity: 2,
            sandwich_cap: SANDWICH_QUEUE_CAP,
        };
        let broker = Broker::with_limits(&DeliveryConfig::default(), limits, sink);

        broker.acquire_empty_slot().await.unwrap();
        broker.acquire_empty_slot().await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(20), broker.acquire_empty_slot()).await;
        assert!(blocked.is_err(), "third empty slot must not be available");

        broker.release_empty_slot();
        tokio_test::assert_ok!(broker.acquire_empty_slot().await);
    }
}
