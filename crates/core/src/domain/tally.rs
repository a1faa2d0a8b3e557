// Per-kind counters

use super::request::{ConsumerKind, QueuedRequest, RequestKind};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One counter per request kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub pizza: u32,
    pub sandwich: u32,
}

impl KindCounts {
    /// Count queued items per kind
    pub fn of<'a>(items: impl IntoIterator<Item = &'a QueuedRequest>) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts[item.kind] += 1;
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.pizza + self.sandwich
    }
}

impl Index<RequestKind> for KindCounts {
    type Output = u32;

    fn index(&self, kind: RequestKind) -> &u32 {
        match kind {
            RequestKind::Pizza => &self.pizza,
            RequestKind::Sandwich => &self.sandwich,
        }
    }
}

impl IndexMut<RequestKind> for KindCounts {
    fn index_mut(&mut self, kind: RequestKind) -> &mut u32 {
        match kind {
            RequestKind::Pizza => &mut self.pizza,
            RequestKind::Sandwich => &mut self.sandwich,
        }
    }
}

/// Consumed counters, per delivery service and request kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedTally {
    pub service_a: KindCounts,
    pub service_b: KindCounts,
}

impl ConsumedTally {
    pub fn total(&self) -> u32 {
        self.service_a.total() + self.service_b.total()
    }
}

impl Index<ConsumerKind> for ConsumedTally {
    type Output = KindCounts;

    fn index(&self, consumer: ConsumerKind) -> &KindCounts {
        match consumer {
            ConsumerKind::ServiceA => &self.service_a,
            ConsumerKind::ServiceB => &self.service_b,
        }
    }
}

impl IndexMut<ConsumerKind> for ConsumedTally {
    fn index_mut(&mut self, consumer: ConsumerKind) -> &mut KindCounts {
        match consumer {
            ConsumerKind::ServiceA => &mut self.service_a,
            ConsumerKind::ServiceB => &mut self.service_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_of_queue() {
        let queue = [
            QueuedRequest { seq: 1, kind: RequestKind::Pizza },
            QueuedRequest { seq: 2, kind: RequestKind::Sandwich },
            QueuedRequest { seq: 3, kind: RequestKind::Sandwich },
        ];
        let counts = KindCounts::of(&queue);
        assert_eq!(counts.pizza, 1);
        assert_eq!(counts.sandwich, 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_consumed_tally_indexing() {
        let mut tally = ConsumedTally::default();
        tally[ConsumerKind::ServiceB][RequestKind::Pizza] += 2;
        tally[ConsumerKind::ServiceA][RequestKind::Sandwich] += 1;

        assert_eq!(tally.service_b.pizza, 2);
        assert_eq!(tally.service_a.sandwich, 1);
        assert_eq!(tally.total(), 3);
    }
}
