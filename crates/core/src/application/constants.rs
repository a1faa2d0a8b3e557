// Broker and agent constants (no magic values)
use std::time::Duration;

/// Maximum number of queued requests (empty-slot semaphore starts here)
pub const BROKER_CAPACITY: usize = 20;

/// Sandwich admission is refused once this many sandwiches are queued
pub const SANDWICH_QUEUE_CAP: u32 = 8;

/// Bounded wait for a filled slot before a consumer re-checks its loop condition
pub const CONSUMER_WAIT_TIMEOUT: Duration = Duration::from_secs(1);
