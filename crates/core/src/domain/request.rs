// Request Domain Model

use serde::{Deserialize, Serialize};

/// Kind of delivery request, identifies the producer that admitted it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    Pizza,
    Sandwich,
}

impl RequestKind {
    pub const ALL: [RequestKind; 2] = [RequestKind::Pizza, RequestKind::Sandwich];

    /// Three-letter label used in broker report lines
    pub const fn short_name(self) -> &'static str {
        match self {
            RequestKind::Pizza => "PIZ",
            RequestKind::Sandwich => "SAN",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Pizza => write!(f, "Pizza delivery request"),
            RequestKind::Sandwich => write!(f, "Sandwich delivery request"),
        }
    }
}

/// Delivery service draining the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumerKind {
    ServiceA,
    ServiceB,
}

impl ConsumerKind {
    pub const ALL: [ConsumerKind; 2] = [ConsumerKind::ServiceA, ConsumerKind::ServiceB];
}

impl std::fmt::Display for ConsumerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsumerKind::ServiceA => write!(f, "Delivery service A"),
            ConsumerKind::ServiceB => write!(f, "Delivery service B"),
        }
    }
}

/// Item held in the broker queue
///
/// `seq` is assigned at admission time and strictly increases, so delivery
/// order can be compared against admission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub seq: u64,
    pub kind: RequestKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_labels() {
        assert_eq!(RequestKind::Sandwich.to_string(), "Sandwich delivery request");
        assert_eq!(RequestKind::Pizza.short_name(), "PIZ");
        assert_eq!(ConsumerKind::ServiceB.to_string(), "Delivery service B");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RequestKind::Sandwich).unwrap();
        assert_eq!(json, "\"SANDWICH\"");
        let json = serde_json::to_string(&ConsumerKind::ServiceA).unwrap();
        assert_eq!(json, "\"SERVICE_A\"");
    }
}
