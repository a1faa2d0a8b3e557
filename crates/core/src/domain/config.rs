// Run configuration

use super::error::{ConfigError, Result};
use std::time::Duration;

pub const DEFAULT_TOTAL_REQUESTS: u32 = 100;

/// Flag values as parsed, before validation
///
/// Kept signed so negative input reaches validation instead of being
/// rejected as an unknown flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawConfig {
    /// -n: total request budget
    pub total_requests: i64,
    /// -a: Delivery service A delay (ms)
    pub consumer_a_delay_ms: i64,
    /// -b: Delivery service B delay (ms)
    pub consumer_b_delay_ms: i64,
    /// -p: sandwich production delay (ms)
    pub sandwich_delay_ms: i64,
    /// -s: pizza production delay (ms)
    pub pizza_delay_ms: i64,
    pub strict_accounting: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            total_requests: DEFAULT_TOTAL_REQUESTS as i64,
            consumer_a_delay_ms: 0,
            consumer_b_delay_ms: 0,
            sandwich_delay_ms: 0,
            pizza_delay_ms: 0,
            strict_accounting: false,
        }
    }
}

/// Validated, read-only configuration consumed by the broker and agents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub total_requests: u32,
    pub consumer_a_delay: Duration,
    pub consumer_b_delay: Duration,
    pub sandwich_delay: Duration,
    pub pizza_delay: Duration,
    /// Release a filled slot only when an item was actually appended
    pub strict_accounting: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            total_requests: DEFAULT_TOTAL_REQUESTS,
            consumer_a_delay: Duration::ZERO,
            consumer_b_delay: Duration::ZERO,
            sandwich_delay: Duration::ZERO,
            pizza_delay: Duration::ZERO,
            strict_accounting: false,
        }
    }
}

impl DeliveryConfig {
    pub fn with_total_requests(mut self, total_requests: u32) -> Self {
        self.total_requests = total_requests;
        self
    }

    pub fn with_strict_accounting(mut self, strict: bool) -> Self {
        self.strict_accounting = strict;
        self
    }
}

impl TryFrom<RawConfig> for DeliveryConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let total_requests = non_negative('n', raw.total_requests)?;
        let total_requests =
            u32::try_from(total_requests).map_err(|_| ConfigError::OutOfRange {
                flag: 'n',
                value: raw.total_requests,
            })?;

        Ok(Self {
            total_requests,
            consumer_a_delay: delay('a', raw.consumer_a_delay_ms)?,
            consumer_b_delay: delay('b', raw.consumer_b_delay_ms)?,
            sandwich_delay: delay('p', raw.sandwich_delay_ms)?,
            pizza_delay: delay('s', raw.pizza_delay_ms)?,
            strict_accounting: raw.strict_accounting,
        })
    }
}

fn non_negative(flag: char, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| ConfigError::Negative { flag, value })
}

fn delay(flag: char, value: i64) -> Result<Duration> {
    non_negative(flag, value).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match() {
        let config = DeliveryConfig::try_from(RawConfig::default()).unwrap();
        assert_eq!(config, DeliveryConfig::default());
        assert_eq!(config.total_requests, 100);
    }

    #[test]
    fn test_delays_in_millis() {
        let raw = RawConfig {
            consumer_a_delay_ms: 15,
            pizza_delay_ms: 1500,
            ..RawConfig::default()
        };
        let config = DeliveryConfig::try_from(raw).unwrap();
        assert_eq!(config.consumer_a_delay, Duration::from_millis(15));
        assert_eq!(config.pizza_delay, Duration::from_millis(1500));
        assert_eq!(config.sandwich_delay, Duration::ZERO);
    }

    #[test]
    fn test_negative_value_rejected() {
        let raw = RawConfig {
            sandwich_delay_ms: -3,
            ..RawConfig::default()
        };
        let err = DeliveryConfig::try_from(raw).unwrap_err();
        assert_eq!(err, ConfigError::Negative { flag: 'p', value: -3 });
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let raw = RawConfig {
            total_requests: -1,
            ..RawConfig::default()
        };
        assert!(matches!(
            DeliveryConfig::try_from(raw),
            Err(ConfigError::Negative { flag: 'n', .. })
        ));
    }

    #[test]
    fn test_budget_out_of_range() {
        let raw = RawConfig {
            total_requests: i64::from(u32::MAX) + 1,
            ..RawConfig::default()
        };
        assert!(matches!(
            DeliveryConfig::try_from(raw),
            Err(ConfigError::OutOfRange { flag: 'n', .. })
        ));
    }

    #[test]
    fn test_zero_budget_is_valid() {
        let raw = RawConfig {
            total_requests: 0,
            ..RawConfig::default()
        };
        assert_eq!(DeliveryConfig::try_from(raw).unwrap().total_requests, 0);
    }
}
