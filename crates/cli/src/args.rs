// Command-line flags

use clap::{Parser, ValueEnum};
use fooddelivery_core::domain::{DeliveryConfig, RawConfig};
use fooddelivery_core::Result;

/// How broker events are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable broker lines and a final report
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "fooddelivery")]
#[command(about = "Pizza and sandwich requests through a bounded delivery broker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Total number of delivery requests
    #[arg(short = 'n', long = "requests", env = "FOODDELIVERY_REQUESTS", default_value_t = 100, allow_negative_numbers = true)]
    pub requests: i64,

    /// Time for delivery by service A (ms)
    #[arg(short = 'a', long = "service-a-ms", env = "FOODDELIVERY_SERVICE_A_MS", default_value_t = 0, allow_negative_numbers = true)]
    pub service_a_ms: i64,

    /// Time for delivery by service B (ms)
    #[arg(short = 'b', long = "service-b-ms", env = "FOODDELIVERY_SERVICE_B_MS", default_value_t = 0, allow_negative_numbers = true)]
    pub service_b_ms: i64,

    /// Production time for a sandwich request (ms)
    #[arg(short = 'p', long = "sandwich-ms", env = "FOODDELIVERY_SANDWICH_MS", default_value_t = 0, allow_negative_numbers = true)]
    pub sandwich_ms: i64,

    /// Production time for a pizza request (ms)
    #[arg(short = 's', long = "pizza-ms", env = "FOODDELIVERY_PIZZA_MS", default_value_t = 0, allow_negative_numbers = true)]
    pub pizza_ms: i64,

    /// Release a filled slot only when a request was actually queued
    #[arg(long)]
    pub strict_accounting: bool,

    /// Event output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn raw_config(&self) -> RawConfig {
        RawConfig {
            total_requests: self.requests,
            consumer_a_delay_ms: self.service_a_ms,
            consumer_b_delay_ms: self.service_b_ms,
            sandwich_delay_ms: self.sandwich_ms,
            pizza_delay_ms: self.pizza_ms,
            strict_accounting: self.strict_accounting,
        }
    }

    /// Validate flags into the run configuration
    pub fn delivery_config(&self) -> Result<DeliveryConfig> {
        Ok(DeliveryConfig::try_from(self.raw_config())?)
    }
}
