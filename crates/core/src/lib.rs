// Food Delivery Core - Broker, Agents & Termination Protocol
// NO terminal output and NO argument parsing here; adapters observe via EventSink

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{DeliveryError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
