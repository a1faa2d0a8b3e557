// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("-{flag} must be non-negative (got {value})")]
    Negative { flag: char, value: i64 },

    #[error("-{flag} is out of range (got {value})")]
    OutOfRange { flag: char, value: i64 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
