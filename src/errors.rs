//! Unified error types for the subscription billing engine.
//!
//! Errors only arise at the edges of the system: loading configuration,
//! reading exports, and validating incoming payloads. The billing
//! calculations in [`crate::core`] are total and never return these.

use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure the crate can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is out of range
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A monetary amount was rejected (zero, negative)
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A date field did not parse to a calendar date
    #[error("Invalid date in field `{field}`: {value:?}")]
    InvalidDate {
        /// Name of the payload field
        field: &'static str,
        /// The raw value received
        value: String,
    },

    /// The payload is structurally malformed
    #[error("Invalid subscription payload: {message}")]
    InvalidPayload {
        /// What was wrong with it
        message: String,
    },

    /// Trial dates are missing or out of order
    #[error("Invalid trial window: {message}")]
    InvalidTrialWindow {
        /// What was wrong with it
        message: String,
    },

    /// One-time duration is missing or out of range
    #[error("Invalid duration: {message}")]
    InvalidDuration {
        /// What was wrong with it
        message: String,
    },

    /// The currency is not one the deployment accepts
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency {
        /// The rejected ISO 4217 code
        currency: String,
    },

    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A subscriptions export is not valid JSON for the record shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file is not valid TOML for the settings shape
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
