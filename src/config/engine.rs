//! Engine configuration loading from config.toml
//!
//! Tunable knobs for the billing engine: look-ahead horizons, the reporting
//! currency, and savings-analysis thresholds. Every field has a default, so
//! an empty file (or no file at all) yields a working configuration.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Longest look-ahead any horizon may use.
const MAX_HORIZON_DAYS: u32 = 365;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Currency totals are reported in
    pub reporting_currency: String,
    /// Days ahead the upcoming-bills list looks
    pub upcoming_horizon_days: u32,
    /// Days ahead the payment schedule looks
    pub payments_horizon_days: u32,
    /// Assumed discount of a yearly plan over twelve monthly payments
    pub yearly_plan_discount_percent: u32,
    /// Potential savings above which switching to yearly plans is suggested
    pub savings_suggestion_threshold: Decimal,
    /// Subscription count above which consolidation is suggested
    pub consolidation_threshold: usize,
    /// ISO 4217 codes accepted for new subscriptions
    pub allowed_currencies: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reporting_currency: "RUB".to_string(),
            upcoming_horizon_days: 7,
            payments_horizon_days: 30,
            yearly_plan_discount_percent: 10,
            savings_suggestion_threshold: Decimal::ONE_THOUSAND,
            consolidation_threshold: 10,
            allowed_currencies: ["RUB", "USD", "EUR", "GBP", "CNY"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Checks that every value is in range.
    ///
    /// # Errors
    /// Returns an error if a horizon is zero or longer than a year, the
    /// discount exceeds 100%, or no currency is allowed.
    pub fn validate(&self) -> Result<()> {
        for (name, days) in [
            ("upcoming_horizon_days", self.upcoming_horizon_days),
            ("payments_horizon_days", self.payments_horizon_days),
        ] {
            if days == 0 || days > MAX_HORIZON_DAYS {
                return Err(Error::Config {
                    message: format!("{name} must be between 1 and {MAX_HORIZON_DAYS}, got {days}"),
                });
            }
        }

        if self.yearly_plan_discount_percent > 100 {
            return Err(Error::Config {
                message: format!(
                    "yearly_plan_discount_percent must be at most 100, got {}",
                    self.yearly_plan_discount_percent
                ),
            });
        }

        if self.allowed_currencies.is_empty() {
            return Err(Error::Config {
                message: "allowed_currencies cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Loads engine configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Returns
/// * `Ok(EngineConfig)` - Successfully parsed and validated configuration
/// * `Err(Error)` - Failed to read, parse or validate the configuration file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    let config: EngineConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from `path`, falling back to defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, parsed or validated.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        load_config(path_ref)
    } else {
        info!("No config file at {:?}, using defaults", path_ref);
        Ok(EngineConfig::default())
    }
}

/// Loads engine configuration from the default location (./config.toml)
///
/// # Errors
/// Returns an error if ./config.toml exists but is invalid.
pub fn load_default_config() -> Result<EngineConfig> {
    load_config_or_default("config.toml")
}
