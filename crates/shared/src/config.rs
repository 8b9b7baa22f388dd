//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Static exchange-rate table entries.
    #[serde(default)]
    pub rates: Vec<RateEntry>,
}

/// One directed exchange rate (1 `from` = `rate` `to`).
///
/// Pairs absent from the table are treated as parity by the converter,
/// so the table only needs the rates the company actually cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct RateEntry {
    /// Source currency code.
    pub from: Currency,
    /// Target currency code.
    pub to: Currency,
    /// Exchange rate.
    pub rate: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDRAIL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
