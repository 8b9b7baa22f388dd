//! Static exchange-rate lookup table.

use std::collections::HashMap;

use rust_decimal::Decimal;
use spendrail_shared::config::RateEntry;
use spendrail_shared::types::Currency;

/// Directed `(from, to) -> rate` lookup table.
///
/// The table is static for the lifetime of the engine; where rates come
/// from (config file, seeded defaults) is the embedder's concern.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl RateTable {
    /// Creates an empty rate table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from configuration entries.
    ///
    /// Later entries for the same pair overwrite earlier ones.
    #[must_use]
    pub fn from_entries(entries: &[RateEntry]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.from, entry.to, entry.rate);
        }
        table
    }

    /// Registers a rate for the directed pair.
    pub fn insert(&mut self, from: Currency, to: Currency, rate: Decimal) {
        self.rates.insert((from, to), rate);
    }

    /// Looks up the rate for the directed pair, if listed.
    #[must_use]
    pub fn get(&self, from: Currency, to: Currency) -> Option<Decimal> {
        self.rates.get(&(from, to)).copied()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
