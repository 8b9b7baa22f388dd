//! Currency conversion logic.
//!
//! Rounding strategy for normalized amounts:
//! - Round to 2 decimal places
//! - Use standard rounding (midpoint away from zero)
//! - Store both original and converted amounts on the expense

use rust_decimal::{Decimal, RoundingStrategy};
use spendrail_shared::types::Currency;

use crate::currency::table::RateTable;

/// Decimal places for normalized company-currency amounts.
const NORMALIZED_SCALE: u32 = 2;

/// Converts amounts between currencies using a static rate table.
///
/// Pairs absent from the table convert at parity. Callers must not assume
/// accuracy for unlisted pairs; listing the pair is the fix, not an error
/// path here.
#[derive(Debug, Clone, Default)]
pub struct CurrencyConverter {
    table: RateTable,
}

impl CurrencyConverter {
    /// Creates a converter over the given rate table.
    #[must_use]
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Same-currency conversion returns the amount unchanged. Any other
    /// pair is multiplied by the table rate (parity when unlisted) and
    /// rounded to 2 decimal places.
    #[must_use]
    pub fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Decimal {
        if from == to {
            return amount;
        }
        let rate = self.table.get(from, to).unwrap_or(Decimal::ONE);
        (amount * rate).round_dp_with_strategy(NORMALIZED_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn converter() -> CurrencyConverter {
        let mut table = RateTable::new();
        table.insert(Currency::Eur, Currency::Usd, dec!(1.18));
        table.insert(Currency::Gbp, Currency::Usd, dec!(1.27));
        table.insert(Currency::Inr, Currency::Usd, dec!(0.012));
        CurrencyConverter::new(table)
    }

    #[test]
    fn test_same_currency_returns_amount_unchanged() {
        let converter = converter();
        // Not even re-rounded: a 3-decimal input comes back bit-for-bit.
        for currency in [
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Inr,
            Currency::Jpy,
        ] {
            assert_eq!(
                converter.convert(dec!(100.125), currency, currency),
                dec!(100.125)
            );
        }
    }

    #[test]
    fn test_listed_pair_uses_table_rate() {
        let converter = converter();
        // 100 EUR * 1.18 = 118.00 USD
        assert_eq!(
            converter.convert(dec!(100), Currency::Eur, Currency::Usd),
            dec!(118.00)
        );
    }

    #[test]
    fn test_result_rounds_to_two_decimals() {
        let converter = converter();
        // 33.33 GBP * 1.27 = 42.3291 -> 42.33
        assert_eq!(
            converter.convert(dec!(33.33), Currency::Gbp, Currency::Usd),
            dec!(42.33)
        );
    }

    #[test]
    fn test_standard_rounding_at_midpoint() {
        let mut table = RateTable::new();
        table.insert(Currency::Usd, Currency::Eur, dec!(0.5));
        let converter = CurrencyConverter::new(table);
        // 0.25 * 0.5 = 0.125 -> 0.13 (away from zero, not banker's 0.12)
        assert_eq!(
            converter.convert(dec!(0.25), Currency::Usd, Currency::Eur),
            dec!(0.13)
        );
    }

    #[rstest]
    #[case(dec!(100), dec!(118.00))]
    #[case(dec!(0.01), dec!(0.01))]
    #[case(dec!(12.34), dec!(14.56))]
    #[case(dec!(0), dec!(0.00))]
    fn test_eur_to_usd_cases(#[case] amount: Decimal, #[case] expected: Decimal) {
        let converter = converter();
        assert_eq!(
            converter.convert(amount, Currency::Eur, Currency::Usd),
            expected
        );
    }

    #[test]
    fn test_unlisted_pair_falls_back_to_parity() {
        let converter = converter();
        assert_eq!(
            converter.convert(dec!(250.00), Currency::Jpy, Currency::Inr),
            dec!(250.00)
        );
        // Parity results are still rounded to the normalized scale.
        assert_eq!(
            converter.convert(dec!(10.005), Currency::Jpy, Currency::Inr),
            dec!(10.01)
        );
    }
}
