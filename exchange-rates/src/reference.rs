//! Built-in reference rates.
//!
//! Indicative mid-market rates quoted per 1 USD for the currencies the
//! converter offers. Cross rates are derived through USD.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use p2p_types::{CurrencyCode, RateError, RateProvider, RateTable};

/// Precision of derived cross rates.
const CROSS_RATE_SCALE: u32 = 6;

/// Declares the reference table.
///
/// # Syntax
/// ```ignore
/// reference_rates! {
///     "CODE" => "units per USD",
/// }
/// ```
macro_rules! reference_rates {
    ( $( $code:literal => $per_usd:literal ),* $(,)? ) => {
        /// ISO codes covered by the built-in table.
        pub const REFERENCE_CODES: &[&str] = &[$($code),*];

        fn reference_table() -> Vec<(&'static str, &'static str)> {
            vec![$(($code, $per_usd)),*]
        }
    };
}

reference_rates! {
    "USD" => "1",
    "EUR" => "0.92",
    "GBP" => "0.79",
    "JPY" => "149.50",
    "AUD" => "1.52",
    "CAD" => "1.36",
    "CHF" => "0.88",
    "HKD" => "7.82",
    "NZD" => "1.64",
    "SGD" => "1.34",
    "SEK" => "10.45",
    "DKK" => "6.87",
    "NOK" => "10.62",
}

/// Rate provider backed by a fixed table of per-USD rates.
#[derive(Debug, Clone)]
pub struct StaticRates {
    per_usd: BTreeMap<CurrencyCode, Decimal>,
}

impl StaticRates {
    /// The built-in reference table.
    pub fn builtin() -> Self {
        let per_usd = reference_table()
            .into_iter()
            .filter_map(|(code, rate)| {
                Some((CurrencyCode::parse(code).ok()?, Decimal::from_str(rate).ok()?))
            })
            .collect();
        Self { per_usd }
    }

    /// A custom table of per-USD rates. Non-positive entries are dropped.
    pub fn from_usd_rates(rates: impl IntoIterator<Item = (CurrencyCode, Decimal)>) -> Self {
        let per_usd = rates
            .into_iter()
            .filter(|(_, rate)| *rate > Decimal::ZERO)
            .collect();
        Self { per_usd }
    }

    /// Codes this table can quote.
    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.per_usd.keys()
    }
}

impl Default for StaticRates {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait::async_trait]
impl RateProvider for StaticRates {
    async fn latest(&self, base: &CurrencyCode) -> Result<RateTable, RateError> {
        let base_per_usd = self
            .per_usd
            .get(base)
            .copied()
            .ok_or_else(|| RateError::UnsupportedCurrency(base.clone()))?;

        let rates = self
            .per_usd
            .iter()
            .filter(|(code, _)| *code != base)
            .filter_map(|(code, per_usd)| {
                let cross = per_usd
                    .checked_div(base_per_usd)?
                    .round_dp_with_strategy(CROSS_RATE_SCALE, RoundingStrategy::MidpointNearestEven)
                    .normalize();
                Some((code.clone(), cross))
            })
            .collect();

        Ok(RateTable::new(base.clone(), rates))
    }
}
