//! Exchange rate tables.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::CurrencyCode;

/// Latest rates for one base currency: how many units of each quoted
/// currency one unit of `base` buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateTable {
    pub base: CurrencyCode,
    #[schema(value_type = Object)]
    pub rates: BTreeMap<CurrencyCode, Decimal>,
    pub fetched_at: DateTime<Utc>,
}

impl RateTable {
    pub fn new(base: CurrencyCode, rates: BTreeMap<CurrencyCode, Decimal>) -> Self {
        Self {
            base,
            rates,
            fetched_at: Utc::now(),
        }
    }

    /// Rate from `base` to `to`. The base always converts to itself at 1.
    pub fn rate_to(&self, to: &CurrencyCode) -> Option<Decimal> {
        if *to == self.base {
            return Some(Decimal::ONE);
        }
        self.rates.get(to).copied().filter(|r| *r > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    #[test]
    fn test_rate_lookup() {
        let table = RateTable::new(
            code("USD"),
            BTreeMap::from([(code("EUR"), dec!(0.85)), (code("JPY"), Decimal::ZERO)]),
        );
        assert_eq!(table.rate_to(&code("EUR")), Some(dec!(0.85)));
        assert_eq!(table.rate_to(&code("USD")), Some(Decimal::ONE));
        assert_eq!(table.rate_to(&code("GBP")), None);
        // zero rates are treated as missing
        assert_eq!(table.rate_to(&code("JPY")), None);
    }
}
