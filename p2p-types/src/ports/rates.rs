//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, static tables, caches, etc.

use rust_decimal::Decimal;

use crate::domain::{CurrencyCode, RateTable};
use crate::error::RateError;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest rate table for `base`.
    async fn latest(&self, base: &CurrencyCode) -> Result<RateTable, RateError>;

    /// Units of `to` per unit of `from`. Same-currency pairs are always 1
    /// and never hit the provider.
    async fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, RateError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.latest(from)
            .await?
            .rate_to(to)
            .ok_or_else(|| RateError::RateNotAvailable(from.clone(), to.clone()))
    }
}
