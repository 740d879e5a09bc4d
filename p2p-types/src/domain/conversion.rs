//! Fee-inclusive currency conversion.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::CurrencyCode;
use crate::error::DomainError;

/// Fixed service fee charged on every conversion (0.2%).
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 3);

/// Number of decimal places shown for converted amounts.
const DISPLAY_SCALE: u32 = 2;

/// The three display values of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Conversion {
    /// `amount * rate`, rounded to 2 dp
    #[schema(value_type = f64, example = 85.00)]
    pub base_amount: Decimal,
    /// Service fee on the base amount, rounded to 2 dp
    #[schema(value_type = f64, example = 0.17)]
    pub fee: Decimal,
    /// Base amount plus fee, rounded to 2 dp
    #[schema(value_type = f64, example = 85.17)]
    pub total: Decimal,
}

impl Conversion {
    /// Computes the fee-inclusive conversion of `amount` at `rate`.
    ///
    /// The total is derived from the unrounded base and fee, so it always
    /// equals `round(amount * rate * 1.002, 2)`.
    pub fn calculate(amount: Decimal, rate: Decimal) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount);
        }
        if rate <= Decimal::ZERO {
            return Err(DomainError::InvalidRate);
        }

        let overflow = || DomainError::ValidationError("Conversion is out of range".into());
        let base = amount.checked_mul(rate).ok_or_else(overflow)?;
        let fee = base.checked_mul(SERVICE_FEE_RATE).ok_or_else(overflow)?;
        let total = base.checked_add(fee).ok_or_else(overflow)?;

        Ok(Self {
            base_amount: round_display(base),
            fee: round_display(fee),
            total: round_display(total),
        })
    }
}

fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A transient conversion quote for a currency pair. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionQuote {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    /// Units of `to_currency` per unit of `from_currency`
    #[schema(value_type = f64, example = 0.85)]
    pub rate: Decimal,
    /// Amount in `from_currency`
    #[schema(value_type = f64, example = 100)]
    pub amount: Decimal,
    #[serde(flatten)]
    pub conversion: Conversion,
}

impl ConversionQuote {
    /// Builds a quote for `amount` of `from` converted into `to` at `rate`.
    pub fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        amount: Decimal,
        rate: Decimal,
    ) -> Result<Self, DomainError> {
        let conversion = Conversion::calculate(amount, rate)?;
        Ok(Self {
            from_currency,
            to_currency,
            rate,
            amount,
            conversion,
        })
    }
}
