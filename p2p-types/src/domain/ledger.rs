//! Fixed-point representation of wallet balances.
//!
//! Balances are persisted as signed 64-bit integers of `10^-LEDGER_SCALE`
//! units so that the storage layer can add them atomically without any
//! floating-point rounding.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::CurrencyCode;
use crate::error::DomainError;

/// Number of fractional digits the ledger keeps.
pub const LEDGER_SCALE: u32 = 4;

/// Validates a credit amount: strictly positive, at most `LEDGER_SCALE`
/// significant fractional digits.
pub fn validate_credit(amount: Decimal) -> Result<Decimal, DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount);
    }
    let normalized = amount.normalize();
    if normalized.scale() > LEDGER_SCALE {
        return Err(DomainError::ValidationError(format!(
            "Amount {} has more than {} decimal places",
            amount, LEDGER_SCALE
        )));
    }
    Ok(normalized)
}

/// Converts a decimal amount into ledger units.
pub fn to_units(amount: Decimal) -> Result<i64, DomainError> {
    let out_of_range =
        || DomainError::ValidationError(format!("Amount {} is out of range", amount));
    let scaled = amount
        .checked_mul(Decimal::from(10_i64.pow(LEDGER_SCALE)))
        .ok_or_else(out_of_range)?;
    if scaled.fract() != Decimal::ZERO {
        return Err(DomainError::ValidationError(format!(
            "Amount {} has more than {} decimal places",
            amount, LEDGER_SCALE
        )));
    }
    scaled.to_i64().ok_or_else(out_of_range)
}

/// The credit would push a stored balance past the ledger's range.
pub fn overflow(currency: &CurrencyCode) -> DomainError {
    DomainError::ValidationError(format!(
        "Credit would overflow the {} wallet balance",
        currency
    ))
}

/// Converts ledger units back into a decimal amount.
pub fn from_units(units: i64) -> Decimal {
    Decimal::new(units, LEDGER_SCALE).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_units_conversion() {
        assert_eq!(to_units(dec!(50)).unwrap(), 500_000);
        assert_eq!(to_units(dec!(0.0001)).unwrap(), 1);
        assert_eq!(from_units(750_000), dec!(75));
        assert_eq!(from_units(12_345), dec!(1.2345));
    }

    #[test]
    fn test_validate_credit_rejects_non_positive() {
        assert!(matches!(
            validate_credit(Decimal::ZERO),
            Err(DomainError::InvalidAmount)
        ));
        assert!(matches!(
            validate_credit(dec!(-5)),
            Err(DomainError::InvalidAmount)
        ));
    }

    #[test]
    fn test_validate_credit_precision() {
        assert_eq!(validate_credit(dec!(10.5000)).unwrap(), dec!(10.5));
        assert!(matches!(
            validate_credit(dec!(0.00001)),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn test_overflow_is_a_validation_error() {
        let usd = CurrencyCode::parse("USD").unwrap();
        let err = overflow(&usd);
        assert!(matches!(err, DomainError::ValidationError(ref msg) if msg.contains("USD")));
    }

    #[test]
    fn test_to_units_overflow() {
        assert!(to_units(Decimal::MAX).is_err());
    }
}
