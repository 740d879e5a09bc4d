//! Wallet domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::CurrencyCode;
use super::ledger;
use crate::error::DomainError;

/// Per-currency balance record. At most one wallet exists per currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Wallet {
    pub currency: CurrencyCode,
    #[schema(value_type = f64, example = 75)]
    pub balance: Decimal,
}

impl Wallet {
    /// Opens a wallet with its first credit.
    pub fn open(currency: CurrencyCode, amount: Decimal) -> Result<Self, DomainError> {
        let balance = ledger::validate_credit(amount)?;
        Ok(Self { currency, balance })
    }

    /// Reconstructs a wallet from stored ledger units.
    pub fn from_units(currency: CurrencyCode, units: i64) -> Self {
        Self {
            currency,
            balance: ledger::from_units(units),
        }
    }

    /// Adds a credit to the balance.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        let amount = ledger::validate_credit(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| DomainError::ValidationError("Balance overflow".into()))?;
        Ok(())
    }
}

/// Result of looking a wallet up by currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WalletLookup {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Wallet>,
    #[schema(example = "Wallet found")]
    pub message: String,
}

impl WalletLookup {
    pub fn from_option(wallet: Option<Wallet>) -> Self {
        match wallet {
            Some(wallet) => Self {
                exists: true,
                wallet: Some(wallet),
                message: "Wallet found".into(),
            },
            None => Self {
                exists: false,
                wallet: None,
                message: "No wallet found for this currency".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    #[test]
    fn test_open_and_credit() {
        let mut wallet = Wallet::open(usd(), dec!(50)).unwrap();
        wallet.credit(dec!(25)).unwrap();
        assert_eq!(wallet.balance, dec!(75));
    }

    #[test]
    fn test_credit_rejects_zero() {
        let mut wallet = Wallet::open(usd(), dec!(1)).unwrap();
        assert!(matches!(
            wallet.credit(Decimal::ZERO),
            Err(DomainError::InvalidAmount)
        ));
        assert_eq!(wallet.balance, dec!(1));
    }

    #[test]
    fn test_lookup_shape() {
        let missing = serde_json::to_value(WalletLookup::from_option(None)).unwrap();
        assert_eq!(missing["exists"], false);
        assert!(missing.get("wallet").is_none());

        let found =
            serde_json::to_value(WalletLookup::from_option(Some(Wallet::from_units(usd(), 10_000))))
                .unwrap();
        assert_eq!(found["exists"], true);
        assert_eq!(found["wallet"]["currency"], "USD");
        assert_eq!(found["wallet"]["balance"], 1.0);
    }
}
