//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CurrencyCode, RateTable, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Wallet DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to credit a wallet, creating it on first use.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreditBalanceRequest {
    /// Amount to add to the balance
    #[schema(value_type = f64, example = 50)]
    pub amount: Decimal,
    /// ISO 4217 code, case-insensitive
    pub currency: CurrencyCode,
}

// ─────────────────────────────────────────────────────────────────────────────
// Quote DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request for a fee-inclusive conversion quote.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    /// Amount in `from_currency`
    #[schema(value_type = f64, example = 100)]
    pub amount: Decimal,
}

/// Rate table in the exchangerate-api wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    #[schema(example = "success")]
    pub result: String,
    pub base_code: CurrencyCode,
    #[schema(value_type = Object)]
    pub conversion_rates: BTreeMap<CurrencyCode, Decimal>,
}

impl From<RateTable> for RatesResponse {
    fn from(table: RateTable) -> Self {
        let mut conversion_rates = table.rates;
        conversion_rates.insert(table.base.clone(), Decimal::ONE);
        Self {
            result: "success".into(),
            base_code: table.base,
            conversion_rates,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "Ada")]
    #[serde(default)]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    #[serde(default)]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response after a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user_id: UserId,
    #[schema(example = "User created successfully")]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Health DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Liveness plus database reachability. The service answers even when the
/// database does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "up")]
    pub database: String,
}

impl HealthResponse {
    pub fn new(database_up: bool) -> Self {
        Self {
            status: "healthy".into(),
            database: if database_up { "up" } else { "down" }.into(),
        }
    }
}
