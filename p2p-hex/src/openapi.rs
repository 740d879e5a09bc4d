//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use p2p_types::domain::{Conversion, ConversionQuote, CurrencyCode, UserId, Wallet, WalletLookup};
use p2p_types::dto::{
    CreditBalanceRequest, HealthResponse, QuoteRequest, RatesResponse, SignupRequest,
    SignupResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up; `database` reports storage reachability", body = HealthResponse)
    )
)]
async fn health() {}

/// List all wallet balances
#[utoipa::path(
    get,
    path = "/api/wallet/balances",
    tag = "wallet",
    responses(
        (status = 200, description = "All wallets ordered by currency", body = Vec<Wallet>),
        (status = 500, description = "Storage unavailable")
    )
)]
async fn get_balances() {}

/// Credit a wallet, creating it on first use
#[utoipa::path(
    post,
    path = "/api/wallet/update-balance",
    tag = "wallet",
    request_body = CreditBalanceRequest,
    responses(
        (status = 200, description = "Balance after the credit", body = Wallet),
        (status = 400, description = "Invalid amount or currency"),
        (status = 409, description = "Concurrent update, retry"),
        (status = 500, description = "Storage unavailable")
    )
)]
async fn update_balance() {}

/// Check whether a wallet exists for a currency
#[utoipa::path(
    get,
    path = "/api/wallet/verify/{currency}",
    tag = "wallet",
    params(
        ("currency" = String, Path, description = "ISO 4217 code, case-insensitive")
    ),
    responses(
        (status = 200, description = "Lookup result", body = WalletLookup),
        (status = 400, description = "Invalid currency code")
    )
)]
async fn verify_wallet() {}

/// Latest rate table for a base currency
#[utoipa::path(
    get,
    path = "/api/rates/{base}",
    tag = "rates",
    params(
        ("base" = String, Path, description = "Base currency code")
    ),
    responses(
        (status = 200, description = "Units of each currency per unit of base", body = RatesResponse),
        (status = 400, description = "Unknown or invalid currency"),
        (status = 502, description = "Rate provider unavailable")
    )
)]
async fn get_rates() {}

/// Fee-inclusive conversion quote (0.2% service fee)
#[utoipa::path(
    post,
    path = "/api/quote",
    tag = "rates",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote with base amount, fee and total rounded to 2 dp", body = ConversionQuote),
        (status = 400, description = "Invalid amount or currency pair"),
        (status = 502, description = "Rate provider unavailable")
    )
)]
async fn quote() {}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created in pending status", body = SignupResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    )
)]
async fn signup() {}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "P2P Currency Exchange API",
        version = "1.0.0",
        description = "Per-currency wallet ledger, live exchange rates and fee-inclusive conversion quotes.\n\nRequests are rate limited per client (`X-Forwarded-For`); `/health` is exempt.",
        license(name = "MIT"),
    ),
    paths(
        health,
        get_balances,
        update_balance,
        verify_wallet,
        get_rates,
        quote,
        signup,
    ),
    components(
        schemas(
            CreditBalanceRequest,
            Wallet,
            WalletLookup,
            QuoteRequest,
            ConversionQuote,
            Conversion,
            RatesResponse,
            SignupRequest,
            SignupResponse,
            HealthResponse,
            CurrencyCode,
            UserId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "wallet", description = "Per-currency wallet ledger"),
        (name = "rates", description = "Exchange rates and conversion quotes"),
        (name = "users", description = "User registration"),
    )
)]
pub struct ApiDoc;
