//! Exchange Application Service
//!
//! Orchestrates domain operations through the repository and rate provider ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use rust_decimal::Decimal;

use p2p_types::domain::ledger;
use p2p_types::{
    AppError, ConversionQuote, CreditBalanceRequest, CurrencyCode, DomainError, ExchangeRepository,
    HealthResponse, NewUser, QuoteRequest, RateProvider, RateTable, SignupRequest,
    SignupResponse, Wallet, WalletLookup,
};

/// Application service for wallet, quote and signup operations.
///
/// Generic over `R: ExchangeRepository` - the storage adapter is injected at
/// compile time. The rate provider is a trait object so that the HTTP client,
/// the static table and the cache can be swapped at startup without another
/// type parameter.
pub struct ExchangeService<R: ExchangeRepository> {
    repo: R,
    rates: Arc<dyn RateProvider>,
}

impl<R: ExchangeRepository> ExchangeService<R> {
    /// Creates a new exchange service with the given adapters.
    pub fn new(repo: R, rates: Arc<dyn RateProvider>) -> Self {
        Self { repo, rates }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Quotes and rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Quotes a fee-inclusive conversion at the provider's current rate.
    pub async fn quote(&self, req: QuoteRequest) -> Result<ConversionQuote, AppError> {
        // Reject before spending an upstream call
        if req.amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount.into());
        }

        let rate = self.rates.rate(&req.from_currency, &req.to_currency).await?;
        let quote = ConversionQuote::new(req.from_currency, req.to_currency, req.amount, rate)?;

        tracing::debug!(
            from = %quote.from_currency,
            to = %quote.to_currency,
            rate = %quote.rate,
            total = %quote.conversion.total,
            "Quote computed"
        );
        Ok(quote)
    }

    /// Latest rate table for `base`.
    pub async fn rates(&self, base: &CurrencyCode) -> Result<RateTable, AppError> {
        self.rates.latest(base).await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Wallet ledger
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds `amount` to the wallet for `currency`, creating it on first credit.
    pub async fn credit_balance(&self, req: CreditBalanceRequest) -> Result<Wallet, AppError> {
        let amount = ledger::validate_credit(req.amount)?;

        let wallet = self.repo.credit_balance(&req.currency, amount).await?;
        tracing::info!(currency = %wallet.currency, balance = %wallet.balance, "Wallet credited");
        Ok(wallet)
    }

    /// All wallets, ordered by currency code.
    pub async fn get_balances(&self) -> Result<Vec<Wallet>, AppError> {
        self.repo.get_balances().await.map_err(Into::into)
    }

    /// Reports whether a wallet exists for `currency`.
    pub async fn verify_wallet(&self, currency: &CurrencyCode) -> Result<WalletLookup, AppError> {
        let wallet = self.repo.find_wallet(currency).await?;
        Ok(WalletLookup::from_option(wallet))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a user in `pending` status.
    pub async fn signup(&self, req: SignupRequest) -> Result<SignupResponse, AppError> {
        let new_user = NewUser::new(&req.first_name, &req.last_name, &req.email, &req.password)?;

        // Skip the Argon2 cost for a known address; the unique index still
        // decides races between concurrent signups.
        if self.repo.find_user_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::DuplicateEntity("Email already registered".into()));
        }

        let user = self.repo.create_user(new_user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(SignupResponse {
            user_id: user.id,
            message: "User created successfully".into(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────────

    /// Liveness report. Never fails; a database error is reported as `down`.
    pub async fn health(&self) -> HealthResponse {
        let database_up = match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        };
        HealthResponse::new(database_up)
    }
}
