//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory) implement this trait.

use rust_decimal::Decimal;

use crate::domain::{CurrencyCode, NewUser, User, Wallet};
use crate::error::RepoError;

/// The storage port for wallets and users.
///
/// `credit_balance` MUST be a single atomic insert-or-increment: two
/// concurrent credits to the same currency always both land.
#[async_trait::async_trait]
pub trait ExchangeRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Wallet Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds `amount` to the wallet for `currency`, creating it if absent,
    /// and returns the resulting wallet.
    async fn credit_balance(
        &self,
        currency: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Wallet, RepoError>;

    /// Lists every wallet.
    async fn get_balances(&self) -> Result<Vec<Wallet>, RepoError>;

    /// Gets the wallet for a currency.
    async fn find_wallet(&self, currency: &CurrencyCode) -> Result<Option<Wallet>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Hashes the password and stores a new pending user.
    /// A taken email yields `RepoError::DuplicateEntity`.
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;

    /// Gets a user by (lowercased) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────────

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepoError>;
}
