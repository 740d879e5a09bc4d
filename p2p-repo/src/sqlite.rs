//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tokio::sync::OnceCell;

use p2p_types::domain::ledger;
use p2p_types::{CurrencyCode, ExchangeRepository, NewUser, RepoError, User, UserId, Wallet};

use crate::PoolSettings;
use crate::password::hash_password_blocking;
use crate::types::{DbWallet, SqliteUser, user_error, wallet_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
///
/// The pool connects lazily and the schema is created on the first
/// operation that reaches the database.
pub struct SqliteRepo {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

fn is_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl SqliteRepo {
    /// Creates a SQLite repository with default pool settings.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_settings(database_url, &PoolSettings::default()).await
    }

    /// Creates a SQLite repository. Does not touch the database.
    pub async fn with_settings(database_url: &str, settings: &PoolSettings) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives and dies with its connection.
        let pool_options = if is_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections)
        };
        let pool = pool_options
            .acquire_timeout(settings.acquire_timeout)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            schema: OnceCell::new(),
        })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema once per repository.
    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        self.schema
            .get_or_try_init(|| async {
                for ddl in [
                    include_str!("../migrations/0001_create_wallets.sql"),
                    include_str!("../migrations/0002_create_users.sql"),
                ] {
                    sqlx::query(ddl)
                        .execute(&self.pool)
                        .await
                        .map_err(wallet_error)?;
                }
                tracing::debug!("SQLite schema ready");
                Ok::<(), RepoError>(())
            })
            .await
            .map(|_| ())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ExchangeRepository for SqliteRepo {
    #[tracing::instrument(skip(self))]
    async fn credit_balance(
        &self,
        currency: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Wallet, RepoError> {
        let amount = ledger::validate_credit(amount)?;
        let units = ledger::to_units(amount)?;
        self.ensure_schema().await?;

        let now = chrono::Utc::now().to_rfc3339();

        // Insert-or-add in one statement; concurrent credits serialize on the row.
        // SQLite promotes an overflowing integer sum to REAL, so the update only
        // applies while the result still fits in an i64.
        let row: Option<DbWallet> = sqlx::query_as(
            r#"INSERT INTO wallets (currency, balance, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(currency) DO UPDATE
               SET balance = wallets.balance + excluded.balance,
                   updated_at = excluded.updated_at
               WHERE wallets.balance <= ? - excluded.balance
               RETURNING currency, balance"#,
        )
        .bind(currency.as_str())
        .bind(units)
        .bind(&now)
        .bind(&now)
        .bind(i64::MAX)
        .fetch_optional(&self.pool)
        .await
        .map_err(wallet_error)?;

        row.ok_or_else(|| ledger::overflow(currency))?.into_domain()
    }

    async fn get_balances(&self) -> Result<Vec<Wallet>, RepoError> {
        self.ensure_schema().await?;

        let rows: Vec<DbWallet> =
            sqlx::query_as(r#"SELECT currency, balance FROM wallets ORDER BY currency"#)
                .fetch_all(&self.pool)
                .await
                .map_err(wallet_error)?;

        rows.into_iter().map(DbWallet::into_domain).collect()
    }

    async fn find_wallet(&self, currency: &CurrencyCode) -> Result<Option<Wallet>, RepoError> {
        self.ensure_schema().await?;

        let row: Option<DbWallet> =
            sqlx::query_as(r#"SELECT currency, balance FROM wallets WHERE currency = ?"#)
                .bind(currency.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(wallet_error)?;

        row.map(DbWallet::into_domain).transpose()
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.ensure_schema().await?;

        let password_hash = hash_password_blocking(user.password).await?;
        let id = UserId::new();
        let now = chrono::Utc::now().to_rfc3339();

        let row: SqliteUser = sqlx::query_as(
            r#"INSERT INTO users (id, first_name, last_name, email, password_hash, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, 'pending', ?, ?)
               RETURNING id, first_name, last_name, email, password_hash, status, created_at, updated_at"#,
        )
        .bind(id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(user_error)?;

        row.into_domain()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.ensure_schema().await?;

        let row: Option<SqliteUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, password_hash, status, created_at, updated_at
               FROM users WHERE email = ?"#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(user_error)?;

        row.map(SqliteUser::into_domain).transpose()
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(wallet_error)?;
        self.ensure_schema().await
    }
}
