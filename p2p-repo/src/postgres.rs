//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::OnceCell;

use p2p_types::domain::ledger;
use p2p_types::{CurrencyCode, ExchangeRepository, NewUser, RepoError, User, UserId, Wallet};

use crate::PoolSettings;
use crate::password::hash_password_blocking;
use crate::types::{DbWallet, PgUser, user_error, wallet_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Balance updates are single atomic upserts.
pub struct PostgresRepo {
    pool: PgPool,
    schema: OnceCell<()>,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), RepoError> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt).execute(pool).await.map_err(|e| {
                tracing::error!(migration = name, error = %e, "Migration failed");
                wallet_error(e)
            })?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), RepoError> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_wallets_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_users_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a PostgreSQL repository with default pool settings.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_settings(database_url, &PoolSettings::default()).await
    }

    /// Creates a PostgreSQL repository. Does not touch the database.
    pub async fn with_settings(database_url: &str, settings: &PoolSettings) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_lazy(database_url)?;

        Ok(Self {
            pool,
            schema: OnceCell::new(),
        })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema once per repository.
    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        self.schema
            .get_or_try_init(|| run_migrations(&self.pool))
            .await
            .map(|_| ())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ExchangeRepository for PostgresRepo {
    #[tracing::instrument(skip(self))]
    async fn credit_balance(
        &self,
        currency: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Wallet, RepoError> {
        let amount = ledger::validate_credit(amount)?;
        let units = ledger::to_units(amount)?;
        self.ensure_schema().await?;

        // Guarded so an overflowing sum reports a validation error instead of
        // Postgres' numeric_value_out_of_range.
        let row: Option<DbWallet> = sqlx::query_as(
            r#"INSERT INTO wallets (currency, balance, created_at, updated_at)
               VALUES ($1, $2, $3, $3)
               ON CONFLICT (currency) DO UPDATE
               SET balance = wallets.balance + EXCLUDED.balance,
                   updated_at = EXCLUDED.updated_at
               WHERE wallets.balance <= $4 - EXCLUDED.balance
               RETURNING currency, balance"#,
        )
        .bind(currency.as_str())
        .bind(units)
        .bind(Utc::now())
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
            sqlx::query_as(r#"SELECT currency, balance FROM wallets WHERE currency = $1"#)
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
        let now = Utc::now();

        let row: PgUser = sqlx::query_as(
            r#"INSERT INTO users (id, first_name, last_name, email, password_hash, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, 'pending', $6, $6)
               RETURNING id, first_name, last_name, email, password_hash, status, created_at, updated_at"#,
        )
        .bind(UserId::new().into_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(user_error)?;

        row.into_domain()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.ensure_schema().await?;

        let row: Option<PgUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, password_hash, status, created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(user_error)?;

        row.map(PgUser::into_domain).transpose()
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(wallet_error)?;
        self.ensure_schema().await
    }
}
