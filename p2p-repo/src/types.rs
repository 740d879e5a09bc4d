//! Database row structs and sqlx error classification shared by both adapters.

use sqlx::FromRow;

use p2p_types::{CurrencyCode, RepoError, User, UserStatus, Wallet};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Wallet row from database. Identical on both backends.
#[derive(FromRow)]
pub struct DbWallet {
    pub currency: String,
    pub balance: i64,
}

impl DbWallet {
    pub fn into_domain(self) -> Result<Wallet, RepoError> {
        let currency = CurrencyCode::parse(&self.currency)
            .map_err(|e| RepoError::Database(format!("Corrupt wallet row: {}", e)))?;
        Ok(Wallet::from_units(currency, self.balance))
    }
}

/// User row from SQLite (ids and timestamps stored as text).
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(feature = "sqlite")]
impl SqliteUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        let parse_ts = |raw: &str| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&chrono::Utc))
                .map_err(|e| RepoError::Database(format!("Corrupt user timestamp: {}", e)))
        };

        Ok(User {
            id: self
                .id
                .parse()
                .map_err(|e| RepoError::Database(format!("Corrupt user id: {}", e)))?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            status: parse_status(&self.status)?,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// User row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgUser {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(feature = "postgres")]
impl PgUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        Ok(User {
            id: p2p_types::UserId::from_uuid(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_status(raw: &str) -> Result<UserStatus, RepoError> {
    raw.parse()
        .map_err(|e| RepoError::Database(format!("Corrupt user status: {}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Error classification
// ─────────────────────────────────────────────────────────────────────────────

/// Postgres serialization failure and deadlock, SQLite busy/locked.
const CONTENTION_CODES: &[&str] = &["40001", "40P01", "5", "6", "261", "517"];

/// Classifies a sqlx error into the repository taxonomy.
///
/// `on_unique` decides what a unique-constraint violation means for the
/// statement that raised it.
pub fn classify(err: sqlx::Error, on_unique: fn(String) -> RepoError) -> RepoError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => RepoError::StorageUnavailable(err.to_string()),
        sqlx::Error::Database(ref db) if db.is_unique_violation() => on_unique(db.to_string()),
        sqlx::Error::Database(ref db)
            if db
                .code()
                .is_some_and(|code| CONTENTION_CODES.contains(&&*code)) =>
        {
            RepoError::ConcurrentModification(db.to_string())
        }
        other => RepoError::Database(other.to_string()),
    }
}

/// Classifier for wallet statements: a unique violation means a lost race.
pub fn wallet_error(err: sqlx::Error) -> RepoError {
    classify(err, RepoError::ConcurrentModification)
}

/// Classifier for user statements: a unique violation means the email is taken.
pub fn user_error(err: sqlx::Error) -> RepoError {
    classify(err, |_| {
        RepoError::DuplicateEntity("Email already registered".to_string())
    })
}
