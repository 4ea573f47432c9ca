use async_trait::async_trait;
use sqlx::PgPool;

use crate::accounts::errors::AccountError;
use crate::accounts::repo_types::{Account, NewAccount};

/// Durable persistence contract for account records. Absent rows come back
/// as `None`; write failures surface as `Persistence`, except a unique
/// violation on insert, which is the authoritative duplicate-email signal.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: NewAccount, password_hash: &str)
        -> Result<Account, AccountError>;
    async fn update(&self, account: &Account) -> Result<(), AccountError>;
    async fn fetch_by_id(&self, id: i64) -> Result<Option<Account>, AccountError>;
    async fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn persistence(err: sqlx::Error) -> AccountError {
    AccountError::Persistence(err.into())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(
        &self,
        account: NewAccount,
        password_hash: &str,
    ) -> Result<Account, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, role, created_at
            "#,
        )
        .bind(&account.email)
        .bind(password_hash)
        .bind(&account.full_name)
        .bind(account.role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AccountError::DuplicateEmail
            }
            _ => persistence(e),
        })?;
        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<(), AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, full_name = $3, role = $4
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(account.role)
        .execute(&self.db)
        .await
        .map_err(persistence)?;
        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound);
        }
        Ok(())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, full_name, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(persistence)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, full_name, role, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(persistence)
    }
}
