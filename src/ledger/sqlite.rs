//! SQLite-backed ledger.
//!
//! Balances and transfer history live in two tables kept in sync inside a
//! transaction per transfer. Schema changes go through embedded sqlx
//! migrations in `migrations/`.

use super::{BalanceEntry, Ledger, LedgerError, confirmation_text};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Ledger stored in a SQLite database.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Connection acquire timeout - prevents connection storms from
    /// blocking indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Open the ledger database, creating it if missing, and run
    /// migrations.
    pub async fn new(path: &str) -> Result<Self, LedgerError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(path = %path, "Ledger database connected");

        Ok(Self { pool })
    }

    /// Credit a balance outside of a transfer, for seeding and operator
    /// grants.
    pub async fn credit(&self, username: &str, amount: i64) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO balances (username, balance) VALUES (?, ?)
            ON CONFLICT(username) DO UPDATE SET balance = balance + excluded.balance
            "#,
        )
        .bind(username)
        .bind(amount)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn get_balance(&self, username: &str) -> Result<i64, LedgerError> {
        let balance =
            sqlx::query_scalar::<_, i64>("SELECT balance FROM balances WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance.unwrap_or(0))
    }

    async fn list_users(&self) -> Result<Vec<BalanceEntry>, LedgerError> {
        // Listing order is part of this ledger's contract: richest first,
        // ties broken by name.
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT username, balance FROM balances ORDER BY balance DESC, username ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(username, balance)| BalanceEntry { username, balance })
            .collect())
    }

    async fn execute_transfer(
        &self,
        from: &str,
        to: &str,
        amount: i64,
        memo: &str,
    ) -> Result<String, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount);
        }

        // Debit, credit, and the history row commit together or not at all.
        let mut tx = self.pool.begin().await?;

        let balance =
            sqlx::query_scalar::<_, i64>("SELECT balance FROM balances WHERE username = ?")
                .bind(from)
                .fetch_optional(&mut *tx)
                .await?
                .unwrap_or(0);

        if balance < amount {
            return Err(LedgerError::InsufficientFunds { balance, amount });
        }

        sqlx::query("UPDATE balances SET balance = balance - ? WHERE username = ?")
            .bind(amount)
            .bind(from)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO balances (username, balance) VALUES (?, ?)
            ON CONFLICT(username) DO UPDATE SET balance = balance + excluded.balance
            "#,
        )
        .bind(to)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO transfers (sender, recipient, amount, memo, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(amount)
        .bind(memo)
        .bind(chrono::Utc::now().timestamp())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(from = %from, to = %to, amount, "Transfer recorded");
        Ok(confirmation_text(from, to, amount, memo))
    }
}
