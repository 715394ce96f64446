//! Balance ledger.
//!
//! The ledger owns balances, transfer atomicity, and the user-facing
//! confirmation wording. Handlers consume it through the [`Ledger`] trait
//! and surface its errors as reply text; the dispatch layer adds no locking
//! of its own around ledger calls.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

use async_trait::async_trait;
use thiserror::Error;

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),

    #[error("insufficient funds: you have {balance}, tried to send {amount}")]
    InsufficientFunds { balance: i64, amount: i64 },

    #[error("amount must be positive")]
    NonPositiveAmount,
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        LedgerError::Migration(err)
    }
}

/// One row of the full balance listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub username: String,
    pub balance: i64,
}

/// Balance storage and transfer collaborator.
///
/// Implementations guarantee the atomicity of `execute_transfer`.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current balance for `username`. Users the ledger has never seen
    /// hold 0.
    async fn get_balance(&self, username: &str) -> Result<i64, LedgerError>;

    /// All known balances. Ordering is implementation-defined; the listing
    /// handler reproduces it as-is.
    async fn list_users(&self) -> Result<Vec<BalanceEntry>, LedgerError>;

    /// Move `amount` from `from` to `to`, recording `memo`.
    ///
    /// Returns the confirmation text for the chat reply; the ledger, not
    /// the handler, owns the success wording.
    async fn execute_transfer(
        &self,
        from: &str,
        to: &str,
        amount: i64,
        memo: &str,
    ) -> Result<String, LedgerError>;
}

/// Confirmation wording shared by the ledger implementations.
pub(crate) fn confirmation_text(from: &str, to: &str, amount: i64, memo: &str) -> String {
    if memo.is_empty() {
        format!("[+] @{from} sent {amount} mongobucks to @{to}")
    } else {
        format!("[+] @{from} sent {amount} mongobucks to @{to}: {memo}")
    }
}
