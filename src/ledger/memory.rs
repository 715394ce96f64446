//! In-process ledger.
//!
//! Used by tests and by runs without a `[database]` section configured.
//! Balances do not survive a restart and memos are not retained beyond the
//! confirmation text.

use super::{BalanceEntry, Ledger, LedgerError, confirmation_text};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Ledger kept in process memory.
#[derive(Default)]
pub struct MemoryLedger {
    balances: Mutex<HashMap<String, i64>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a balance outside of a transfer, for seeding.
    pub async fn credit(&self, username: &str, amount: i64) {
        let mut balances = self.balances.lock().await;
        *balances.entry(username.to_string()).or_insert(0) += amount;
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_balance(&self, username: &str) -> Result<i64, LedgerError> {
        let balances = self.balances.lock().await;
        Ok(balances.get(username).copied().unwrap_or(0))
    }

    async fn list_users(&self) -> Result<Vec<BalanceEntry>, LedgerError> {
        let balances = self.balances.lock().await;
        let mut entries: Vec<BalanceEntry> = balances
            .iter()
            .map(|(username, balance)| BalanceEntry {
                username: username.clone(),
                balance: *balance,
            })
            .collect();
        // Richest first, ties by name, same as the SQLite ledger.
        entries.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(entries)
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

        let mut balances = self.balances.lock().await;
        let balance = balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(LedgerError::InsufficientFunds { balance, amount });
        }

        *balances.entry(from.to_string()).or_insert(0) -= amount;
        *balances.entry(to.to_string()).or_insert(0) += amount;

        Ok(confirmation_text(from, to, amount, memo))
    }
}
