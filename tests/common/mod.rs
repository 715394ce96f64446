//! Integration test common infrastructure.
//!
//! Call-counting stub collaborators and a router builder wired to them, so
//! tests can assert exactly which collaborator calls a dispatch makes.

#![allow(dead_code)]

use async_trait::async_trait;
use mongobucks::handlers::{InboundMessage, Registry, Router};
use mongobucks::ledger::{BalanceEntry, Ledger, LedgerError};
use mongobucks::resolver::{IdentityResolver, ResolveError};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Resolver stub over a fixed handle -> username map.
pub struct StaticResolver {
    map: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let map = pairs
            .iter()
            .map(|(handle, username)| (handle.to_string(), username.to_string()))
            .collect();
        Self { map }
    }
}

#[async_trait]
impl IdentityResolver for StaticResolver {
    async fn resolve(&self, handle: &str) -> Result<String, ResolveError> {
        self.map
            .get(handle)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownHandle(handle.to_string()))
    }
}

/// Confirmation text the stub ledger returns for successful transfers.
pub const STUB_CONFIRMATION: &str = "[stub] transfer confirmed";

/// Ledger stub that counts calls and records their arguments.
pub struct CountingLedger {
    balances: HashMap<String, i64>,
    listing: Vec<BalanceEntry>,
    refuse_transfers: bool,
    pub balance_calls: AtomicU64,
    pub list_calls: AtomicU64,
    pub transfer_calls: AtomicU64,
    pub balance_queries: Mutex<Vec<String>>,
    pub transfers: Mutex<Vec<(String, String, i64, String)>>,
}

impl CountingLedger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            listing: Vec::new(),
            refuse_transfers: false,
            balance_calls: AtomicU64::new(0),
            list_calls: AtomicU64::new(0),
            transfer_calls: AtomicU64::new(0),
            balance_queries: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(mut self, username: &str, balance: i64) -> Self {
        self.balances.insert(username.to_string(), balance);
        self
    }

    pub fn with_listing(mut self, entries: &[(&str, i64)]) -> Self {
        self.listing = entries
            .iter()
            .map(|(username, balance)| BalanceEntry {
                username: username.to_string(),
                balance: *balance,
            })
            .collect();
        self
    }

    /// Make `execute_transfer` fail with an insufficient-funds error.
    pub fn refusing_transfers(mut self) -> Self {
        self.refuse_transfers = true;
        self
    }

    /// Total number of ledger calls made so far.
    pub fn ledger_calls(&self) -> u64 {
        self.balance_calls.load(Ordering::Relaxed)
            + self.list_calls.load(Ordering::Relaxed)
            + self.transfer_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Ledger for CountingLedger {
    async fn get_balance(&self, username: &str) -> Result<i64, LedgerError> {
        self.balance_calls.fetch_add(1, Ordering::Relaxed);
        self.balance_queries.lock().await.push(username.to_string());
        Ok(self.balances.get(username).copied().unwrap_or(0))
    }

    async fn list_users(&self) -> Result<Vec<BalanceEntry>, LedgerError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.listing.clone())
    }

    async fn execute_transfer(
        &self,
        from: &str,
        to: &str,
        amount: i64,
        memo: &str,
    ) -> Result<String, LedgerError> {
        self.transfer_calls.fetch_add(1, Ordering::Relaxed);
        self.transfers.lock().await.push((
            from.to_string(),
            to.to_string(),
            amount,
            memo.to_string(),
        ));
        if self.refuse_transfers {
            return Err(LedgerError::InsufficientFunds {
                balance: 0,
                amount,
            });
        }
        Ok(STUB_CONFIRMATION.to_string())
    }
}

/// Router over a freshly built registry, the stub roster, and `ledger`.
///
/// The roster maps handle `U100` to `alice` and `U200` to `bob`; the
/// canonical names resolve to themselves for mention targets.
pub fn test_router(ledger: Arc<CountingLedger>) -> Router {
    let resolver = Arc::new(StaticResolver::new(&[
        ("U100", "alice"),
        ("U200", "bob"),
        ("alice", "alice"),
        ("bob", "bob"),
    ]));
    Router::new(Registry::build(), resolver, ledger)
}

/// Inbound message from handle `U100` on channel `general`.
pub fn msg(text: &str) -> InboundMessage {
    InboundMessage {
        text: text.to_string(),
        user: "U100".to_string(),
        channel: "general".to_string(),
    }
}
