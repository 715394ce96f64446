//! Balance lookup handlers.

use super::{Context, Handler};
use async_trait::async_trait;
use tracing::warn;

/// Handler for `balance` / `b`.
///
/// Replies with the sender's current balance.
pub struct BalanceHandler;

#[async_trait]
impl Handler for BalanceHandler {
    async fn handle(&self, ctx: &Context<'_>) -> String {
        let user = ctx.args.get_or_empty("user");

        match ctx.ledger.get_balance(user).await {
            Ok(balance) => format!("{balance} mongobucks"),
            Err(e) => {
                warn!(user = %user, error = %e, "Balance lookup failed");
                e.to_string()
            }
        }
    }
}

/// Handler for `balance all` / `b all`.
///
/// Lists every known balance, one line per user. Entries appear in the
/// order the ledger returns them; the handler does not re-sort.
pub struct AllBalancesHandler;

#[async_trait]
impl Handler for AllBalancesHandler {
    async fn handle(&self, ctx: &Context<'_>) -> String {
        match ctx.ledger.list_users().await {
            Ok(entries) => {
                let mut out = String::from("Balances: \n");
                for entry in entries {
                    out.push_str(&format!("@{}: {}\n", entry.username, entry.balance));
                }
                out
            }
            Err(e) => {
                warn!(error = %e, "Balance listing failed");
                e.to_string()
            }
        }
    }
}
