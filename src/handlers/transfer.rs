//! Transfer handler.

use super::{Context, Handler};
use async_trait::async_trait;
use tracing::{info, warn};

/// Mention marker required on transfer targets.
const MENTION_MARKER: char = '@';

/// Reply sent when the transfer target lacks the mention marker.
pub const MARKER_INSTRUCTION_REPLY: &str =
    "[-] Prefix the username with '@', for example '@stuart'";

/// Handler for `give <target> <amount> [memo]` / `g ...`.
///
/// A thin validator in front of the ledger: checks the mention marker,
/// resolves the target, parses the amount, then delegates. The ledger owns
/// transactional semantics and the confirmation wording. Each validation
/// failure short-circuits without a ledger call.
pub struct TransferHandler;

#[async_trait]
impl Handler for TransferHandler {
    async fn handle(&self, ctx: &Context<'_>) -> String {
        let from = ctx.args.get_or_empty("user");
        let memo = ctx.args.get_or_empty("memo");

        let Some(target) = ctx.args.get_or_empty("to").strip_prefix(MENTION_MARKER) else {
            return MARKER_INSTRUCTION_REPLY.to_string();
        };

        let to = match ctx.resolver.resolve(target).await {
            Ok(username) => username,
            Err(e) => return format!("invalid user: {e}"),
        };

        let amount: i64 = match ctx.args.get_or_empty("amount").parse() {
            Ok(amount) => amount,
            Err(e) => return format!("invalid amount: {e}"),
        };

        info!(from = %from, to = %to, amount, "Executing transfer");

        match ctx.ledger.execute_transfer(from, &to, amount, memo).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                warn!(from = %from, to = %to, amount, error = %e, "Transfer failed");
                e.to_string()
            }
        }
    }
}
