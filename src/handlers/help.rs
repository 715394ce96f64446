//! Help handler.

use super::{Context, Handler};
use async_trait::async_trait;

/// Usage text listing the supported command forms.
const HELP_TEXT: &str = "\
mongobucks commands:
  balance (b)                      show your balance
  balance all (b all)              list all balances
  give @user <amount> [memo] (g)   send mongobucks to someone
  help (h)                         show this message";

/// Handler for `help` / `h`.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, _ctx: &Context<'_>) -> String {
        HELP_TEXT.to_string()
    }
}
