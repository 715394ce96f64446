//! Command handlers and the dispatch registry.
//!
//! This module contains the Handler trait, the ordered pattern registry,
//! and the router that matches inbound chat messages against it.
//!
//! ## Registry ordering
//!
//! Patterns are evaluated top to bottom and the first match wins. Ordering
//! is load-bearing: the memo-bearing transfer form must be registered before
//! the memo-less one, otherwise the general pattern would match first and
//! the memo text would never be extracted. Tests pin this ordering.

mod balance;
mod help;
mod transfer;

pub use balance::{AllBalancesHandler, BalanceHandler};
pub use help::HelpHandler;
pub use transfer::{MARKER_INSTRUCTION_REPLY, TransferHandler};

use crate::ledger::Ledger;
use crate::pattern::CommandPattern;
use crate::resolver::IdentityResolver;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Reply sent when no pattern matches the command text.
pub const UNRECOGNIZED_REPLY: &str =
    "[-] Command not recognized. Use 'help' for available commands.";

/// An inbound chat message, as delivered by a transport adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Raw message text, including the leading address token.
    pub text: String,
    /// Transport-level handle of the sender (not yet resolved).
    pub user: String,
    /// Channel the message arrived on.
    pub channel: String,
}

/// Arguments extracted for one dispatch.
///
/// Populated from the matched pattern's named captures, plus the injected
/// `user` (resolved sender) and `channel` keys. Built fresh per message and
/// read-only by the time a handler sees it.
#[derive(Debug, Default)]
pub struct ArgumentContext {
    vars: HashMap<String, String>,
}

impl ArgumentContext {
    /// Build a context from a pattern's named captures.
    pub fn from_captures(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Bind an argument. Overwrites any capture of the same name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_string(), value.into());
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Look up an argument, defaulting to the empty string.
    ///
    /// Optional captures (e.g. the transfer memo) read as `""` when the
    /// matched pattern did not bind them.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The command text the pattern matched (address token already stripped).
    pub text: &'a str,
    /// Extracted and injected arguments.
    pub args: &'a ArgumentContext,
    /// Balance ledger collaborator.
    pub ledger: &'a dyn Ledger,
    /// Identity resolver collaborator, used for transfer targets.
    pub resolver: &'a dyn IdentityResolver,
}

/// Trait implemented by all command handlers.
///
/// Handlers are stateless. Every invocation receives a fresh context and
/// returns the reply string for the transport verbatim; failures are folded
/// into the reply text, never propagated.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle a matched command.
    async fn handle(&self, ctx: &Context<'_>) -> String;
}

/// Ordered registry of command patterns and their handlers.
///
/// Built once at startup and immutable afterwards; safe to share across
/// concurrent dispatches.
pub struct Registry {
    entries: Vec<(CommandPattern, Box<dyn Handler>)>,
}

impl Registry {
    /// Build the registry.
    ///
    /// Construction is deterministic and side-effect free; call it again to
    /// get a fresh, functionally identical copy.
    pub fn build() -> Self {
        let mut entries: Vec<(CommandPattern, Box<dyn Handler>)> = Vec::new();

        entries.push((CommandPattern::new("(balance|b)"), Box::new(BalanceHandler)));
        // Memo-bearing transfer MUST precede the memo-less form.
        entries.push((
            CommandPattern::new("(give|g) (?P<to>.*) (?P<amount>[0-9]*) (?P<memo>.*)"),
            Box::new(TransferHandler),
        ));
        entries.push((
            CommandPattern::new("(give|g) (?P<to>.*) (?P<amount>[0-9]*)"),
            Box::new(TransferHandler),
        ));
        entries.push((
            CommandPattern::new("(balance|b) all"),
            Box::new(AllBalancesHandler),
        ));
        entries.push((CommandPattern::new("(help|h)"), Box::new(HelpHandler)));

        Self { entries }
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first entry matching `text`, returning its handler and the
    /// named captures.
    fn find(&self, text: &str) -> Option<(&dyn Handler, HashMap<String, String>)> {
        self.entries.iter().find_map(|(pattern, handler)| {
            pattern.captures(text).map(|vars| (handler.as_ref(), vars))
        })
    }
}

/// Routes inbound messages to command handlers.
///
/// The router is a total function over messages: every outcome, including
/// resolver and ledger failures, comes back as a non-empty reply string.
pub struct Router {
    registry: Registry,
    resolver: Arc<dyn IdentityResolver>,
    ledger: Arc<dyn Ledger>,
}

impl Router {
    /// Create a router around an already-built registry and collaborators.
    pub fn new(
        registry: Registry,
        resolver: Arc<dyn IdentityResolver>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            registry,
            resolver,
            ledger,
        }
    }

    /// Dispatch one message and produce the reply.
    pub async fn dispatch(&self, msg: &InboundMessage) -> String {
        // Drop the address token; the remaining fields, re-joined with
        // single spaces, form the command text.
        let text = msg
            .text
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" ");

        let Some((handler, vars)) = self.registry.find(&text) else {
            debug!(user = %msg.user, channel = %msg.channel, "No pattern matched");
            return UNRECOGNIZED_REPLY.to_string();
        };

        // Resolution failure aborts dispatch; the handler never runs.
        let username = match self.resolver.resolve(&msg.user).await {
            Ok(username) => username,
            Err(e) => return e.to_string(),
        };

        let mut args = ArgumentContext::from_captures(vars);
        args.insert("user", username);
        args.insert("channel", msg.channel.clone());

        info!(
            user = %args.get_or_empty("user"),
            channel = %msg.channel,
            text = %text,
            "Dispatching command"
        );

        let ctx = Context {
            text: &text,
            args: &args,
            ledger: self.ledger.as_ref(),
            resolver: self.resolver.as_ref(),
        };
        handler.handle(&ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_build_is_idempotent() {
        let first = Registry::build();
        let second = Registry::build();
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
    }

    #[test]
    fn test_memo_pattern_precedes_memo_less() {
        let registry = Registry::build();
        let (_, vars) = registry.find("give @bob 10 thanks for lunch").unwrap();
        assert_eq!(
            vars.get("memo").map(String::as_str),
            Some("thanks for lunch")
        );

        let (_, vars) = registry.find("give @bob 10").unwrap();
        assert_eq!(vars.get("memo"), None);
        assert_eq!(vars.get("amount").map(String::as_str), Some("10"));
    }

    #[test]
    fn test_argument_context_injection_overwrites_captures() {
        let mut vars = HashMap::new();
        vars.insert("user".to_string(), "captured".to_string());
        let mut args = ArgumentContext::from_captures(vars);
        args.insert("user", "alice");
        assert_eq!(args.get("user"), Some("alice"));
        assert_eq!(args.get_or_empty("memo"), "");
    }
}
