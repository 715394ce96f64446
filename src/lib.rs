//! mongobucks - pattern-routed chat command bot for a virtual currency.
//!
//! Inbound chat messages are matched against an ordered registry of command
//! patterns; the first match wins, named captures become the handler's
//! arguments, and the sender's transport handle is resolved to a canonical
//! username before the handler runs. Handlers consume the balance ledger
//! and the identity resolver through narrow async traits and always produce
//! a plain reply string for the transport.

pub mod config;
pub mod handlers;
pub mod ledger;
pub mod pattern;
pub mod resolver;
