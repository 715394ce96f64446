//! mongobucksd - the mongobucks chat bot daemon.
//!
//! Wires the pattern registry, identity resolver, and ledger together and
//! drives them from a line-based console adapter. Chat-network transports
//! are thin external adapters feeding the same `Router`.

use mongobucks::config::Config;
use mongobucks::handlers::{InboundMessage, Registry, Router};
use mongobucks::ledger::{Ledger, MemoryLedger, SqliteLedger};
use mongobucks::resolver::RosterResolver;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Transport handle the console adapter sends messages as. Map it to a
/// username in the `[roster]` config section.
const CONSOLE_HANDLE: &str = "console";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(bot = %config.bot.name, "Starting mongobucksd");

    // Ledger: SQLite when configured, in-memory otherwise.
    let ledger: Arc<dyn Ledger> = match &config.database {
        Some(db) => {
            let ledger = SqliteLedger::new(&db.path).await?;
            info!(path = %db.path, "Using SQLite ledger");
            Arc::new(ledger)
        }
        None => {
            info!("No database configured, using in-memory ledger");
            Arc::new(MemoryLedger::new())
        }
    };

    let resolver = Arc::new(RosterResolver::new(config.roster.clone()));
    info!(entries = config.roster.len(), "Roster loaded");

    let router = Router::new(Registry::build(), resolver, ledger);

    // Console adapter: each stdin line is one inbound message from the
    // console handle. Lines address the bot the same way a chat message
    // would, e.g. "mongobucks: balance".
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = router
            .dispatch(&InboundMessage {
                text: line,
                user: CONSOLE_HANDLE.to_string(),
                channel: "console".to_string(),
            })
            .await;
        println!("{reply}");
    }

    Ok(())
}
