use bookkeep::application::ledger::LedgerService;
use bookkeep::application::router::RequestRouter;
use bookkeep::domain::ports::{IdentityLookupRef, LedgerStoreRef};
use bookkeep::infrastructure::in_memory::{InMemoryLedgerStore, StaticIdentityDirectory};
use bookkeep::infrastructure::slack::{SLACK_API_BASE, SlackIdentityLookup};
use bookkeep::interfaces::event::handle_event;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use secrecy::SecretString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "BOOKKEEP_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Slack Web API token used to resolve user ids to names.
    #[arg(long, env = "SLACK_WEB_API_TOKEN", hide_env_values = true, global = true)]
    slack_token: Option<String>,

    /// Base URL of the Slack Web API.
    #[arg(long, env = "SLACK_API_URL", default_value = SLACK_API_BASE, global = true)]
    slack_api_url: String,

    /// Upper bound for a single user lookup.
    #[arg(long, env = "BOOKKEEP_LOOKUP_TIMEOUT_SECS", default_value_t = 10, global = true)]
    lookup_timeout_secs: u64,

    /// JSON file mapping user ids to display names, used when no Slack token is set.
    #[arg(long, env = "BOOKKEEP_USERS", global = true)]
    users: Option<PathBuf>,

    /// Log filter, e.g. `info` or `bookkeep=debug`.
    #[arg(long, env = "BOOKKEEP_LOG", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Route one invocation event and print the JSON answer
    Handle {
        /// Event JSON file; reads stdin when omitted or `-`
        event: Option<PathBuf>,
    },
    /// Print the current standings
    Tally,
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreRef> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = bookkeep::infrastructure::rocksdb::RocksDBStore::open(path).into_diagnostic()?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Arc::new(InMemoryLedgerStore::new()))
        }
        None => Ok(Arc::new(InMemoryLedgerStore::new())),
    }
}

fn identity_lookup(cli: &Cli) -> Result<IdentityLookupRef> {
    if let Some(token) = &cli.slack_token {
        let lookup = SlackIdentityLookup::with_base_url(
            SecretString::from(token.clone()),
            Duration::from_secs(cli.lookup_timeout_secs),
            cli.slack_api_url.clone(),
        )
        .into_diagnostic()?;
        return Ok(Arc::new(lookup));
    }

    let directory = match &cli.users {
        Some(path) => StaticIdentityDirectory::from_json_file(path).into_diagnostic()?,
        None => StaticIdentityDirectory::default(),
    };
    Ok(Arc::new(directory))
}

fn read_event(path: Option<PathBuf>) -> Result<serde_json::Value> {
    let raw = match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path).into_diagnostic()?,
        _ => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).into_diagnostic()?;
            raw
        }
    };
    serde_json::from_str(&raw).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let lookup = identity_lookup(&cli)?;
    let store = open_store(cli.db_path)?;

    match cli.command {
        Command::Handle { event } => {
            let event = read_event(event)?;
            let router = RequestRouter::new(store, lookup);
            let answer = handle_event(&router, event).await.into_diagnostic()?;
            println!("{}", serde_json::to_string(&answer).into_diagnostic()?);
        }
        Command::Tally => {
            let tally = LedgerService::new(store).tally().await.into_diagnostic()?;
            println!("{}", tally.render());
        }
    }

    Ok(())
}
