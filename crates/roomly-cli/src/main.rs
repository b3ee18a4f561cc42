//! roomly - command-line client for the roomly marketplace.
//!
//! This is the entry point for the `roomly` binary.

mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use roomly_api::{ApiClient, ApiConfig, Middleware};
use roomly_listings::ListingService;
use roomly_session::{SessionHandle, SessionStore, UserDirectory};
use roomly_store::FileStore;

use commands::Command;

/// roomly - browse and manage roommate listings from the terminal.
#[derive(Parser, Debug)]
#[command(name = "roomly")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL.
    #[arg(long, env = "ROOMLY_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Credentials file path. Defaults to `~/.roomly/credentials.json`.
    #[arg(long, env = "ROOMLY_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("roomly=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let store = FileStore::new(credentials_path(args.credentials));
    let handle = SessionHandle::new(store);
    let middleware: Vec<Arc<dyn Middleware>> = vec![Arc::new(handle.clone())];
    let api = ApiClient::new(&ApiConfig::new(args.api_url), middleware);

    let session = SessionStore::new(api.clone(), handle);
    let listings = ListingService::new(api.clone());
    let directory = UserDirectory::new(api);

    // Resolve any persisted token before a gate decision is trusted.
    session.restore().await;

    commands::run(args.command, &session, &listings, &directory).await
}

fn credentials_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".roomly").join("credentials.json"),
        None => PathBuf::from(".roomly-credentials.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_credentials_path_wins() {
        let path = credentials_path(Some(PathBuf::from("/tmp/creds.json")));
        assert_eq!(path, PathBuf::from("/tmp/creds.json"));
    }

    #[test]
    fn args_parse_a_listings_browse_invocation() {
        let args = Args::parse_from([
            "roomly",
            "--api-url",
            "http://example.test",
            "listings",
            "browse",
            "--location",
            "Downtown",
            "--max-budget",
            "900",
        ]);

        assert_eq!(args.api_url, "http://example.test");
        match args.command {
            Command::Listings(commands::ListingsCommand::Browse(filter)) => {
                assert_eq!(filter.location.as_deref(), Some("Downtown"));
                assert_eq!(filter.max_budget, Some(900.0));
                assert!(filter.min_budget.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
