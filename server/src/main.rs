//! Valentine proposal server binary.
//!
//! Runs against Postgres when `--database-url` (or `DATABASE_URL`) is
//! set; falls back to the in-memory store otherwise, which is enough for
//! local development but forgets everything on restart.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use valentine_server::routes::{self, AppState};
use valentine_server::service::ProposalService;
use valentine_server::store::{MemoryStore, PgStore, ProposalStore};

#[derive(Parser)]
#[command(name = "valentine-server", about = "Valentine proposal-sharing backend")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Postgres connection string (falls back to $DATABASE_URL).
    #[arg(long)]
    database_url: Option<String>,

    /// Keep proposals in memory instead of Postgres.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok());

    let store: Arc<dyn ProposalStore> = match (&database_url, cli.in_memory) {
        (Some(url), false) => {
            let store = PgStore::connect(url)
                .await
                .context("connecting to Postgres")?;
            tracing::info!("using Postgres store");
            Arc::new(store)
        }
        _ => {
            if !cli.in_memory {
                tracing::warn!("no database configured, proposals will not survive restart");
            }
            Arc::new(MemoryStore::default())
        }
    };

    let state = Arc::new(AppState {
        service: ProposalService::new(store),
    });

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");

    routes::run(listener, state).await.context("server failed")
}
