//! Today I Learned shell
//!
//! Line-oriented terminal client for the fact feed. Logs go to stderr, the
//! feed goes to stdout.

mod repl;
mod session;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use til_core::adapters::{PostgrestClient, PostgrestFactRepository};
use til_core::config::Config;

use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,til_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Today I Learned shell...");

    let config = Config::from_env()?;
    let client = PostgrestClient::new(&config.backend_url, &config.api_key)?;
    tracing::info!("Using backend {}", client.base_url());

    let facts = Arc::new(PostgrestFactRepository::new(client, config.table.clone()));
    let session = Arc::new(Session::new(
        facts,
        config.categories.clone(),
        config.fetch_limit,
    ));

    println!("{}", session.start().await);
    println!("Type `help` for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    repl::run(session, stdin, &mut std::io::stdout()).await?;

    tracing::info!("Bye");
    Ok(())
}
