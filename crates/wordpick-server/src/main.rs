//! wordpick server binary.
//!
//! Serves the JSON API under `/api` from an in-process SQLite store. See
//! [`ServerConfig`] for the recognised settings.
//!
//! `wordpick-server --hash-password` reads a password from stdin and prints
//! the argon2 PHC string to put in `admin_password_hash`.

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordpick_api::{ApiState, auth::hash_password};
use wordpick_server::ServerConfig;
use wordpick_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "wordpick word-of-the-day server")]
struct Cli {
  /// TOML configuration file, overlaid by `WORDPICK_*` variables.
  #[arg(short, long, default_value = "config.toml", env = "WORDPICK_CONFIG")]
  config: PathBuf,

  /// Print the argon2 hash of the first line of stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    eprint!("Password: ");
    let line = io::stdin().lines().next().transpose()?.unwrap_or_default();
    let hash = hash_password(line.trim_end_matches('\r'))
      .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load {}", cli.config.display()))?;

  let store_path = cfg.store_location();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;

  let settings = cfg
    .api_settings()
    .context("failed to build the video API client")?;
  if settings.admin.is_none() {
    tracing::warn!("admin credentials not configured; bulk uploads are open");
  }

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(
    %address,
    policy = ?settings.pick_policy,
    store = %store_path.display(),
    "serving wordpick"
  );

  let app = wordpick_server::app(ApiState::new(Arc::new(store), settings));
  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
