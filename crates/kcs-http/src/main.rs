//! KCS server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), overlays `KCS_*`
//! environment variables, opens the SQLite store and serves the registration
//! and admin endpoints over HTTP.
//!
//! ```toml
//! host           = "0.0.0.0"
//! port           = 3000
//! store_path     = "~/kcs/kcs.db"
//! admin_token    = "change-me"
//! webhook_url    = "https://script.example.com/hook"
//! webhook_secret = "change-me-too"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use kcs_http::{AppState, ServerConfig};
use kcs_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "KCS lead intake server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("KCS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState::new(store, &server_cfg).context("failed to build HTTP client")?;
  if !state.auth.is_configured() {
    tracing::warn!("admin_token is not set; the admin endpoint will answer server_misconfigured");
  }

  let app = kcs_http::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
