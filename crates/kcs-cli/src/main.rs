//! `kcs-admin`: command-line viewer for submitted leads.
//!
//! # Usage
//!
//! ```
//! kcs-admin --url http://localhost:3000 --token secret --form-type beginner
//! kcs-admin --config ~/.config/kcs/admin.toml -q yamada --limit 20 --offset 20
//! ```

mod client;
mod table;

use anyhow::{Context, Result};
use clap::Parser;
use client::{AdminClient, AdminConfig, ListFilter};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "kcs-admin", about = "List leads stored by the KCS server")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the KCS server (default: http://localhost:3000).
  #[arg(long, env = "KCS_URL")]
  url: Option<String>,

  /// Admin token sent as `x-admin-token`.
  #[arg(long, env = "KCS_ADMIN_TOKEN", hide_env_values = true)]
  token: Option<String>,

  /// `general` or `beginner`.
  #[arg(long)]
  form_type: Option<String>,

  #[arg(long)]
  lp_id: Option<String>,

  /// Substring of name, tel or email.
  #[arg(short = 'q', long = "query")]
  query: Option<String>,

  /// Earliest created_at, e.g. `2026-01-01` or an RFC 3339 timestamp.
  #[arg(long)]
  from: Option<String>,

  /// Latest created_at (inclusive).
  #[arg(long)]
  to: Option<String>,

  #[arg(long)]
  limit: Option<u32>,

  #[arg(long)]
  offset: Option<u32>,

  /// Print the raw items as JSON instead of a table.
  #[arg(long)]
  json: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags and environment override the config file, which overrides defaults.
  let config = AdminConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()))
      .unwrap_or_default(),
  };
  if config.token.is_empty() {
    tracing::warn!("no admin token given; the server will answer unauthorized");
  }

  let filter = ListFilter {
    form_type: args.form_type,
    lp_id:     args.lp_id,
    q:         args.query,
    from:      args.from,
    to:        args.to,
    limit:     args.limit,
    offset:    args.offset,
  };

  let client = AdminClient::new(config)?;
  let listing = client.list_candidates(&filter).await?;

  if args.json {
    let out = serde_json::to_string_pretty(&listing.items).context("serialising items")?;
    println!("{out}");
  } else {
    print!("{}", table::render(&listing));
  }

  Ok(())
}
