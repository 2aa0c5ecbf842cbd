//! HTTP surface for KCS.
//!
//! Exposes an axum [`Router`] with the public registration endpoint and the
//! token-gated admin listing, backed by any [`SubmissionStore`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = kcs_http::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod notify;

pub use error::{AdminError, RegisterError};

use std::{any::Any, path::PathBuf, sync::Arc};

use axum::{
  Router,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use kcs_core::store::SubmissionStore;
use serde::Deserialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use auth::AdminAuth;
use handlers::{candidates, register};
use notify::{Notifier, WebhookConfig};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `KCS_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Shared secret for the admin endpoint. Empty means unset.
  #[serde(default)]
  pub admin_token:    Option<String>,
  #[serde(default)]
  pub webhook_url:    Option<String>,
  #[serde(default)]
  pub webhook_secret: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("kcs.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      admin_token:    None,
      webhook_url:    None,
      webhook_secret: None,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: SubmissionStore> {
  pub store:    Arc<S>,
  pub auth:     Arc<AdminAuth>,
  pub notifier: Notifier,
}

impl<S: SubmissionStore> AppState<S> {
  /// Wire `store` up with the auth and webhook settings from `config`.
  pub fn new(store: S, config: &ServerConfig) -> reqwest::Result<Self> {
    Ok(Self {
      store:    Arc::new(store),
      auth:     Arc::new(AdminAuth::new(config.admin_token.clone())),
      notifier: Notifier::new(WebhookConfig::new(
        config.webhook_url.clone(),
        config.webhook_secret.clone(),
      ))?,
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/api/register",
      post(register::handler::<S>)
        .fallback(register::method_not_allowed)
        .layer(CatchPanicLayer::custom(register_panic)),
    )
    .route(
      "/api/admin/candidates",
      get(candidates::handler::<S>)
        .fallback(candidates::method_not_allowed)
        .layer(CatchPanicLayer::custom(admin_panic)),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Panic handling ──────────────────────────────────────────────────────────

// Each endpoint answers a panic in its own error envelope.

fn register_panic(err: Box<dyn Any + Send + 'static>) -> Response {
  log_panic(&*err);
  RegisterError::Internal.into_response()
}

fn admin_panic(err: Box<dyn Any + Send + 'static>) -> Response {
  log_panic(&*err);
  AdminError::Internal.into_response()
}

fn log_panic(err: &(dyn Any + Send)) {
  let detail = err
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| err.downcast_ref::<&str>().copied())
    .unwrap_or("unknown panic payload");
  tracing::error!(panic = detail, "handler panicked");
}

// ─── Integration tests ────────────────────────────────────────────────────────
