//! Async HTTP client for the KCS admin listing endpoint.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use kcs_core::submission::Submission;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Request header carrying the admin token.
const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Connection settings for the admin API.
#[derive(Debug, Clone)]
pub struct AdminConfig {
  pub base_url: String,
  pub token:    String,
}

/// Filters forwarded verbatim as query parameters. The server clamps and
/// validates them; unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
  pub form_type: Option<String>,
  pub lp_id:     Option<String>,
  pub q:         Option<String>,
  pub from:      Option<String>,
  pub to:        Option<String>,
  pub limit:     Option<u32>,
  pub offset:    Option<u32>,
}

impl ListFilter {
  fn pairs(&self) -> Vec<(&'static str, String)> {
    let text = [
      ("form_type", &self.form_type),
      ("lp_id", &self.lp_id),
      ("q", &self.q),
      ("from", &self.from),
      ("to", &self.to),
    ];
    let numbers = [("limit", self.limit), ("offset", self.offset)];

    text
      .into_iter()
      .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
      .chain(numbers.into_iter().filter_map(|(k, v)| v.map(|v| (k, v.to_string()))))
      .collect()
  }
}

/// One page of the admin listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
  pub items:  Vec<Submission>,
  pub total:  u64,
  pub limit:  u32,
  pub offset: u32,
}

/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AdminClient {
  client: Client,
  config: AdminConfig,
}

impl AdminClient {
  pub fn new(config: AdminConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /api/admin/candidates`
  pub async fn list_candidates(&self, filter: &ListFilter) -> Result<Listing> {
    let url = self.url("/admin/candidates");
    tracing::debug!(%url, "listing candidates");

    let resp = self
      .client
      .get(&url)
      .header(ADMIN_TOKEN_HEADER, &self.config.token)
      .query(&filter.pairs())
      .send()
      .await
      .context("GET /admin/candidates failed")?;

    let status = resp.status();
    let body: Value = resp
      .json()
      .await
      .with_context(|| format!("GET /admin/candidates → {status}: body is not JSON"))?;
    parse_listing(body).with_context(|| format!("GET /admin/candidates → {status}"))
  }
}

/// Unwrap the `{ok, ...}` envelope.
fn parse_listing(body: Value) -> Result<Listing> {
  if body.get("ok").and_then(Value::as_bool) != Some(true) {
    let code = match body.get("error") {
      Some(Value::String(code)) => code.clone(),
      Some(Value::Object(obj)) => obj
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string(),
      _ => "unknown".to_string(),
    };
    return Err(anyhow!("server error: {code}"));
  }
  serde_json::from_value(body).context("deserialising listing")
}
