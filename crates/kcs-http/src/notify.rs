//! Best-effort webhook notification after a submission is stored.
//!
//! Delivery is at most once: no retry, no queue. Every outcome ends in the log
//! and nowhere else; the registration response never waits for it.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use kcs_core::submission::{FormType, Receipt, RegisterInput};
use reqwest::{Client, redirect::Policy};
use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Longest slice of a rejecting receiver's body that is logged.
pub const BODY_LOG_LIMIT: usize = 500;

/// Where notifications go. Both values are required for delivery.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
  pub url:    Option<String>,
  pub secret: Option<String>,
}

impl WebhookConfig {
  /// Blank values count as missing.
  pub fn new(url: Option<String>, secret: Option<String>) -> Self {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    Self { url: present(url), secret: present(secret) }
  }
}

/// JSON body posted to the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
  pub secret:       &'a str,
  pub request_id:   &'a str,
  pub form_type:    FormType,
  pub created_at:   DateTime<Utc>,
  pub candidate_id: Uuid,
}

/// The facts about a stored submission that a notification carries.
#[derive(Debug, Clone)]
pub struct SubmissionEvent {
  pub request_id:   String,
  pub form_type:    FormType,
  pub candidate_id: Uuid,
  pub created_at:   DateTime<Utc>,
}

impl SubmissionEvent {
  pub fn new(input: &RegisterInput, receipt: &Receipt) -> Self {
    Self {
      request_id:   receipt.request_id.clone(),
      form_type:    input.form_type,
      candidate_id: receipt.id,
      created_at:   receipt.created_at,
    }
  }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
  /// Webhook URL or secret not configured.
  Skipped,
  /// The receiver answered 2xx or 3xx.
  Delivered(u16),
  /// The receiver answered with any other status.
  Rejected(u16),
  /// The request never completed.
  Failed,
}

/// Posts submission events to the configured webhook.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Notifier {
  client: Client,
  config: Arc<WebhookConfig>,
}

impl Notifier {
  pub fn new(config: WebhookConfig) -> reqwest::Result<Self> {
    // The receiver answers 302 once its side effects have run; following the
    // redirect can turn a success into a 405.
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .redirect(Policy::none())
      .build()?;
    Ok(Self { client, config: Arc::new(config) })
  }

  /// Notify in a detached task. The handle is only useful to tests.
  pub fn spawn(&self, input: &RegisterInput, receipt: &Receipt) -> JoinHandle<Delivery> {
    let this = self.clone();
    let event = SubmissionEvent::new(input, receipt);
    tokio::spawn(async move { this.notify(&event).await })
  }

  /// Make one delivery attempt and log its outcome.
  pub async fn notify(&self, event: &SubmissionEvent) -> Delivery {
    let (Some(url), Some(secret)) =
      (self.config.url.as_deref(), self.config.secret.as_deref())
    else {
      tracing::warn!(
        request_id = %event.request_id,
        has_url = self.config.url.is_some(),
        has_secret = self.config.secret.is_some(),
        "webhook not configured; notification skipped"
      );
      return Delivery::Skipped;
    };

    let payload = WebhookPayload {
      secret,
      request_id: &event.request_id,
      form_type: event.form_type,
      created_at: event.created_at,
      candidate_id: event.candidate_id,
    };

    let resp = match self.client.post(url).json(&payload).send().await {
      Ok(resp) => resp,
      Err(e) => {
        tracing::error!(request_id = %event.request_id, error = %e, "webhook notification failed");
        return Delivery::Failed;
      }
    };

    let status = resp.status();
    if status.is_success() || status.is_redirection() {
      tracing::debug!(request_id = %event.request_id, status = status.as_u16(), "webhook notified");
      return Delivery::Delivered(status.as_u16());
    }

    let body = resp.text().await.unwrap_or_default();
    let body: String = body.chars().take(BODY_LOG_LIMIT).collect();
    tracing::error!(
      request_id = %event.request_id,
      status = status.as_u16(),
      reason = status.canonical_reason().unwrap_or(""),
      body = %body,
      "webhook notification rejected"
    );
    Delivery::Rejected(status.as_u16())
  }
}
