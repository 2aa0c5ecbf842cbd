//! Handler for `POST /api/register`.

use axum::{
  Json,
  extract::{State, rejection::BytesRejection},
};
use bytes::Bytes;
use kcs_core::{
  store::{InsertError, SubmissionStore},
  submission::NewSubmission,
  validate::validate,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{AppState, error::RegisterError};

#[derive(Debug, Serialize)]
pub struct Registered {
  pub ok:         bool,
  pub id:         Uuid,
  pub request_id: String,
}

/// `POST /api/register`. Body: one JSON object from the landing-page wizard.
///
/// A body that cannot be read or parsed is validated as `null`, which yields
/// the structural "Body must be a JSON object" error.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Result<Bytes, BytesRejection>,
) -> Result<Json<Registered>, RegisterError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  let body: Value = body
    .ok()
    .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    .unwrap_or(Value::Null);

  let input = validate(&body).map_err(RegisterError::Invalid)?;

  let receipt = match state.store.insert(NewSubmission::from(&input)).await {
    Ok(receipt) => receipt,
    Err(InsertError::DuplicateRequestId(request_id)) => {
      tracing::info!(%request_id, "duplicate registration rejected");
      return Err(RegisterError::DuplicateRequestId(request_id));
    }
    Err(InsertError::Store(e)) => {
      tracing::error!(request_id = %input.request_id, error = %e, "failed to store submission");
      return Err(RegisterError::Store(Box::new(e)));
    }
  };

  // Detached: the response never waits on the webhook.
  state.notifier.spawn(&input, &receipt);

  Ok(Json(Registered {
    ok:         true,
    id:         receipt.id,
    request_id: receipt.request_id,
  }))
}

/// Any method other than `POST`.
pub async fn method_not_allowed() -> RegisterError { RegisterError::MethodNotAllowed }
