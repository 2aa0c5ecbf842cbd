//! Error types and axum `IntoResponse` implementations.
//!
//! The two endpoints have different error envelopes: registration errors carry
//! a `{code, message}` object, admin errors a bare code string.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use kcs_core::validate::FieldError;
use serde_json::json;
use thiserror::Error;

// ─── Registration ────────────────────────────────────────────────────────────

/// An error returned by `POST /api/register`.
#[derive(Debug, Error)]
pub enum RegisterError {
  #[error("validation failed ({} field errors)", .0.len())]
  Invalid(Vec<FieldError>),

  #[error("request_id already exists: {0}")]
  DuplicateRequestId(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("unexpected error")]
  Internal,

  #[error("method not allowed")]
  MethodNotAllowed,
}

impl RegisterError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::Invalid(_) => "invalid_request",
      Self::DuplicateRequestId(_) => "duplicate_request_id",
      Self::Store(_) => "db_error",
      Self::Internal => "internal_error",
      Self::MethodNotAllowed => "method_not_allowed",
    }
  }
}

impl IntoResponse for RegisterError {
  fn into_response(self) -> Response {
    let code = self.code();
    let (status, body) = match self {
      Self::Invalid(details) => (
        StatusCode::BAD_REQUEST,
        json!({
          "ok": false,
          "error": { "code": code, "message": "Validation failed", "details": details },
        }),
      ),
      Self::DuplicateRequestId(_) => (
        StatusCode::CONFLICT,
        json!({
          "ok": false,
          "error": { "code": code, "message": "request_id already exists" },
        }),
      ),
      Self::Store(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
          "ok": false,
          "error": { "code": code, "message": "Failed to save data" },
        }),
      ),
      Self::Internal => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
          "ok": false,
          "error": { "code": code, "message": "Unexpected error" },
        }),
      ),
      Self::MethodNotAllowed => {
        let mut res = (
          StatusCode::METHOD_NOT_ALLOWED,
          Json(json!({
            "ok": false,
            "error": { "code": code, "message": "POST only" },
          })),
        )
          .into_response();
        res
          .headers_mut()
          .insert(header::ALLOW, HeaderValue::from_static("POST"));
        return res;
      }
    };
    (status, Json(body)).into_response()
  }
}

// ─── Admin ───────────────────────────────────────────────────────────────────

/// An error returned by `GET /api/admin/candidates`.
#[derive(Debug, Error)]
pub enum AdminError {
  #[error("unauthorized")]
  Unauthorized,

  /// The server has no admin token configured.
  #[error("server misconfigured")]
  Misconfigured,

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("unexpected error")]
  Internal,
}

impl AdminError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::Unauthorized => "unauthorized",
      Self::Misconfigured => "server_misconfigured",
      Self::MethodNotAllowed => "method_not_allowed",
      Self::Store(_) => "db_error",
      Self::Internal => "internal_error",
    }
  }
}

impl IntoResponse for AdminError {
  fn into_response(self) -> Response {
    let status = match &self {
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::Misconfigured | Self::Store(_) | Self::Internal => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    };
    let mut res =
      (status, Json(json!({ "ok": false, "error": self.code() }))).into_response();
    if matches!(self, Self::MethodNotAllowed) {
      res
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET"));
    }
    res
  }
}
