//! Shared-secret admin authorization: extractor and standalone verifier.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use kcs_core::store::SubmissionStore;
use sha2::{Digest, Sha256};

use crate::{AppState, error::AdminError};

/// Request header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// The server-side admin secret. `None` means the server is misconfigured;
/// it never means "auth disabled".
#[derive(Clone, Default)]
pub struct AdminAuth {
  token: Option<String>,
}

impl AdminAuth {
  /// A blank token is treated as no token.
  pub fn new(token: Option<String>) -> Self {
    Self { token: token.filter(|t| !t.trim().is_empty()) }
  }

  pub fn is_configured(&self) -> bool { self.token.is_some() }

  /// Check the request headers against the configured token.
  pub fn verify(&self, headers: &HeaderMap) -> Result<(), AdminError> {
    let expected = self.token.as_deref().ok_or(AdminError::Misconfigured)?;

    let provided = headers
      .get(ADMIN_TOKEN_HEADER)
      .and_then(|v| v.to_str().ok())
      .filter(|v| !v.is_empty())
      .ok_or(AdminError::Unauthorized)?;

    // Compare digests so timing does not track the first differing byte.
    if Sha256::digest(provided.as_bytes()) != Sha256::digest(expected.as_bytes()) {
      return Err(AdminError::Unauthorized);
    }
    Ok(())
  }
}

/// Zero-size marker: present in the handler means the admin token matched.
pub struct AdminAuthorized;

impl<S> FromRequestParts<AppState<S>> for AdminAuthorized
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  type Rejection = AdminError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    state.auth.verify(&parts.headers)?;
    Ok(AdminAuthorized)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(token: Option<&str>) -> HeaderMap {
    let mut h = HeaderMap::new();
    if let Some(t) = token {
      h.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_str(t).unwrap());
    }
    h
  }

  #[test]
  fn correct_token() {
    let auth = AdminAuth::new(Some("s3cret".into()));
    assert!(auth.verify(&headers(Some("s3cret"))).is_ok());
  }

  #[test]
  fn wrong_token() {
    let auth = AdminAuth::new(Some("s3cret".into()));
    assert!(matches!(
      auth.verify(&headers(Some("s3cre"))),
      Err(AdminError::Unauthorized)
    ));
    assert!(matches!(
      auth.verify(&headers(Some("s3cret "))),
      Err(AdminError::Unauthorized)
    ));
  }

  #[test]
  fn missing_or_empty_header() {
    let auth = AdminAuth::new(Some("s3cret".into()));
    assert!(matches!(auth.verify(&headers(None)), Err(AdminError::Unauthorized)));
    assert!(matches!(
      auth.verify(&headers(Some(""))),
      Err(AdminError::Unauthorized)
    ));
  }

  #[test]
  fn unconfigured_server_is_misconfigured_not_open() {
    for auth in [AdminAuth::new(None), AdminAuth::new(Some("  ".into()))] {
      assert!(!auth.is_configured());
      assert!(matches!(
        auth.verify(&headers(Some("anything"))),
        Err(AdminError::Misconfigured)
      ));
      assert!(matches!(auth.verify(&headers(None)), Err(AdminError::Misconfigured)));
    }
  }
}
