//! Handler for `GET /api/admin/candidates`.
//!
//! Query params are read as raw pairs and handed to [`AdminParams`]; nothing
//! in the query string can make the request fail.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use kcs_core::{
  query::{AdminParams, SubmissionQuery},
  store::SubmissionStore,
  submission::Submission,
};
use serde::Serialize;

use crate::{AppState, auth::AdminAuthorized, error::AdminError};

#[derive(Debug, Serialize)]
pub struct Listing {
  pub ok:     bool,
  pub items:  Vec<Submission>,
  pub total:  u64,
  pub limit:  u32,
  pub offset: u32,
}

/// `GET /api/admin/candidates[?form_type=..][&lp_id=..][&q=..][&from=..][&to=..][&limit=..][&offset=..]`
pub async fn handler<S>(
  _auth: AdminAuthorized,
  State(state): State<AppState<S>>,
  pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Listing>, AdminError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  let pairs = pairs.map(|Query(p)| p).unwrap_or_default();
  let query = SubmissionQuery::from(&AdminParams::from_pairs(pairs));

  let page = state.store.query(&query).await.map_err(|e| {
    tracing::error!(error = %e, "failed to query submissions");
    AdminError::Store(Box::new(e))
  })?;

  Ok(Json(Listing {
    ok:     true,
    items:  page.items,
    total:  page.total,
    limit:  query.limit,
    offset: query.offset,
  }))
}

/// Any method other than `GET`. Authorization still runs first.
pub async fn method_not_allowed(_auth: AdminAuthorized) -> AdminError {
  AdminError::MethodNotAllowed
}
