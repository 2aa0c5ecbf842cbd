//! The `SubmissionStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g. `kcs-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::{
  query::SubmissionQuery,
  submission::{NewSubmission, Receipt, Submission},
};

/// Failure of [`SubmissionStore::insert`].
///
/// A duplicate `request_id` is an expected outcome (the visitor submitted the
/// same form twice) and is kept apart from genuine backend failures.
#[derive(Debug, Error)]
pub enum InsertError<E> {
  #[error("request_id already exists: {0}")]
  DuplicateRequestId(String),

  #[error("store error: {0}")]
  Store(#[source] E),
}

/// One window of an admin query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// Number of rows matching the filter, regardless of the window.
  pub total: u64,
}

/// Abstraction over the submission datastore.
///
/// Submissions are write-once: there is no update or delete.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SubmissionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new submission. `id` and `created_at` are assigned by the
  /// store. A second insert with the same `request_id` yields
  /// [`InsertError::DuplicateRequestId`] and leaves the first row untouched.
  fn insert(
    &self,
    row: NewSubmission,
  ) -> impl Future<Output = Result<Receipt, InsertError<Self::Error>>> + Send + '_;

  /// Filter, order by `created_at` descending, and return one page plus the
  /// exact match count.
  fn query<'a>(
    &'a self,
    query: &'a SubmissionQuery,
  ) -> impl Future<Output = Result<Page<Submission>, Self::Error>> + Send + 'a;
}
