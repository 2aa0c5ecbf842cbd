//! [`SqliteStore`], the SQLite implementation of [`SubmissionStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::types::Value;
use uuid::Uuid;

use kcs_core::{
  query::SubmissionQuery,
  store::{InsertError, Page, SubmissionStore},
  submission::{NewSubmission, Receipt, Submission},
};

use crate::{
  encode::{
    RawSubmission, SUBMISSION_COLUMNS, encode_dt, encode_form_type, encode_uuid,
  },
  filter::Filter,
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A submission store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert `row` with an explicit creation timestamp.
  ///
  /// The timestamp is truncated to the stored precision first, so the
  /// receipt matches what a later query returns.
  pub(crate) async fn insert_at(
    &self,
    row:        NewSubmission,
    created_at: DateTime<Utc>,
  ) -> Result<Receipt, InsertError<Error>> {
    let created_at = created_at.trunc_subsecs(6);
    let receipt = Receipt {
      id: Uuid::new_v4(),
      request_id: row.request_id.clone(),
      created_at,
    };

    let id_str        = encode_uuid(receipt.id);
    let created_str   = encode_dt(created_at);
    let form_type_str = encode_form_type(row.form_type);

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO candidates (
             id, request_id, form_type, lp_id,
             name, birth_year, tel, email,
             positions, qualifications, experience,
             utm_source, utm_medium, utm_campaign, utm_content, utm_term,
             referrer, landing_path, created_at
           ) VALUES (
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
             ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19
           )",
          rusqlite::params![
            id_str,
            row.request_id,
            form_type_str,
            row.lp_id,
            row.name,
            row.birth_year,
            row.tel,
            row.email,
            row.positions,
            row.qualifications,
            row.experience,
            row.utm_source,
            row.utm_medium,
            row.utm_campaign,
            row.utm_content,
            row.utm_term,
            row.referrer,
            row.landing_path,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => {
        tracing::debug!(id = %receipt.id, request_id = %receipt.request_id, "submission stored");
        Ok(receipt)
      }
      Err(e) if is_duplicate_request_id(&e) => {
        Err(InsertError::DuplicateRequestId(receipt.request_id))
      }
      Err(e) => Err(InsertError::Store(Error::Database(e))),
    }
  }
}

/// `true` when `e` is the UNIQUE violation on `candidates.request_id`.
fn is_duplicate_request_id(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, Some(msg)))
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        && msg.contains("candidates.request_id")
  )
}

// ─── SubmissionStore impl ────────────────────────────────────────────────────

impl SubmissionStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, row: NewSubmission) -> Result<Receipt, InsertError<Error>> {
    self.insert_at(row, Utc::now()).await
  }

  async fn query(&self, query: &SubmissionQuery) -> Result<Page<Submission>> {
    let Filter { clause, args } = Filter::build(query);
    let limit  = i64::from(query.limit);
    let offset = i64::from(query.offset);

    let (total, raws): (i64, Vec<RawSubmission>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM candidates {clause}"),
          rusqlite::params_from_iter(args.iter()),
          |row| row.get(0),
        )?;

        let sql = format!(
          "SELECT {SUBMISSION_COLUMNS}
           FROM candidates
           {clause}
           ORDER BY created_at DESC, rowid DESC
           LIMIT ? OFFSET ?"
        );
        let page_args = args
          .into_iter()
          .chain([Value::Integer(limit), Value::Integer(offset)]);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(page_args), RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawSubmission::into_submission)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page { items, total: u64::try_from(total).unwrap_or(0) })
  }
}
