//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that string comparison in SQL is chronological.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use kcs_core::submission::{FormType, Submission};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FormType ────────────────────────────────────────────────────────────────

pub fn encode_form_type(f: FormType) -> &'static str { f.as_str() }

pub fn decode_form_type(s: &str) -> Result<FormType> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that produces a [`RawSubmission`].
pub const SUBMISSION_COLUMNS: &str = "id, request_id, form_type, lp_id, name, \
  birth_year, tel, email, positions, qualifications, experience, utm_source, \
  utm_medium, utm_campaign, utm_content, utm_term, referrer, landing_path, \
  created_at";

/// Raw values read directly from a `candidates` row.
pub struct RawSubmission {
  pub id:             String,
  pub request_id:     String,
  pub form_type:      String,
  pub lp_id:          String,
  pub name:           String,
  pub birth_year:     i64,
  pub tel:            String,
  pub email:          String,
  pub positions:      String,
  pub qualifications: Option<String>,
  pub experience:     Option<String>,
  pub utm_source:     Option<String>,
  pub utm_medium:     Option<String>,
  pub utm_campaign:   Option<String>,
  pub utm_content:    Option<String>,
  pub utm_term:       Option<String>,
  pub referrer:       Option<String>,
  pub landing_path:   String,
  pub created_at:     String,
}

impl RawSubmission {
  /// Read a row selected with [`SUBMISSION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      request_id:     row.get(1)?,
      form_type:      row.get(2)?,
      lp_id:          row.get(3)?,
      name:           row.get(4)?,
      birth_year:     row.get(5)?,
      tel:            row.get(6)?,
      email:          row.get(7)?,
      positions:      row.get(8)?,
      qualifications: row.get(9)?,
      experience:     row.get(10)?,
      utm_source:     row.get(11)?,
      utm_medium:     row.get(12)?,
      utm_campaign:   row.get(13)?,
      utm_content:    row.get(14)?,
      utm_term:       row.get(15)?,
      referrer:       row.get(16)?,
      landing_path:   row.get(17)?,
      created_at:     row.get(18)?,
    })
  }

  pub fn into_submission(self) -> Result<Submission> {
    let birth_year = i32::try_from(self.birth_year)
      .map_err(|_| Error::OutOfRange(format!("birth_year {}", self.birth_year)))?;

    Ok(Submission {
      id: decode_uuid(&self.id)?,
      request_id: self.request_id,
      form_type: decode_form_type(&self.form_type)?,
      lp_id: self.lp_id,
      name: self.name,
      birth_year,
      tel: self.tel,
      email: self.email,
      positions: self.positions,
      qualifications: self.qualifications,
      experience: self.experience,
      utm_source: self.utm_source,
      utm_medium: self.utm_medium,
      utm_campaign: self.utm_campaign,
      utm_content: self.utm_content,
      utm_term: self.utm_term,
      referrer: self.referrer,
      landing_path: self.landing_path,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
