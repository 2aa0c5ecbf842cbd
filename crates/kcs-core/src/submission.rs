//! Submission types: the lead record in its three shapes.
//!
//! A registration travels through the pipeline as a [`RegisterInput`]
//! (validated, still carrying list fields), is flattened into a
//! [`NewSubmission`] row for storage, and comes back out of the store as a
//! [`Submission`] with its server-assigned `id` and `created_at`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Form type ───────────────────────────────────────────────────────────────

/// Which wizard variant produced a submission.
///
/// Selects which of `qualifications` / `experience` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
  General,
  Beginner,
}

impl FormType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::General => "general",
      Self::Beginner => "beginner",
    }
  }
}

impl fmt::Display for FormType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for FormType {
  type Err = Error;

  /// Exact match only; callers trim beforehand.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "general" => Ok(Self::General),
      "beginner" => Ok(Self::Beginner),
      other => Err(Error::UnknownFormType(other.to_owned())),
    }
  }
}

// ─── Validated input ─────────────────────────────────────────────────────────

/// A registration body that passed [`crate::validate::validate`].
///
/// Every required field is present and trimmed. `qualifications` and
/// `experience` are carried as submitted; the mapper decides which survives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterInput {
  pub request_id:     String,
  pub form_type:      FormType,
  pub lp_id:          String,

  pub name:           String,
  pub birth_year:     i32,
  pub tel:            String,
  pub email:          String,

  /// Always at least one entry.
  pub positions:      Vec<String>,

  pub qualifications: Option<Vec<String>>,
  pub experience:     Option<String>,

  pub utm_source:     Option<String>,
  pub utm_medium:     Option<String>,
  pub utm_campaign:   Option<String>,
  pub utm_content:    Option<String>,
  pub utm_term:       Option<String>,

  pub referrer:       Option<String>,
  pub landing_path:   String,
}

// ─── Persisted shapes ────────────────────────────────────────────────────────

/// Input to [`crate::store::SubmissionStore::insert`].
///
/// List fields are already joined with `,`. `id` and `created_at` are always
/// assigned by the store; they are not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
  pub request_id:     String,
  pub form_type:      FormType,
  pub lp_id:          String,
  pub name:           String,
  pub birth_year:     i32,
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
}

/// A stored submission, as returned by admin queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  pub id:             Uuid,
  pub request_id:     String,
  pub form_type:      FormType,
  pub lp_id:          String,
  pub name:           String,
  pub birth_year:     i32,
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
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:     DateTime<Utc>,
}

/// What a successful insert hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
  pub id:         Uuid,
  pub request_id: String,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn form_type_parses_exact_names_only() {
    assert_eq!("general".parse::<FormType>().unwrap(), FormType::General);
    assert_eq!("beginner".parse::<FormType>().unwrap(), FormType::Beginner);
    assert!("General".parse::<FormType>().is_err());
    assert!(" general".parse::<FormType>().is_err());
  }

  #[test]
  fn form_type_serializes_lowercase() {
    let json = serde_json::to_string(&FormType::Beginner).unwrap();
    assert_eq!(json, "\"beginner\"");
  }
}
