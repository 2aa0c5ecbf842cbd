//! Field rules for the registration body.
//!
//! Validation is total: every input is classified as either a
//! [`RegisterInput`] or a non-empty list of [`FieldError`]s. All applicable
//! rules run and accumulate before returning; only a non-object body
//! short-circuits.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  normalize::{NormalizedBody, normalize},
  submission::{FormType, RegisterInput},
};

pub const BIRTH_YEAR_MIN: i32 = 1900;
pub const BIRTH_YEAR_MAX: i32 = 2100;

/// `local@domain.tld`, no whitespace, exactly one `@`.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// One failed rule. `field` is a stable identifier consumed by API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }

  /// The structural error reported for anything that is not a JSON object.
  pub fn not_an_object() -> Self { Self::new("_", "Body must be a JSON object") }
}

pub fn is_email_like(s: &str) -> bool { EMAIL_RE.is_match(s) }

/// Normalize and validate an untrusted request body.
pub fn validate(body: &Value) -> Result<RegisterInput, Vec<FieldError>> {
  let normalized = normalize(body).map_err(|e| vec![e])?;
  validate_normalized(normalized)
}

/// Apply the field rules to an already-normalized body.
pub fn validate_normalized(
  body: NormalizedBody,
) -> Result<RegisterInput, Vec<FieldError>> {
  let mut errors = Vec::new();
  let mut fail = |field: &str, message: &str| {
    errors.push(FieldError::new(field, message));
  };

  let form_type = body
    .form_type
    .as_deref()
    .and_then(|s| s.parse::<FormType>().ok());

  if body.request_id.is_none() {
    fail("request_id", "required");
  }
  if form_type.is_none() {
    fail("form_type", "must be general or beginner");
  }
  if body.lp_id.is_none() {
    fail("lp_id", "required");
  }
  if body.name.is_none() {
    fail("name", "required");
  }
  if body.birth_year.is_none() {
    fail("birth_year", "required");
  }
  if body.tel.is_none() {
    fail("tel", "required");
  }
  match body.email.as_deref() {
    None => fail("email", "required"),
    Some(email) if !is_email_like(email) => fail("email", "invalid format"),
    Some(_) => {}
  }
  if body.positions.is_none() {
    fail("positions", "required");
  }
  if body.landing_path.is_none() {
    fail("landing_path", "required");
  }

  let birth_year = body.birth_year.and_then(birth_year_in_range);
  if body.birth_year.is_some() && birth_year.is_none() {
    fail("birth_year", "out of range");
  }

  if form_type == Some(FormType::Beginner) && body.experience.is_none() {
    fail("experience", "required for beginner");
  }

  // Each `None` below has already produced an error above.
  let (
    Some(request_id),
    Some(form_type),
    Some(lp_id),
    Some(name),
    Some(birth_year),
    Some(tel),
    Some(email),
    Some(positions),
    Some(landing_path),
    true,
  ) = (
    body.request_id,
    form_type,
    body.lp_id,
    body.name,
    birth_year,
    body.tel,
    body.email,
    body.positions,
    body.landing_path,
    errors.is_empty(),
  )
  else {
    return Err(errors);
  };

  Ok(RegisterInput {
    request_id,
    form_type,
    lp_id,
    name,
    birth_year,
    tel,
    email,
    positions,
    qualifications: body.qualifications,
    experience: body.experience,
    utm_source: body.utm_source,
    utm_medium: body.utm_medium,
    utm_campaign: body.utm_campaign,
    utm_content: body.utm_content,
    utm_term: body.utm_term,
    referrer: body.referrer,
    landing_path,
  })
}

/// Whole years in the accepted range; anything else is `None`.
fn birth_year_in_range(n: f64) -> Option<i32> {
  let in_range = n.fract() == 0.0
    && n >= f64::from(BIRTH_YEAR_MIN)
    && n <= f64::from(BIRTH_YEAR_MAX);
  in_range.then_some(n as i32)
}
