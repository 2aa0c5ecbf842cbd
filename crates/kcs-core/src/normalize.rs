//! Best-effort coercion of an untrusted JSON body into typed field values.
//!
//! Nothing here rejects a field: a value of the wrong shape simply comes out
//! as `None`, and the validator decides whether that absence matters. The
//! only hard failure is a top-level value that is not a JSON object.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::validate::FieldError;

/// The registration body after per-field coercion.
///
/// Field names match the JSON keys of the request body, so serializing a
/// `NormalizedBody` and normalizing the result again is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedBody {
  pub request_id:     Option<String>,
  pub form_type:      Option<String>,
  pub lp_id:          Option<String>,

  pub name:           Option<String>,
  pub birth_year:     Option<f64>,
  pub tel:            Option<String>,
  pub email:          Option<String>,

  pub positions:      Option<Vec<String>>,
  pub qualifications: Option<Vec<String>>,
  pub experience:     Option<String>,

  pub utm_source:     Option<String>,
  pub utm_medium:     Option<String>,
  pub utm_campaign:   Option<String>,
  pub utm_content:    Option<String>,
  pub utm_term:       Option<String>,

  pub referrer:       Option<String>,
  pub landing_path:   Option<String>,
}

impl NormalizedBody {
  /// Re-encode as a JSON object, absent fields as `null`.
  pub fn to_value(&self) -> Value {
    serde_json::to_value(self).unwrap_or(Value::Null)
  }
}

/// Normalize `body`, or fail with the single structural error when it is not
/// a JSON object.
pub fn normalize(body: &Value) -> Result<NormalizedBody, FieldError> {
  let obj = body.as_object().ok_or_else(FieldError::not_an_object)?;
  Ok(normalize_object(obj))
}

fn normalize_object(obj: &Map<String, Value>) -> NormalizedBody {
  let string = |key: &str| obj.get(key).and_then(as_string);
  let list = |key: &str| obj.get(key).and_then(as_string_list);

  NormalizedBody {
    request_id:     string("request_id"),
    form_type:      string("form_type"),
    lp_id:          string("lp_id"),
    name:           string("name"),
    birth_year:     obj.get("birth_year").and_then(as_number),
    tel:            string("tel"),
    email:          string("email"),
    positions:      list("positions"),
    qualifications: list("qualifications"),
    experience:     string("experience"),
    utm_source:     string("utm_source"),
    utm_medium:     string("utm_medium"),
    utm_campaign:   string("utm_campaign"),
    utm_content:    string("utm_content"),
    utm_term:       string("utm_term"),
    referrer:       string("referrer"),
    landing_path:   string("landing_path"),
  }
}

// ─── Coercions ───────────────────────────────────────────────────────────────

/// Strings only, trimmed; empty after trimming is absent.
pub fn as_string(v: &Value) -> Option<String> {
  v.as_str().and_then(trimmed)
}

/// An array of strings, or a comma-separated string.
///
/// Elements are trimmed; non-string and empty elements are dropped. An empty
/// result is absent.
pub fn as_string_list(v: &Value) -> Option<Vec<String>> {
  let items: Vec<String> = match v {
    Value::Array(arr) => arr
      .iter()
      .filter_map(Value::as_str)
      .filter_map(trimmed)
      .collect(),
    Value::String(s) => s.split(',').filter_map(trimmed).collect(),
    _ => return None,
  };
  (!items.is_empty()).then_some(items)
}

/// A finite number, or a string that parses to one.
pub fn as_number(v: &Value) -> Option<f64> {
  let n = match v {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => s.trim().parse::<f64>().ok()?,
    _ => return None,
  };
  n.is_finite().then_some(n)
}

fn trimmed(s: &str) -> Option<String> {
  let s = s.trim();
  (!s.is_empty()).then(|| s.to_owned())
}
