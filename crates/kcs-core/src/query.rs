//! Admin query builder.
//!
//! Turns the raw strings of an admin listing request into a bounded
//! [`SubmissionQuery`]. Every parameter is optional and nothing here fails:
//! unusable values fall back to their defaults or to "no filter".

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::submission::FormType;

pub const DEFAULT_LIMIT: u32 = 50;
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

pub const DEFAULT_OFFSET: u32 = 0;
pub const MAX_OFFSET: u32 = 100_000;

/// Escape character used in every `LIKE` pattern built here.
pub const LIKE_ESCAPE: char = '\\';

// ─── Raw parameters ──────────────────────────────────────────────────────────

/// Query-string parameters of `GET /api/admin/candidates`, untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdminParams {
  pub form_type: Option<String>,
  pub lp_id:     Option<String>,
  /// Free text matched against name, tel and email.
  pub q:         Option<String>,
  pub from:      Option<String>,
  pub to:        Option<String>,
  pub limit:     Option<String>,
  pub offset:    Option<String>,
}

impl AdminParams {
  /// Collect from decoded `key=value` pairs. The first occurrence of a
  /// repeated key wins; unknown keys are ignored.
  pub fn from_pairs<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
  {
    let mut params = Self::default();
    for (key, value) in pairs {
      let slot = match key.as_ref() {
        "form_type" => &mut params.form_type,
        "lp_id" => &mut params.lp_id,
        "q" => &mut params.q,
        "from" => &mut params.from,
        "to" => &mut params.to,
        "limit" => &mut params.limit,
        "offset" => &mut params.offset,
        _ => continue,
      };
      if slot.is_none() {
        *slot = Some(value.into());
      }
    }
    params
  }
}

// ─── Search pattern ──────────────────────────────────────────────────────────

/// A `LIKE` pattern matching any value that contains the searched text
/// literally. Wildcards in the input are escaped with [`LIKE_ESCAPE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern(String);

impl SearchPattern {
  pub fn contains(raw: &str) -> Self {
    Self(format!("%{}%", escape_like(raw)))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

/// Escape `LIKE` metacharacters (`%`, `_`) and the escape character itself.
pub fn escape_like(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    if matches!(c, '%' | '_' | LIKE_ESCAPE) {
      out.push(LIKE_ESCAPE);
    }
    out.push(c);
  }
  out
}

// ─── Constrained query ───────────────────────────────────────────────────────

/// Parameters for [`crate::store::SubmissionStore::query`].
///
/// Results are always ordered by `created_at`, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionQuery {
  pub form_type:    Option<FormType>,
  pub lp_id:        Option<String>,
  /// Matched against `name`, `tel` or `email`.
  pub text:         Option<SearchPattern>,
  /// Inclusive lower bound on `created_at`.
  pub created_from: Option<DateTime<Utc>>,
  /// Inclusive upper bound on `created_at`.
  pub created_to:   Option<DateTime<Utc>>,
  pub limit:        u32,
  pub offset:       u32,
}

impl Default for SubmissionQuery {
  fn default() -> Self {
    Self {
      form_type:    None,
      lp_id:        None,
      text:         None,
      created_from: None,
      created_to:   None,
      limit:        DEFAULT_LIMIT,
      offset:       DEFAULT_OFFSET,
    }
  }
}

impl From<&AdminParams> for SubmissionQuery {
  fn from(params: &AdminParams) -> Self {
    let text = |v: &Option<String>| {
      v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
    };

    Self {
      form_type:    text(&params.form_type).and_then(|s| s.parse().ok()),
      lp_id:        text(&params.lp_id),
      text:         text(&params.q).map(|q| SearchPattern::contains(&q)),
      created_from: parse_date_bound(params.from.as_deref()),
      created_to:   parse_date_bound(params.to.as_deref()),
      limit:        clamp_param(
        params.limit.as_deref(),
        DEFAULT_LIMIT,
        MIN_LIMIT,
        MAX_LIMIT,
      ),
      offset:       clamp_param(
        params.offset.as_deref(),
        DEFAULT_OFFSET,
        DEFAULT_OFFSET,
        MAX_OFFSET,
      ),
    }
  }
}

// ─── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a decimal number, truncate toward zero and clamp into
/// `[min, max]`. Blank or non-numeric input yields `default`.
pub fn clamp_param(raw: Option<&str>, default: u32, min: u32, max: u32) -> u32 {
  let Some(n) = raw
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .and_then(|s| s.parse::<f64>().ok())
    .filter(|n| n.is_finite())
  else {
    return default;
  };
  n.trunc().clamp(f64::from(min), f64::from(max)) as u32
}

/// Parse a date-range bound. Unparseable input means "no bound".
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS[.f]]` and
/// `YYYY-MM-DD`; forms without an offset are taken as UTC, and a bare date
/// means midnight.
pub fn parse_date_bound(raw: Option<&str>) -> Option<DateTime<Utc>> {
  let s = raw.map(str::trim).filter(|s| !s.is_empty())?;

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(naive.and_utc());
    }
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn params(pairs: &[(&str, &str)]) -> AdminParams {
    AdminParams::from_pairs(pairs.iter().copied())
  }

  #[test]
  fn defaults_when_empty() {
    let q = SubmissionQuery::from(&AdminParams::default());
    assert_eq!(q, SubmissionQuery::default());
    assert_eq!(q.limit, 50);
    assert_eq!(q.offset, 0);
  }

  #[test]
  fn limit_and_offset_are_clamped() {
    let q = SubmissionQuery::from(&params(&[("limit", "500"), ("offset", "-5")]));
    assert_eq!(q.limit, 100);
    assert_eq!(q.offset, 0);

    let q = SubmissionQuery::from(&params(&[("limit", "0"), ("offset", "999999")]));
    assert_eq!(q.limit, 1);
    assert_eq!(q.offset, 100_000);
  }

  #[test]
  fn non_numeric_paging_falls_back_to_defaults() {
    let q = SubmissionQuery::from(&params(&[("limit", "lots"), ("offset", " ")]));
    assert_eq!(q.limit, 50);
    assert_eq!(q.offset, 0);
  }

  #[test]
  fn fractional_paging_truncates() {
    assert_eq!(clamp_param(Some("20.9"), 50, 1, 100), 20);
    assert_eq!(clamp_param(Some("0.5"), 50, 1, 100), 1);
    assert_eq!(clamp_param(Some("1e1"), 50, 1, 100), 10);
  }

  #[test]
  fn form_type_filter_requires_known_value() {
    let q = SubmissionQuery::from(&params(&[("form_type", "beginner")]));
    assert_eq!(q.form_type, Some(FormType::Beginner));

    let q = SubmissionQuery::from(&params(&[("form_type", "everyone")]));
    assert_eq!(q.form_type, None);
  }

  #[test]
  fn blank_text_filters_are_absent() {
    let q = SubmissionQuery::from(&params(&[("lp_id", "  "), ("q", "")]));
    assert_eq!(q.lp_id, None);
    assert_eq!(q.text, None);
  }

  #[test]
  fn search_text_is_trimmed_and_escaped() {
    let q = SubmissionQuery::from(&params(&[("q", " 100%_off ")]));
    assert_eq!(q.text.unwrap().as_str(), r"%100\%\_off%");
  }

  #[test]
  fn escape_covers_escape_character() {
    assert_eq!(escape_like(r"a\b"), r"a\\b");
    assert_eq!(escape_like("山田"), "山田");
  }

  #[test]
  fn first_repeated_key_wins() {
    let p = params(&[("lp_id", "first"), ("lp_id", "second"), ("other", "x")]);
    assert_eq!(p.lp_id.as_deref(), Some("first"));
  }

  #[test]
  fn date_bounds() {
    let midnight = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
    assert_eq!(parse_date_bound(Some("2026-01-31")), Some(midnight));
    assert_eq!(
      parse_date_bound(Some("2026-01-31T09:00:00+09:00")),
      Some(midnight)
    );
    assert_eq!(parse_date_bound(Some("2026-01-31T00:00")), Some(midnight));
    assert_eq!(parse_date_bound(Some("2026-01-31T00:00:00")), Some(midnight));
  }

  #[test]
  fn invalid_dates_are_ignored() {
    let q = SubmissionQuery::from(&params(&[
      ("from", "yesterday"),
      ("to", "2026-02-30"),
    ]));
    assert_eq!(q.created_from, None);
    assert_eq!(q.created_to, None);
  }
}
