//! WHERE-clause construction for admin queries.
//!
//! Conditions come only from the static fragments below; every caller-supplied
//! value travels as a bound parameter.

use kcs_core::query::SubmissionQuery;
use rusqlite::types::Value;

use crate::encode::{encode_dt, encode_form_type};

const TEXT_MATCH: &str = r"(name LIKE ? ESCAPE '\' OR tel LIKE ? ESCAPE '\' OR email LIKE ? ESCAPE '\')";

/// A rendered `WHERE` clause (possibly empty) and its positional arguments.
#[derive(Debug, Default)]
pub struct Filter {
  pub clause: String,
  pub args:   Vec<Value>,
}

impl Filter {
  pub fn build(query: &SubmissionQuery) -> Self {
    let mut conds: Vec<&'static str> = vec![];
    let mut args: Vec<Value> = vec![];

    if let Some(form_type) = query.form_type {
      conds.push("form_type = ?");
      args.push(Value::Text(encode_form_type(form_type).to_owned()));
    }
    if let Some(lp_id) = &query.lp_id {
      conds.push("lp_id = ?");
      args.push(Value::Text(lp_id.clone()));
    }
    if let Some(from) = query.created_from {
      conds.push("created_at >= ?");
      args.push(Value::Text(encode_dt(from)));
    }
    if let Some(to) = query.created_to {
      conds.push("created_at <= ?");
      args.push(Value::Text(encode_dt(to)));
    }
    if let Some(pattern) = &query.text {
      conds.push(TEXT_MATCH);
      for _ in 0..3 {
        args.push(Value::Text(pattern.as_str().to_owned()));
      }
    }

    let clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    Self { clause, args }
  }
}

#[cfg(test)]
mod tests {
  use kcs_core::{
    query::{LIKE_ESCAPE, SearchPattern},
    submission::FormType,
  };

  use super::*;

  #[test]
  fn empty_query_has_no_clause() {
    let f = Filter::build(&SubmissionQuery::default());
    assert!(f.clause.is_empty());
    assert!(f.args.is_empty());
  }

  #[test]
  fn placeholders_match_arguments() {
    let query = SubmissionQuery {
      form_type: Some(FormType::General),
      lp_id: Some("lp_general".into()),
      text: Some(SearchPattern::contains("taro")),
      ..Default::default()
    };
    let f = Filter::build(&query);
    assert_eq!(f.clause.matches('?').count(), f.args.len());
    assert_eq!(f.args.len(), 5);
    assert!(f.clause.starts_with("WHERE form_type = ? AND lp_id = ?"));
  }

  #[test]
  fn search_text_is_never_inlined() {
    let query = SubmissionQuery {
      text: Some(SearchPattern::contains("'; DROP TABLE candidates; --")),
      ..Default::default()
    };
    let f = Filter::build(&query);
    assert!(!f.clause.contains("DROP"));
  }

  #[test]
  fn escape_clause_uses_core_escape_character() {
    assert!(TEXT_MATCH.contains(&format!("ESCAPE '{LIKE_ESCAPE}'")));
  }
}
