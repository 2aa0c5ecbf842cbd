//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use kcs_core::{
  map::split_list,
  query::{AdminParams, SearchPattern, SubmissionQuery},
  store::{InsertError, SubmissionStore},
  submission::{FormType, NewSubmission},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn row(request_id: &str, form_type: FormType) -> NewSubmission {
  let (qualifications, experience) = match form_type {
    FormType::General => (Some("一級建築士,宅建".to_string()), None),
    FormType::Beginner => (None, Some("1".to_string())),
  };
  NewSubmission {
    request_id: request_id.into(),
    form_type,
    lp_id: format!("lp_{form_type}"),
    name: "山田 太郎".into(),
    birth_year: 1990,
    tel: "09012345678".into(),
    email: "taro@example.com".into(),
    positions: "施工管理,設計".into(),
    qualifications,
    experience,
    utm_source: Some("google".into()),
    utm_medium: None,
    utm_campaign: None,
    utm_content: None,
    utm_term: None,
    referrer: None,
    landing_path: "/kensetsu-career-support".into(),
  }
}

fn person(request_id: &str, name: &str, tel: &str, email: &str) -> NewSubmission {
  NewSubmission {
    name: name.into(),
    tel: tel.into(),
    email: email.into(),
    ..row(request_id, FormType::General)
  }
}

fn at(day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap()
}

fn request_ids(page: &kcs_core::store::Page<kcs_core::submission::Submission>) -> Vec<&str> {
  page.items.iter().map(|s| s.request_id.as_str()).collect()
}

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_read_back() {
  let s = store().await;

  let receipt = s.insert(row("req-1", FormType::General)).await.unwrap();
  assert_eq!(receipt.request_id, "req-1");

  let page = s.query(&SubmissionQuery::default()).await.unwrap();
  assert_eq!(page.total, 1);
  let stored = &page.items[0];
  assert_eq!(stored.id, receipt.id);
  assert_eq!(stored.created_at, receipt.created_at);
  assert_eq!(stored.form_type, FormType::General);
  assert_eq!(stored.birth_year, 1990);
  assert_eq!(split_list(&stored.positions), vec!["施工管理", "設計"]);
  assert_eq!(stored.qualifications.as_deref(), Some("一級建築士,宅建"));
  assert_eq!(stored.experience, None);
  assert_eq!(stored.utm_source.as_deref(), Some("google"));
  assert_eq!(stored.referrer, None);
}

#[tokio::test]
async fn receipt_timestamp_matches_stored_row() {
  let s = store().await;
  let precise = Utc
    .with_ymd_and_hms(2026, 1, 15, 3, 4, 5)
    .unwrap()
    .with_nanosecond(294_876_799)
    .unwrap();

  let receipt = s.insert_at(row("req-ns", FormType::General), precise).await.unwrap();
  assert_eq!(receipt.created_at.nanosecond(), 294_876_000);

  let page = s.query(&SubmissionQuery::default()).await.unwrap();
  assert_eq!(page.items[0].created_at, receipt.created_at);

  for i in 0..20 {
    let receipt = s.insert(row(&format!("req-now-{i}"), FormType::Beginner)).await.unwrap();
    let page = s.query(&SubmissionQuery { limit: 1, ..Default::default() }).await.unwrap();
    assert_eq!(page.items[0].id, receipt.id);
    assert_eq!(page.items[0].created_at, receipt.created_at);
  }
}

#[tokio::test]
async fn duplicate_request_id_is_a_conflict() {
  let s = store().await;

  let first = s.insert(row("req-dup", FormType::Beginner)).await.unwrap();

  let mut again = row("req-dup", FormType::General);
  again.name = "別人".into();
  let err = s.insert(again).await.unwrap_err();
  assert!(
    matches!(err, InsertError::DuplicateRequestId(ref id) if id == "req-dup"),
    "{err:?}"
  );

  // The first row is untouched.
  let page = s.query(&SubmissionQuery::default()).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].id, first.id);
  assert_eq!(page.items[0].name, "山田 太郎");
  assert_eq!(page.items[0].form_type, FormType::Beginner);
}

#[tokio::test]
async fn concurrent_duplicates_have_one_winner() {
  let s = store().await;

  let (a, b) = tokio::join!(
    s.insert(row("req-race", FormType::General)),
    s.insert(row("req-race", FormType::General)),
  );
  let wins = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
  assert_eq!(wins, 1);
  assert!(
    [a, b]
      .into_iter()
      .filter_map(Result::err)
      .all(|e| matches!(e, InsertError::DuplicateRequestId(_)))
  );
}

// ─── Query: ordering and paging ──────────────────────────────────────────────

#[tokio::test]
async fn newest_first() {
  let s = store().await;
  s.insert_at(row("day-1", FormType::General), at(1)).await.unwrap();
  s.insert_at(row("day-3", FormType::General), at(3)).await.unwrap();
  s.insert_at(row("day-2", FormType::General), at(2)).await.unwrap();

  let page = s.query(&SubmissionQuery::default()).await.unwrap();
  assert_eq!(request_ids(&page), vec!["day-3", "day-2", "day-1"]);
}

#[tokio::test]
async fn total_ignores_pagination_window() {
  let s = store().await;
  for day in 1..=5 {
    s.insert_at(row(&format!("day-{day}"), FormType::General), at(day))
      .await
      .unwrap();
  }

  let page = s
    .query(&SubmissionQuery { limit: 2, offset: 1, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.total, 5);
  assert_eq!(request_ids(&page), vec!["day-4", "day-3"]);

  let past_end = s
    .query(&SubmissionQuery { limit: 2, offset: 10, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(past_end.total, 5);
  assert!(past_end.items.is_empty());
}

// ─── Query: filters ──────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_by_form_type_and_lp_id() {
  let s = store().await;
  s.insert(row("g-1", FormType::General)).await.unwrap();
  s.insert(row("b-1", FormType::Beginner)).await.unwrap();
  s.insert(row("b-2", FormType::Beginner)).await.unwrap();

  let beginners = s
    .query(&SubmissionQuery {
      form_type: Some(FormType::Beginner),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(beginners.total, 2);
  assert!(beginners.items.iter().all(|i| i.form_type == FormType::Beginner));

  let general_lp = s
    .query(&SubmissionQuery {
      lp_id: Some("lp_general".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(request_ids(&general_lp), vec!["g-1"]);
}

#[tokio::test]
async fn created_at_range_is_inclusive() {
  let s = store().await;
  for day in 1..=5 {
    s.insert_at(row(&format!("day-{day}"), FormType::General), at(day))
      .await
      .unwrap();
  }

  let page = s
    .query(&SubmissionQuery {
      created_from: Some(at(2)),
      created_to: Some(at(4)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 3);
  assert_eq!(request_ids(&page), vec!["day-4", "day-3", "day-2"]);

  let open_ended = s
    .query(&SubmissionQuery { created_from: Some(at(5)), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(request_ids(&open_ended), vec!["day-5"]);
}

#[tokio::test]
async fn text_search_matches_name_tel_or_email() {
  let s = store().await;
  s.insert(person("r-1", "Taro Yamada", "09011112222", "taro@example.com"))
    .await
    .unwrap();
  s.insert(person("r-2", "Hanako Sato", "08033334444", "hanako@example.com"))
    .await
    .unwrap();
  s.insert(person("r-3", "Jiro Suzuki", "07055556666", "jiro@sample.jp"))
    .await
    .unwrap();

  let search = |text: &str| SubmissionQuery {
    text: Some(SearchPattern::contains(text)),
    ..Default::default()
  };

  let by_name = s.query(&search("yamada")).await.unwrap();
  assert_eq!(request_ids(&by_name), vec!["r-1"]);

  let by_tel = s.query(&search("3333")).await.unwrap();
  assert_eq!(request_ids(&by_tel), vec!["r-2"]);

  let by_email = s.query(&search("SAMPLE.JP")).await.unwrap();
  assert_eq!(request_ids(&by_email), vec!["r-3"]);

  let all_example = s.query(&search("example.com")).await.unwrap();
  assert_eq!(all_example.total, 2);
}

#[tokio::test]
async fn wildcards_in_search_text_are_literal() {
  let s = store().await;
  s.insert(person("r-1", "100% Builder", "0900", "a@example.com"))
    .await
    .unwrap();
  s.insert(person("r-2", "1000 Builder", "0901", "b@example.com"))
    .await
    .unwrap();
  s.insert(person("r-3", "snake_case", "0902", "c@example.com"))
    .await
    .unwrap();
  s.insert(person("r-4", "snakeXcase", "0903", "d@example.com"))
    .await
    .unwrap();

  let percent = s
    .query(&SubmissionQuery::from(&AdminParams {
      q: Some("100%".into()),
      ..Default::default()
    }))
    .await
    .unwrap();
  assert_eq!(request_ids(&percent), vec!["r-1"]);

  let underscore = s
    .query(&SubmissionQuery::from(&AdminParams {
      q: Some("e_c".into()),
      ..Default::default()
    }))
    .await
    .unwrap();
  assert_eq!(request_ids(&underscore), vec!["r-3"]);

  let lone_percent = s
    .query(&SubmissionQuery::from(&AdminParams {
      q: Some("%".into()),
      ..Default::default()
    }))
    .await
    .unwrap();
  assert_eq!(request_ids(&lone_percent), vec!["r-1"]);
}

#[tokio::test]
async fn filters_combine_with_and() {
  let s = store().await;
  s.insert_at(person("r-1", "Taro", "0900", "taro@example.com"), at(1))
    .await
    .unwrap();
  s.insert_at(
    NewSubmission {
      name: "Taro".into(),
      ..row("r-2", FormType::Beginner)
    },
    at(2),
  )
  .await
  .unwrap();
  s.insert_at(person("r-3", "Hanako", "0901", "hanako@example.com"), at(3))
    .await
    .unwrap();

  let page = s
    .query(&SubmissionQuery {
      form_type: Some(FormType::General),
      text: Some(SearchPattern::contains("taro")),
      created_to: Some(at(2)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(request_ids(&page), vec!["r-1"]);
}
