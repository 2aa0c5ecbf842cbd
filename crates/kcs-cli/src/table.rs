//! Plain-text table rendering for a listing page.

use kcs_core::submission::Submission;

use crate::client::Listing;

const HEADERS: [&str; 11] = [
  "created_at",
  "form_type",
  "lp_id",
  "name",
  "birth_year",
  "tel",
  "email",
  "positions",
  "qualifications",
  "experience",
  "request_id",
];

fn cells(s: &Submission) -> [String; 11] {
  let opt = |v: &Option<String>| v.clone().unwrap_or_default();
  [
    s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    s.form_type.to_string(),
    s.lp_id.clone(),
    s.name.clone(),
    s.birth_year.to_string(),
    s.tel.clone(),
    s.email.clone(),
    s.positions.clone(),
    opt(&s.qualifications),
    opt(&s.experience),
    s.request_id.clone(),
  ]
}

/// Render `listing` as a column-aligned table followed by a paging footer.
///
/// Widths are counted in chars, so full-width text will not line up exactly.
pub fn render(listing: &Listing) -> String {
  let rows: Vec<[String; 11]> = listing.items.iter().map(cells).collect();

  let mut widths = HEADERS.map(str::len);
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  out.push_str(&join_row(HEADERS.iter().copied(), &widths));
  out.push('\n');
  for row in &rows {
    out.push_str(&join_row(row.iter().map(String::as_str), &widths));
    out.push('\n');
  }
  out.push_str(&footer(listing));
  out.push('\n');
  out
}

fn join_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
  cells
    .zip(widths)
    .map(|(c, &w)| format!("{c:<w$}"))
    .collect::<Vec<_>>()
    .join("  ")
    .trim_end()
    .to_string()
}

fn footer(listing: &Listing) -> String {
  let shown = listing.items.len() as u64;
  let mut s = format!(
    "total {} / offset {} / limit {}",
    listing.total, listing.offset, listing.limit
  );
  let next = u64::from(listing.offset) + shown;
  if shown > 0 && next < listing.total {
    s.push_str(&format!(" (next page: --offset {next})"));
  }
  s
}
