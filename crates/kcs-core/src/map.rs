//! Projection of a validated registration into the flat stored row.

use crate::submission::{FormType, NewSubmission, RegisterInput};

/// Delimiter for list fields stored as scalar text.
pub const LIST_DELIMITER: &str = ",";

/// Join list entries for storage.
pub fn join_list(items: &[String]) -> String {
  items.join(LIST_DELIMITER)
}

/// Recover the entries of a stored list field.
pub fn split_list(stored: &str) -> Vec<String> {
  stored
    .split(LIST_DELIMITER)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

impl From<&RegisterInput> for NewSubmission {
  fn from(input: &RegisterInput) -> Self {
    // Only the field belonging to the submitted form variant survives.
    let (qualifications, experience) = match input.form_type {
      FormType::General => (input.qualifications.as_deref().map(join_list), None),
      FormType::Beginner => (None, input.experience.clone()),
    };

    NewSubmission {
      request_id: input.request_id.clone(),
      form_type: input.form_type,
      lp_id: input.lp_id.clone(),
      name: input.name.clone(),
      birth_year: input.birth_year,
      tel: input.tel.clone(),
      email: input.email.clone(),
      positions: join_list(&input.positions),
      qualifications,
      experience,
      utm_source: input.utm_source.clone(),
      utm_medium: input.utm_medium.clone(),
      utm_campaign: input.utm_campaign.clone(),
      utm_content: input.utm_content.clone(),
      utm_term: input.utm_term.clone(),
      referrer: input.referrer.clone(),
      landing_path: input.landing_path.clone(),
    }
  }
}
