//! Review submission built from the review form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw fields posted by the review form. Every field is optional here so a
/// partially filled form still reaches validation instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    pub name: Option<String>,
    pub rating: Option<String>,
    #[serde(rename = "reviewText")]
    pub review_text: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("review field `{0}` is required")]
    MissingField(&'static str),
}

/// Body of `POST /api/locations/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSubmission {
    pub author: String,
    pub rating: i64,
    #[serde(rename = "reviewText")]
    pub review_text: String,
}

impl ReviewSubmission {
    /// Validates the form. `author` and `reviewText` must be non-empty and
    /// `rating` must start with a non-zero integer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first field that
    /// fails, checked in the order author, rating, reviewText.
    pub fn from_form(form: &ReviewForm) -> Result<Self, ValidationError> {
        let author = non_empty(form.name.as_deref()).ok_or(ValidationError::MissingField("author"))?;
        let rating = form
            .rating
            .as_deref()
            .and_then(parse_leading_int)
            .filter(|r| *r != 0)
            .ok_or(ValidationError::MissingField("rating"))?;
        let review_text = non_empty(form.review_text.as_deref())
            .ok_or(ValidationError::MissingField("reviewText"))?;

        Ok(Self {
            author: author.to_owned(),
            rating,
            review_text: review_text.to_owned(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Reads an optionally signed decimal integer from the start of `raw`,
/// ignoring leading whitespace and anything after the digits (`"4 stars"` → 4).
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
