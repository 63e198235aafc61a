use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::models::{Role, UserDraft};

use super::error::FieldErrors;

// Same acceptance rule the dashboard form applies: something before the @,
// a domain, and a dot-separated TLD, none of them containing whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Check a draft locally, before any request is made. Runs every field so
/// the caller can show all problems at once.
pub fn validate_draft(draft: &UserDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if draft.name.trim().is_empty() {
        errors.name = Some("Name is required".to_string());
    }

    let email = draft.email.trim();
    if email.is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if !EMAIL_RE.is_match(email) {
        errors.email = Some("Invalid email format".to_string());
    }

    let role = draft.role.trim();
    if role.is_empty() {
        errors.role = Some("Role is required".to_string());
    } else if Role::from_str(role).is_err() {
        errors.role = Some("Invalid role".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
