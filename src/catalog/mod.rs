//! Subject normalisation shared by the static metadata catalogs.
//!
//! Each domain keeps its curated table next to its code (`shapes::catalog`,
//! `topics::catalog`, `animations::catalog`); all of them are looked up with
//! [`normalize_key`] and fall back to a generic profile derived from the
//! subject name, so lookup never fails.

use crate::{Error, ErrorContext, Result};

/// Trim, lowercase, spaces to underscores: `" Solar System"` → `"solar_system"`.
pub fn normalize_key(subject: &str) -> String {
    subject.trim().to_lowercase().replace(' ', "_")
}

/// Trimmed subject, or a validation error if nothing is left.
pub fn require_subject(field: &str, subject: &str) -> Result<String> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(Error::validation_with_context(
            format!("{} must not be empty", field),
            ErrorContext::new().with_field_path(field),
        ));
    }
    Ok(trimmed.to_string())
}

/// Split a comma-separated subject list, dropping empty entries.
pub fn split_subjects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
