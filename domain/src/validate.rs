//! Lightweight input validation helpers. Keep logic minimal and deterministic.

use crate::Member;

/// True when the string is empty or only whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// True when a value was supplied and is not blank.
pub fn is_present(s: Option<&str>) -> bool {
    s.is_some_and(|v| !is_blank(v))
}

/// Check a candidate member before it is persisted.
///
/// Rejects an absent candidate, blank email/full_name/password, negative
/// experience, and a missing registration date.
pub fn validate_member(candidate: Option<&Member>) -> bool {
    let Some(m) = candidate else {
        return false;
    };
    if is_blank(&m.email) || is_blank(&m.full_name) || is_blank(&m.password) {
        return false;
    }
    if m.experience_months < 0 {
        return false;
    }
    m.registration_date.is_some()
}
