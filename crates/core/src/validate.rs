//! Field rules shared by the entity validators.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{DomainError, DomainResult};

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z ]+$").expect("static name pattern"))
}

/// Validate a display name and return its canonical (title-cased) form.
///
/// Names are letters and spaces only. Surrounding whitespace is dropped and
/// inner runs of whitespace collapse to a single space.
pub fn normalize_name(field: &str, raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if !name_pattern().is_match(trimmed) {
        return Err(DomainError::validation(format!(
            "{field} must contain only letters and spaces"
        )));
    }
    Ok(title_case(trimmed))
}

/// Upper-case the first letter of every word; the rest of each word is kept.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn ensure_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

pub fn ensure_positive(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!("{field} must be a positive number")));
    }
    Ok(())
}
