//! # Validate: Client-side Email Check
//!
//! Pure and deterministic. The raw input is trimmed before any check, so the
//! value handed to the gateway is always the trimmed form.

use crate::error::FormError;
use regex::Regex;
use std::sync::LazyLock;

/// Non-whitespace local part, an `@`, a dotted domain and a top-level
/// segment of at least two characters.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern compiles")
});

/// Result of validating one raw input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Nothing left after trimming.
    Empty,
    /// Non-empty, but not shaped like an email address.
    Malformed,
    /// The trimmed address.
    Valid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    /// Converts into the error taxonomy used by the form.
    pub fn into_result(self) -> Result<String, FormError> {
        match self {
            ValidationResult::Empty => Err(FormError::ValidationEmpty),
            ValidationResult::Malformed => Err(FormError::ValidationMalformed),
            ValidationResult::Valid(email) => Ok(email),
        }
    }
}

/// Classifies `raw` as empty, malformed or a valid email.
pub fn validate(raw: &str) -> ValidationResult {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ValidationResult::Empty
    } else if EMAIL_PATTERN.is_match(trimmed) {
        ValidationResult::Valid(trimmed.to_string())
    } else {
        ValidationResult::Malformed
    }
}

/// Returns the part after the `@`, for logs that must not carry the full address.
pub fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}
