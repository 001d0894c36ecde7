//! Reusable field rules

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();
}

const MAX_EMAIL_LENGTH: usize = 254;

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Syntactic check only; a blank address is reported as missing, not invalid.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email)
}

/// Trims free text and collapses whitespace-only input to `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("  info@littlejonnys.co.uk "));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email(""));

        let long_local = "a".repeat(250);
        assert!(!is_valid_email(&format!("{}@example.com", long_local)));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text(Some("  vegan guests ")), Some("vegan guests".to_string()));
        assert_eq!(normalize_text(Some("   ")), None);
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t"));
        assert!(!is_blank("Portsmouth"));
    }
}
