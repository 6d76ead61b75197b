use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[1-9]\d{9,14}$").expect("valid phone regex"))
}

/// Validate a phone number after stripping formatting characters.
pub fn validate_phone_number(phone: &str) -> AppResult<()> {
    if !phone_regex().is_match(&normalize_phone_number(phone)) {
        return Err(AppError::ValidationError(
            "Invalid phone number".to_string(),
        ));
    }

    Ok(())
}

/// Drop spaces, dashes, dots and parentheses; keep a leading `+`.
pub fn normalize_phone_number(phone: &str) -> String {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if trimmed.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    }
}
