use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::DomainError;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("name pattern"));

// Exactly one '@', neither first nor last. Line breaks are the only other rejection.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\r\n]+@[^@\r\n]+$").expect("email pattern"));

pub fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, format!("{field} is required")));
    }
    Ok(())
}

/// Letters and whitespace only.
pub fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    require(field, value)?;
    if !NAME_RE.is_match(value) {
        return Err(DomainError::validation(
            field,
            format!("{field} must contain only letters"),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    require("Email", email)?;
    if !EMAIL_RE.is_match(email) {
        return Err(DomainError::validation("Email", "Wrong Email Format"));
    }
    Ok(())
}

/// Field-shape checks in the order forename, surname, email; first failure wins.
pub fn validate_user_fields(forename: &str, surname: &str, email: &str) -> Result<(), DomainError> {
    validate_name("Forename", forename)?;
    validate_name("Surname", surname)?;
    validate_email(email)
}
