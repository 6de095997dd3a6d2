use uuid::Uuid;

use crate::error::Error;

/// Values the web client has been seen sending in place of a real id.
const PLACEHOLDER_IDS: [&str; 2] = ["undefined", "null"];

/// Trims a path value and rejects blanks and placeholders.
pub fn reject_placeholder<'a>(name: &'static str, raw: &'a str) -> Result<&'a str, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || PLACEHOLDER_IDS.iter().any(|p| trimmed.eq_ignore_ascii_case(p)) {
        return Err(Error::invalid_identifier(name, raw));
    }
    Ok(trimmed)
}

/// Parses a path identifier, rejecting blanks, placeholders and non-UUIDs.
pub fn parse_identifier(name: &'static str, raw: &str) -> Result<Uuid, Error> {
    let trimmed = reject_placeholder(name, raw)?;
    Uuid::parse_str(trimmed).map_err(|_| Error::invalid_identifier(name, raw))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), Error> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(Error::Validation(format!("invalid email address: {:?}", email))),
    }
}

pub fn require_non_blank(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
