//! Field-level input validation.
//!
//! Validators accumulate every problem in a request instead of stopping at
//! the first one, so clients can fix a form in one round trip.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use utoipa::ToSchema;

use crate::models::{NotificationChannel, MAX_MESSAGE_LENGTH};

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for names (users, companies, agents).
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum allowed length for agent descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Implemented by request payloads.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field errors while a payload is checked.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Like `check`, but a missing value is itself an error.
    pub fn require<T>(
        &mut self,
        field: &str,
        value: Option<T>,
        rule: impl FnOnce(T) -> Result<(), String>,
    ) -> &mut Self {
        match value {
            Some(value) => self.check(field, rule(value)),
            None => self.check(field, Err(format!("{} is required", field))),
        }
    }

    pub fn push(&mut self, error: FieldError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// Non-blank and at most `max` characters. Surrounding whitespace counts
/// toward the limit since the value is stored as given.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    let len = value.chars().count();
    if len > max {
        return Err(format!("{} is too long ({} chars, max {})", field, len, max));
    }
    Ok(())
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("email cannot be empty".to_string());
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(format!(
            "email is too long ({} chars, max {})",
            email.len(),
            MAX_EMAIL_LENGTH
        ));
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return Err("email must contain an @ symbol".to_string()),
    };
    if local.is_empty() || domain.contains('@') {
        return Err("email must be in the form local@domain".to_string());
    }
    if email.chars().any(char::is_whitespace) {
        return Err("email cannot contain whitespace".to_string());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err("email domain must contain a dot".to_string()),
    }
}

/// Optional leading `+`, then 6 to 20 digits. Spaces and dashes are tolerated.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err("phone cannot be empty".to_string());
    }
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let mut count = 0;
    for c in digits.chars() {
        match c {
            '0'..='9' => count += 1,
            ' ' | '-' => {}
            _ => return Err("phone may only contain digits".to_string()),
        }
    }
    if !(6..=20).contains(&count) {
        return Err("phone must have between 6 and 20 digits".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    validate_text("content", content, MAX_MESSAGE_LENGTH)
}

/// `#rgb` or `#rrggbb`.
pub fn validate_hex_color(color: &str) -> Result<(), String> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| "brandColor must start with #".to_string())?;
    if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err("brandColor must be a hex color like #1a2b3c".to_string())
    }
}

pub fn validate_url(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err("brandLogoUrl must be an http(s) URL".to_string())
    }
}

/// Each provider may appear once and every value must be non-blank.
pub fn validate_notifications(channels: &[NotificationChannel]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for channel in channels {
        if channel.value.trim().is_empty() {
            return Err(format!(
                "notification value for {} cannot be empty",
                channel.provider.as_str()
            ));
        }
        if !seen.insert(channel.provider) {
            return Err(format!(
                "duplicate notification provider: {}",
                channel.provider.as_str()
            ));
        }
    }
    Ok(())
}
