//! Request body validation shared by the handlers.
//!
//! Each check returns [`AppError::InvalidInput`] with a client-facing message.

use crate::types::{AppError, Result};
use std::ops::RangeInclusive;
use uuid::Uuid;

const USERNAME_LEN: RangeInclusive<usize> = 3..=100;
const PASSWORD_LEN: RangeInclusive<usize> = 6..=100;
const TITLE_LEN: RangeInclusive<usize> = 1..=255;
const EMAIL_MAX_LEN: usize = 100;

fn check_len(field: &str, value: &str, range: RangeInclusive<usize>) -> Result<()> {
    let len = value.chars().count();
    if range.contains(&len) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} must be between {} and {} characters",
            field,
            range.start(),
            range.end()
        )))
    }
}

pub fn username(value: &str) -> Result<()> {
    check_len("username", value.trim(), USERNAME_LEN)
}

pub fn password(value: &str) -> Result<()> {
    check_len("password", value, PASSWORD_LEN)
}

pub fn title(value: &str) -> Result<()> {
    check_len("title", value.trim(), TITLE_LEN)
}

/// Accepts `local@domain.tld` shapes: one `@`, no whitespace, and a dot
/// inside the domain with text on both sides.
pub fn email(value: &str) -> Result<()> {
    let invalid = || AppError::InvalidInput("email must be a valid email address".to_string());
    let value = value.trim();

    if value.is_empty() || value.chars().count() > EMAIL_MAX_LEN {
        return Err(invalid());
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !host.starts_with('.') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

/// Todo ids are UUIDs; anything else is rejected before reaching storage.
pub fn todo_id(value: &str) -> Result<String> {
    Uuid::parse_str(value)
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidInput("Invalid todo ID".to_string()))
}
