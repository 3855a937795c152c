//! Per-field rules shared by every request type.
//!
//! Each helper returns `AppError::Validation` naming the offending field, so a
//! request can chain them with `?` inside its [`Validate`] impl.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{AppError, AppResult};

pub const PROMPT_MIN_CHARS: usize = 3;
pub const PROMPT_MAX_CHARS: usize = 1000;

static ASPECT_RATIO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").unwrap());

/// Local checks run before a request leaves the process.
pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

pub fn prompt(field: &'static str, value: &str) -> AppResult<()> {
    let len = value.chars().count();
    if !(PROMPT_MIN_CHARS..=PROMPT_MAX_CHARS).contains(&len) {
        return Err(AppError::validation(
            field,
            format!("must be between {} and {} characters, got {}", PROMPT_MIN_CHARS, PROMPT_MAX_CHARS, len),
        ));
    }
    Ok(())
}

pub fn optional_prompt(field: &'static str, value: Option<&str>) -> AppResult<()> {
    value.map_or(Ok(()), |v| prompt(field, v))
}

/// `<int>:<int>` with both sides greater than zero.
pub fn aspect_ratio(value: &str) -> AppResult<()> {
    let caps = ASPECT_RATIO
        .captures(value)
        .ok_or_else(|| AppError::validation("aspect_ratio", format!("'{}' does not match <int>:<int>", value)))?;
    for side in [&caps[1], &caps[2]] {
        let n = side
            .parse::<u32>()
            .map_err(|_| AppError::validation("aspect_ratio", format!("'{}' has a side too large: {}", value, side)))?;
        if n == 0 {
            return Err(AppError::validation("aspect_ratio", format!("'{}' must use positive integers", value)));
        }
    }
    Ok(())
}

pub fn non_empty(field: &'static str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub fn absolute_url(field: &'static str, value: &str) -> AppResult<()> {
    match Url::parse(value) {
        Ok(url) if !url.cannot_be_a_base() => Ok(()),
        Ok(_) => Err(AppError::validation(field, format!("'{}' is not a hierarchical URI", value))),
        Err(e) => Err(AppError::validation(field, format!("'{}' is not an absolute URI: {}", value, e))),
    }
}

pub fn optional_url(field: &'static str, value: Option<&str>) -> AppResult<()> {
    value.map_or(Ok(()), |v| absolute_url(field, v))
}

pub fn range_u8(field: &'static str, value: u8, min: u8, max: u8) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::validation(field, format!("must be between {} and {}, got {}", min, max, value)));
    }
    Ok(())
}

pub fn range_f64(field: &'static str, value: f64, min: f64, max: f64) -> AppResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(AppError::validation(field, format!("must be between {} and {}, got {}", min, max, value)));
    }
    Ok(())
}

pub fn count<T>(field: &'static str, items: &[T], min: usize, max: usize) -> AppResult<()> {
    if items.len() < min || items.len() > max {
        return Err(AppError::validation(
            field,
            format!("expected between {} and {} entries, got {}", min, max, items.len()),
        ));
    }
    Ok(())
}

/// Standard base64, optionally wrapped in a `data:<mime>;base64,` URL.
pub fn base64_image(field: &'static str, value: &str) -> AppResult<()> {
    non_empty(field, value)?;
    let payload = match value.strip_prefix("data:") {
        Some(rest) => rest.split_once(";base64,").map(|(_, b)| b).unwrap_or(""),
        None => value,
    };
    STANDARD
        .decode(payload.trim())
        .map(|_| ())
        .map_err(|e| AppError::validation(field, format!("is not valid base64: {}", e)))
}
