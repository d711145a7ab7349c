//! Expiration time handling
//!
//! The operator types the expiry as a local datetime (`YYYY-MM-DDTHH:MM`,
//! optionally with seconds and a fraction). It becomes the `exp` claim as unix
//! seconds, with any fractional second truncated.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};

/// Accepted layouts, tried in order. `%.f` also matches an absent fraction.
const DATETIME_LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Rendering used for defaults, minute precision
const DATETIME_LOCAL_DISPLAY: &str = "%Y-%m-%dT%H:%M";

/// Why an expiry string was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpiryError {
    /// Not one of the accepted layouts
    #[error("expected a local datetime like 2030-01-31T23:59, got {0:?}")]
    Malformed(String),
    /// Falls in a daylight saving gap of the local timezone
    #[error("{0} does not exist in the local timezone")]
    Nonexistent(String),
}

/// Parse a datetime-local string in an explicit timezone
///
/// # Errors
/// Returns `ExpiryError` if the text is not a datetime or names a wall-clock
/// time the zone skips.
pub fn parse_expires_at_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Tz>, ExpiryError> {
    let trimmed = input.trim();
    let naive = DATETIME_LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ExpiryError::Malformed(input.to_string()))?;

    // Ambiguous times (clocks going back) resolve to the first occurrence.
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ExpiryError::Nonexistent(trimmed.to_string()))
}

/// Parse a datetime-local string in the machine's timezone
///
/// # Errors
/// See [`parse_expires_at_in`].
pub fn parse_expires_at(input: &str) -> Result<DateTime<Local>, ExpiryError> {
    parse_expires_at_in(input, &Local)
}

/// Unix seconds for an expiry, fractional part dropped
#[inline]
#[must_use]
pub fn to_epoch_seconds<Tz: TimeZone>(at: &DateTime<Tz>) -> i64 {
    at.timestamp()
}

/// Render a local datetime the way the expiry input expects it
#[must_use]
pub fn format_datetime_local(at: &DateTime<Local>) -> String {
    at.format(DATETIME_LOCAL_DISPLAY).to_string()
}

/// Default expiry: one hour from now, minute precision
#[must_use]
pub fn default_expires_at() -> String {
    format_datetime_local(&(Local::now() + Duration::hours(1)))
}
