//! Claims validator - checks raw request fields before anything is signed
//!
//! Rules run in a fixed order and the first failure wins. Nothing is built
//! until every rule has passed.

use crate::{
    api::request::TokenRequest,
    error::{ClaimField, TokenError, TokenResult},
    expiry::{ExpiryError, parse_expires_at, parse_expires_at_in},
    types::{Grantee, RawGrantee},
};
use chrono::{DateTime, DurationRound, FixedOffset, TimeDelta, Utc};

/// Request fields after validation, in their typed form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    /// Tenant identifier
    pub tenant_id: i64,
    /// User identifier, as entered
    pub user_id: String,
    /// Plan identifier, `None` when the input was empty
    pub plan_id: Option<i64>,
    /// Personal space flag
    pub no_personal_space: bool,
    /// Grantees, coerced to integers
    pub grantees: Vec<Grantee>,
    /// Expiry instant
    pub expires_at: DateTime<FixedOffset>,
}

/// Validator for raw token request fields
#[derive(Debug, Clone)]
pub struct ClaimsValidator {
    now: DateTime<Utc>,
    timezone: Option<FixedOffset>,
}

impl ClaimsValidator {
    /// Validator using the current time and the local timezone
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Utc::now(),
            timezone: None,
        }
    }

    /// Evaluate the expiry rule against a fixed instant
    #[inline]
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Interpret the expiry input in a fixed offset instead of local time
    #[inline]
    #[must_use]
    pub fn with_timezone(mut self, offset: FixedOffset) -> Self {
        self.timezone = Some(offset);
        self
    }

    /// Validate every field of `request`
    ///
    /// # Errors
    /// Returns `TokenError::Validation` naming the first offending field.
    pub fn validate(&self, request: &TokenRequest) -> TokenResult<ValidatedFields> {
        let tenant_id = parse_integer(request.tenant_id())
            .map_err(|e| TokenError::validation(ClaimField::TenantId, &e.to_string()))?;

        let plan_id = if request.plan_id().trim().is_empty() {
            None
        } else {
            Some(
                parse_integer(request.plan_id())
                    .map_err(|e| TokenError::validation(ClaimField::PlanId, &e.to_string()))?,
            )
        };

        let grantees = validate_grantees(request.grantees())?;

        if request.user_id().trim().is_empty() {
            return Err(TokenError::validation(ClaimField::UserId, "is required"));
        }

        let expires_at = self.validate_expiry(request.expires_at())?;

        Ok(ValidatedFields {
            tenant_id,
            user_id: request.user_id().to_string(),
            plan_id,
            no_personal_space: request.no_personal_space(),
            grantees,
            expires_at,
        })
    }

    fn validate_expiry(&self, input: &str) -> TokenResult<DateTime<FixedOffset>> {
        let parsed = match self.timezone {
            Some(offset) => parse_expires_at_in(input, &offset),
            None => parse_expires_at(input).map(|at| at.fixed_offset()),
        }
        .map_err(|e: ExpiryError| TokenError::validation(ClaimField::ExpiresAt, &e.to_string()))?;

        // The input has minute precision, so the current minute still counts.
        let floor = self
            .now
            .duration_trunc(TimeDelta::minutes(1))
            .unwrap_or(self.now);
        if parsed < floor {
            return Err(TokenError::validation(
                ClaimField::ExpiresAt,
                "must not be in the past",
            ));
        }
        Ok(parsed)
    }
}

impl Default for ClaimsValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Why an identifier was not accepted as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntegerError {
    /// Empty, or not a decimal number at all
    #[error("must be a number")]
    NotANumber,
    /// A number with a fractional part
    #[error("must be an integer")]
    Fractional,
    /// An integer outside the signed 64-bit range
    #[error("is out of range")]
    OutOfRange,
}

/// Parse an identifier the way the form does
///
/// Surrounding whitespace is ignored. Any finite decimal number is accepted
/// (`10.0`, `1e3`, `+7`) as long as its value is a whole number that fits in
/// an `i64`. Hexadecimal and non-finite values are not numbers here.
///
/// # Errors
/// Returns the [`IntegerError`] describing the rejection.
pub fn parse_integer(input: &str) -> Result<i64, IntegerError> {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(IntegerError::NotANumber)?;
    if value.fract() != 0.0 {
        return Err(IntegerError::Fractional);
    }
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(IntegerError::OutOfRange);
    }
    Ok(value as i64)
}

/// Grantee rules, each one checked across the whole list before the next
fn validate_grantees(raw: &[RawGrantee]) -> TokenResult<Vec<Grantee>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let space_ids = raw
        .iter()
        .map(|g| parse_integer(&g.space_id))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            TokenError::validation(ClaimField::SpaceIdType, &format!("space id {e}"))
        })?;

    let role_ids = raw
        .iter()
        .map(|g| parse_integer(&g.role_id))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            TokenError::validation(ClaimField::RoleIdType, &format!("role id {e}"))
        })?;

    if space_ids.iter().any(|&id| id <= 0) {
        return Err(TokenError::validation(
            ClaimField::SpaceIdRange,
            "space id must be greater than 0",
        ));
    }

    if role_ids.iter().any(|&id| id < 2) {
        return Err(TokenError::validation(
            ClaimField::RoleIdRange,
            "role id must be 2 or greater",
        ));
    }

    Ok(space_ids
        .into_iter()
        .zip(role_ids)
        .map(|(space_id, role_id)| Grantee { space_id, role_id })
        .collect())
}
