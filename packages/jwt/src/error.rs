//! Token generation error types

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Token generation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Input field a validation failure points at.
///
/// The `*_type` / `*_range` split for grantees tells the operator whether the
/// value was not a number at all or a number outside the allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimField {
    /// `tenant_id` did not parse as an integer
    TenantId,
    /// `plan_id` was supplied but did not parse as an integer
    PlanId,
    /// A grantee `space_id` did not parse as an integer
    SpaceIdType,
    /// A grantee `role_id` did not parse as an integer
    RoleIdType,
    /// A grantee `space_id` was not greater than zero
    SpaceIdRange,
    /// A grantee `role_id` was below two
    RoleIdRange,
    /// `user_id` was empty
    UserId,
    /// `expires_at` was malformed or already in the past
    ExpiresAt,
}

impl ClaimField {
    /// Tag used in error messages and JSON output
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimField::TenantId => "tenant_id",
            ClaimField::PlanId => "plan_id",
            ClaimField::SpaceIdType => "space_id_type",
            ClaimField::RoleIdType => "role_id_type",
            ClaimField::SpaceIdRange => "space_id_range",
            ClaimField::RoleIdRange => "role_id_range",
            ClaimField::UserId => "user_id",
            ClaimField::ExpiresAt => "expires_at",
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token generation error types
///
/// Every variant is terminal. Each one is a deterministic function of the
/// request, so nothing in the pipeline retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed or out-of-range user input, raised before any key handling
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Offending field
        field: ClaimField,
        /// Human readable explanation
        reason: String,
    },

    /// PEM header unrecognized, or recognized but unsupported
    #[error("Unsupported key format: {detail}")]
    UnsupportedKeyFormat {
        /// What was wrong with the key text
        detail: String,
    },

    /// The cryptographic primitive rejected the key or the payload
    #[error("Signing error: {cause}")]
    CryptoSigning {
        /// Underlying library error, rendered
        cause: String,
    },

    /// Background task failed before producing a result
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TokenError {
    /// Create a validation error
    #[inline]
    #[must_use]
    pub fn validation(field: ClaimField, reason: &str) -> Self {
        TokenError::Validation {
            field,
            reason: reason.to_string(),
        }
    }

    /// Create an unsupported key format error
    #[inline]
    #[must_use]
    pub fn unsupported_key_format(detail: &str) -> Self {
        TokenError::UnsupportedKeyFormat {
            detail: detail.to_string(),
        }
    }

    /// Create a signing error from any displayable cause
    #[inline]
    #[must_use]
    pub fn crypto_signing(cause: impl fmt::Display) -> Self {
        TokenError::CryptoSigning {
            cause: cause.to_string(),
        }
    }

    /// Create an internal error
    #[inline]
    #[must_use]
    pub fn internal(msg: &str) -> Self {
        TokenError::Internal(msg.to_string())
    }

    /// Field tag when this is a validation failure
    #[must_use]
    pub fn field(&self) -> Option<ClaimField> {
        match self {
            TokenError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}
