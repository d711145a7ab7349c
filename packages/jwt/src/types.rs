//! Token type definitions

use crate::{algorithms::SigningAlgorithm, error::TokenError};
use serde::{Deserialize, Serialize};

/// Grantee as typed by the operator, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGrantee {
    /// Space identifier text
    pub space_id: String,
    /// Role identifier text
    pub role_id: String,
}

impl RawGrantee {
    /// Create a raw grantee from its two text fields
    #[must_use]
    pub fn new(space_id: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            role_id: role_id.into(),
        }
    }
}

/// Delegated space access carried in the `grant_access` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grantee {
    /// Space identifier, always greater than zero
    pub space_id: i64,
    /// Role identifier, always at least two
    pub role_id: i64,
}

/// Token payload
///
/// `plan_id` and `grant_access` are omitted from the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Tenant identifier
    pub tenant_id: i64,
    /// Opaque user identifier
    pub user_id: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Whether the user is denied a personal space
    pub no_personal_space: bool,
    /// Plan identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    /// Space grants, only present when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_access: Option<Vec<Grantee>>,
}

/// JWS protected header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Signature algorithm
    pub alg: SigningAlgorithm,
    /// Token type, always "JWT"
    pub typ: String,
}

impl JwtHeader {
    /// Header for the given algorithm
    #[must_use]
    pub fn new(alg: SigningAlgorithm) -> Self {
        Self {
            alg,
            typ: "JWT".to_string(),
        }
    }
}

/// Compact JWS string (`header.payload.signature`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtToken(pub String);

impl JwtToken {
    /// The three base64url segments
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// Consume into the inner string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for JwtToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl AsRef<str> for JwtToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JwtToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result shape handed back to the presentation shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GenerateOutcome {
    /// `{"token": "..."}`
    Token {
        /// Compact token
        token: String,
    },
    /// `{"error": "..."}`
    Error {
        /// Error text, shown verbatim
        error: String,
    },
}

impl From<Result<JwtToken, TokenError>> for GenerateOutcome {
    fn from(result: Result<JwtToken, TokenError>) -> Self {
        match result {
            Ok(token) => GenerateOutcome::Token {
                token: token.into_string(),
            },
            Err(e) => GenerateOutcome::Error {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClaimField;

    #[test]
    fn absent_optional_claims_are_omitted() {
        let claims = Claims {
            tenant_id: 42,
            user_id: "u1".to_string(),
            exp: 1_900_000_000,
            no_personal_space: true,
            plan_id: None,
            grant_access: None,
        };
        let json = serde_json::to_value(&claims).expect("claims serialize");
        let obj = json.as_object().expect("claims are an object");
        assert!(!obj.contains_key("plan_id"));
        assert!(!obj.contains_key("grant_access"));
        assert_eq!(obj.get("tenant_id"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn header_serializes_alg_name() {
        let json =
            serde_json::to_string(&JwtHeader::new(SigningAlgorithm::PS384)).expect("serialize");
        assert_eq!(json, r#"{"alg":"PS384","typ":"JWT"}"#);
    }

    #[test]
    fn outcome_serializes_as_token_or_error_object() {
        let ok: GenerateOutcome = Ok(JwtToken::from("a.b.c".to_string())).into();
        assert_eq!(
            serde_json::to_string(&ok).expect("serialize"),
            r#"{"token":"a.b.c"}"#
        );

        let err: GenerateOutcome =
            Err(TokenError::validation(ClaimField::PlanId, "must be a number")).into();
        assert_eq!(
            serde_json::to_string(&err).expect("serialize"),
            r#"{"error":"Invalid plan_id: must be a number"}"#
        );
    }
}
