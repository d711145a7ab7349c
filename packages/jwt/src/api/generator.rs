//! Token generation pipeline
//!
//! validate -> build payload -> import key -> sign. Validation failures stop
//! the pipeline before the key is touched; signing only starts after a
//! successful import.

use super::{
    algorithms::{JwsSigner, sign_token},
    claims::{ClaimsValidator, PayloadBuilder},
    keys::{KeyImporter, import_key},
    request::TokenRequest,
    validation::AsyncTokenResult,
};
use crate::{
    error::{TokenError, TokenResult},
    types::{GenerateOutcome, JwtToken},
};
use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::oneshot;

/// Token generator
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator {
    now: Option<DateTime<Utc>>,
    timezone: Option<FixedOffset>,
}

impl TokenGenerator {
    /// Generator using the wall clock and the local timezone
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check expiry against a fixed instant instead of the wall clock
    #[inline]
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Read expiry input in a fixed offset instead of local time
    #[inline]
    #[must_use]
    pub fn with_timezone(mut self, offset: FixedOffset) -> Self {
        self.timezone = Some(offset);
        self
    }

    fn validator(&self) -> ClaimsValidator {
        let mut validator = ClaimsValidator::new();
        if let Some(now) = self.now {
            validator = validator.at(now);
        }
        if let Some(offset) = self.timezone {
            validator = validator.with_timezone(offset);
        }
        validator
    }

    /// Run the pipeline on the tokio runtime
    ///
    /// The request is copied, so the caller may keep editing it.
    #[must_use]
    pub fn generate(&self, request: &TokenRequest) -> AsyncTokenResult {
        let (tx, rx) = oneshot::channel();
        let validator = self.validator();
        let request = request.clone();

        tokio::spawn(async move {
            let result = run(&validator, request).await;
            let _ = tx.send(result);
        });

        AsyncTokenResult::new(rx)
    }

    /// Run the pipeline on the current thread
    ///
    /// # Errors
    /// Returns the first `TokenError` any stage produces.
    pub fn generate_blocking(&self, request: &TokenRequest) -> TokenResult<JwtToken> {
        let validator = self.validator();
        let outcome = (|| {
            let fields = validator.validate(request)?;
            let claims = PayloadBuilder::new().build(&fields);
            let key = KeyImporter::new().import(request.private_key(), request.algorithm())?;
            JwsSigner::new().sign(&claims, &key)
        })();
        log_outcome(&outcome);
        outcome
    }

    /// Run the pipeline and fold the result into the `{token}` / `{error}` shape
    pub async fn generate_outcome(&self, request: &TokenRequest) -> GenerateOutcome {
        self.generate(request).await.into()
    }
}

/// Generate a token with the wall clock and the local timezone
///
/// Shorthand for `TokenGenerator::new().generate(request)`.
#[must_use]
pub fn generate_token(request: &TokenRequest) -> AsyncTokenResult {
    TokenGenerator::new().generate(request)
}

async fn run(validator: &ClaimsValidator, request: TokenRequest) -> TokenResult<JwtToken> {
    tracing::debug!(algorithm = %request.algorithm(), "generating token");

    let outcome = async {
        let fields = validator.validate(&request)?;
        let claims = PayloadBuilder::new().build(&fields);
        let key = import_key(request.private_key().to_string(), request.algorithm()).await?;
        sign_token(claims, key).await
    }
    .await;

    log_outcome(&outcome);
    outcome
}

fn log_outcome(outcome: &TokenResult<JwtToken>) {
    match outcome {
        Ok(_) => tracing::debug!("token generated"),
        Err(TokenError::Validation { field, .. }) => {
            tracing::warn!(%field, "token request rejected");
        }
        Err(e) => tracing::warn!(error = %e, "token generation failed"),
    }
}
