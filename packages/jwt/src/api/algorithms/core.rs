//! JWS compact serialization and signing

use super::ecdsa::{sign_es256, sign_es384, sign_es512};
use super::utils::base64_url_encode;
use crate::{
    api::keys::{KeyInner, PrivateKeyMaterial},
    error::{TokenError, TokenResult},
    types::{Claims, JwtHeader, JwtToken},
};

/// Produces `base64url(header).base64url(payload).base64url(signature)`
#[derive(Debug, Clone, Copy, Default)]
pub struct JwsSigner;

impl JwsSigner {
    /// Create a new signer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Sign `claims` with `key`, using the algorithm the key was imported for
    ///
    /// # Errors
    /// Returns `TokenError::CryptoSigning` if serialization or the signature
    /// primitive fails, or the key type does not match its algorithm.
    pub fn sign(&self, claims: &Claims, key: &PrivateKeyMaterial) -> TokenResult<JwtToken> {
        let algorithm = key.algorithm();
        let header = JwtHeader::new(algorithm);

        let header_json = serde_json::to_vec(&header).map_err(TokenError::crypto_signing)?;
        let payload_json = serde_json::to_vec(claims).map_err(TokenError::crypto_signing)?;

        let mut signing_input = base64_url_encode(&header_json);
        signing_input.push('.');
        signing_input.push_str(&base64_url_encode(&payload_json));

        let message = signing_input.as_bytes();
        let signature = match (key.inner(), algorithm.is_rsa()) {
            (KeyInner::Rsa(signer), true) => signer.sign(message)?,
            (KeyInner::P256(ec_key), false) => sign_es256(message, ec_key)?,
            (KeyInner::P384(ec_key), false) => sign_es384(message, ec_key)?,
            (KeyInner::P521(ec_key), false) => sign_es512(message, ec_key)?,
            _ => {
                return Err(TokenError::crypto_signing(format!(
                    "{key:?} cannot produce {algorithm} signatures"
                )));
            }
        };

        tracing::debug!(%algorithm, signature_len = signature.len(), "token signed");

        signing_input.push('.');
        signing_input.push_str(&base64_url_encode(&signature));
        Ok(JwtToken(signing_input))
    }
}

/// Sign on the blocking pool; RSA private operations are slow
///
/// # Errors
/// Same as [`JwsSigner::sign`], plus `TokenError::Internal` if the blocking
/// task dies.
pub async fn sign_token(claims: Claims, key: PrivateKeyMaterial) -> TokenResult<JwtToken> {
    tokio::task::spawn_blocking(move || JwsSigner::new().sign(&claims, &key))
        .await
        .map_err(|e| TokenError::internal(&format!("signing task failed: {e}")))?
}
